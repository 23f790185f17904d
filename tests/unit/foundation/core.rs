use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(64, 32).unwrap();
    assert_eq!(c.rect().width(), 64.0);
    assert_eq!(c.rect().height(), 32.0);
}

#[test]
fn fps_frame_time_has_no_drift() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frame_time(0), Duration::ZERO);
    assert_eq!(fps.frame_time(30), Duration::from_secs(1));
    assert_eq!(fps.frame_time(30 * 3600), Duration::from_secs(3600));

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.frame_time(30000), Duration::from_secs(1001));
}

#[test]
fn fps_frames_covering_rounds_up() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_covering(Duration::ZERO), 0);
    assert_eq!(fps.frames_covering(Duration::from_secs(1)), 30);
    assert_eq!(fps.frames_covering(Duration::from_millis(1001)), 31);
}

#[test]
fn rgb8_parses_hex_with_and_without_hash() {
    assert_eq!(Rgb8::parse_hex("#FF8000").unwrap(), Rgb8::new(255, 128, 0));
    assert_eq!(Rgb8::parse_hex("ff8000").unwrap(), Rgb8::new(255, 128, 0));
    assert_eq!(Rgb8::new(1, 2, 171).to_hex(), "#0102ab");
}

#[test]
fn rgb8_rejects_malformed_hex() {
    for bad in ["", "#fff", "#12345g", "#1234567", "red"] {
        assert!(Rgb8::parse_hex(bad).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn rgb8_serde_uses_hex_strings() {
    let c: Rgb8 = serde_json::from_str("\"#102030\"").unwrap();
    assert_eq!(c, Rgb8::new(0x10, 0x20, 0x30));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#102030\"");
    assert!(serde_json::from_str::<Rgb8>("\"nope\"").is_err());
}

#[test]
fn brightness_uses_luma_weights() {
    assert_eq!(Rgb8::new(255, 255, 255).brightness(), 255.0);
    assert_eq!(Rgb8::new(0, 0, 0).brightness(), 0.0);
    assert!((Rgb8::new(255, 0, 0).brightness() - 76.245).abs() < 1e-9);
}

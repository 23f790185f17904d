use super::*;

#[test]
fn pixel_reads_rgba_row_major() {
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![
            1, 2, 3, 4, 5, 6, 7, 8, //
            9, 10, 11, 12, 13, 14, 15, 16,
        ],
        premultiplied: true,
    };
    assert_eq!(frame.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(frame.pixel(0, 1), Some([9, 10, 11, 12]));
    assert_eq!(frame.pixel(2, 0), None);
    assert_eq!(frame.pixel(0, 2), None);
}

#[test]
fn default_style_uses_seven_hundred_ms_out_cubic() {
    let style = ChartStyle::default();
    assert_eq!(style.transition, Duration::from_millis(700));
    assert_eq!(style.ease, Ease::OutCubic);
    assert!(style.validate().is_ok());
}

#[test]
fn tiny_canvas_is_rejected() {
    let style = ChartStyle {
        canvas: Canvas {
            width: 100,
            height: 100,
        },
        ..ChartStyle::default()
    };
    assert!(matches!(style.validate(), Err(RaceError::Validation(_))));
}

use super::*;

#[test]
fn width_fraction_is_clamped() {
    assert_eq!(width_fraction(135.0, 270.0), 0.5);
    assert_eq!(width_fraction(400.0, 270.0), 1.0);
    assert_eq!(width_fraction(-5.0, 270.0), 0.0);
    assert_eq!(width_fraction(10.0, 0.0), 0.0);
    assert_eq!(width_fraction(f64::NAN, 10.0), 0.0);
}

#[test]
fn regions_stack_without_overlap() {
    let l = ChartLayout::new(Canvas::default(), 5);
    let order = [l.header, l.status, l.bars, l.transport, l.scrub, l.legend];
    for pair in order.windows(2) {
        assert!(pair[0].y1 <= pair[1].y0, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
    assert!(l.legend.y1 <= 720.0);
}

#[test]
fn bars_fill_their_track_fraction() {
    let l = ChartLayout::new(Canvas::default(), 4);
    let track = l.bar_track(2);
    let half = l.bar_rect(2, 0.5);
    assert_eq!(half.x0, track.x0);
    assert!((half.width() - track.width() / 2.0).abs() < 1e-9);
    assert_eq!(l.bar_rect(2, 3.0).x1, track.x1);
    assert!(l.bar_track(1).y1 <= l.bar_track(2).y0);
}

#[test]
fn scrub_positions_span_the_track() {
    let l = ChartLayout::new(Canvas::default(), 3);
    assert_eq!(l.scrub_x(0, 10), l.scrub.x0);
    assert_eq!(l.scrub_x(10, 10), l.scrub.x1);
    assert_eq!(l.scrub_x(50, 10), l.scrub.x1);
    assert_eq!(l.scrub_x(0, 0), l.scrub.x0);
}

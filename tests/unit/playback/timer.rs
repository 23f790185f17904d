use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn first_tick_is_one_period_away() {
    let mut t = IntervalTimer::start(TimerId(1), ms(1000));
    assert_eq!(t.fire_within(ms(999)), None);
    assert_eq!(t.until_next(), ms(1));
    assert_eq!(t.fire_within(ms(1)), Some(Duration::ZERO));
    assert_eq!(t.until_next(), ms(1000));
}

#[test]
fn long_elapsed_reports_remainder_for_each_tick() {
    let mut t = IntervalTimer::start(TimerId(7), ms(500));
    let mut rest = ms(1700);
    let mut ticks = 0;
    while let Some(r) = t.fire_within(rest) {
        rest = r;
        ticks += 1;
    }
    assert_eq!(ticks, 3);
    assert_eq!(t.until_next(), ms(300));
    assert_eq!(t.id(), TimerId(7));
    assert_eq!(t.period(), ms(500));
}

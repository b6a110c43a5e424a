use super::*;

#[test]
fn format_pads_and_floors() {
    assert_eq!(format_elapsed(0), "00:00:00");
    assert_eq!(format_elapsed(999), "00:00:00");
    assert_eq!(format_elapsed(61_500), "00:01:01");
    assert_eq!(format_elapsed(3_600_000 + 59_999), "01:00:59");
    // Hours wrap at a day.
    assert_eq!(format_elapsed(25 * 3_600_000), "01:00:00");
}

#[test]
fn score_seconds_floor() {
    assert_eq!(score_seconds(12_999), 12);
    assert_eq!(score_seconds(0), 0);
}

#[test]
fn clock_runs_until_first_finish() {
    let mut clock = SessionClock::default();
    assert_eq!(clock.elapsed_ms(10), None);
    assert_eq!(clock.display(10), None);

    clock.restart(1_000);
    assert!(clock.is_running());
    assert_eq!(clock.elapsed_ms(4_000), Some(3_000));

    assert!(clock.finish(5_000));
    assert!(!clock.finish(9_000));
    assert!(clock.is_finished());
    assert_eq!(clock.elapsed_ms(100_000), Some(4_000));
    assert_eq!(clock.display(100_000).as_deref(), Some("00:00:04"));

    clock.restart(200_000);
    assert!(!clock.is_finished());
    assert_eq!(clock.elapsed_ms(201_000), Some(1_000));
}

#[test]
fn clock_that_never_started_cannot_finish() {
    let mut clock = SessionClock::default();
    assert!(!clock.finish(5_000));
    assert!(!clock.is_finished());
    assert_eq!(clock.elapsed_ms(6_000), None);

    clock.restart(6_000);
    assert!(clock.finish(7_500));
    assert_eq!(clock.elapsed_ms(9_000), Some(1_500));
}

use super::*;

#[test]
fn progress_covers_the_duration() {
    assert_eq!(phase_progress(1000.0, 1000.0, 2600.0), 0.0);
    assert_eq!(phase_progress(2300.0, 1000.0, 2600.0), 0.5);
    assert_eq!(phase_progress(3600.0, 1000.0, 2600.0), 1.0);
}

#[test]
fn progress_saturates_past_the_end() {
    assert_eq!(phase_progress(9000.0, 1000.0, 2600.0), 1.0);
    assert_eq!(phase_progress(f64::MAX, 0.0, 2600.0), 1.0);
}

#[test]
fn clock_skew_reads_as_not_started() {
    assert_eq!(phase_progress(500.0, 1000.0, 2600.0), 0.0);
    assert_eq!(phase_progress(-1e12, 0.0, 2600.0), 0.0);
}

#[test]
fn degenerate_durations_read_as_complete() {
    assert_eq!(phase_progress(0.0, 0.0, 0.0), 1.0);
    assert_eq!(phase_progress(0.0, 0.0, -5.0), 1.0);
    assert_eq!(phase_progress(0.0, 0.0, f64::NAN), 1.0);
    assert_eq!(phase_progress(0.0, 0.0, f64::INFINITY), 1.0);
}

#[test]
fn progress_is_monotonic_in_now() {
    let mut last = 0.0;
    for i in 0..100 {
        let now = f64::from(i) * 40.0;
        let p = phase_progress(now, 0.0, 2600.0);
        assert!(p >= last);
        last = p;
    }
}

#[test]
fn non_finite_clock_reads_as_not_started() {
    assert_eq!(phase_progress(f64::NAN, 0.0, 2600.0), 0.0);
    assert_eq!(phase_progress(0.0, f64::NAN, 2600.0), 0.0);
}

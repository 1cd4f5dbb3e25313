use super::*;

#[test]
fn fixed_step_emits_frame_times_at_the_rate() {
    let mut s = FixedStepScheduler::new(60.0, 3).unwrap();
    assert_eq!(s.next_frame(), Some(0.0));
    let second = s.next_frame().unwrap();
    assert!((second - 1000.0 / 60.0).abs() < 1e-12);
    let third = s.next_frame().unwrap();
    assert!((third - 2000.0 / 60.0).abs() < 1e-12);
    assert_eq!(s.next_frame(), None);
    assert_eq!(s.frames_emitted(), 3);
}

#[test]
fn fixed_step_rejects_degenerate_rates() {
    assert!(FixedStepScheduler::new(0.0, 10).is_err());
    assert!(FixedStepScheduler::new(-24.0, 10).is_err());
    assert!(FixedStepScheduler::new(f64::NAN, 10).is_err());
    assert!(FixedStepScheduler::new(60.0, 0).is_err());
}

#[test]
fn cancel_ends_both_schedulers() {
    let mut fixed = FixedStepScheduler::new(30.0, 100).unwrap();
    fixed.next_frame();
    fixed.cancel();
    assert_eq!(fixed.next_frame(), None);

    let mut manual = ManualScheduler::new([0.0, 16.0, 32.0]);
    assert_eq!(manual.next_frame(), Some(0.0));
    manual.cancel();
    assert_eq!(manual.next_frame(), None);
}

#[test]
fn manual_hands_out_times_in_order() {
    let mut s = ManualScheduler::new([5.0, 10.0]);
    assert_eq!(s.next_frame(), Some(5.0));
    assert_eq!(s.next_frame(), Some(10.0));
    assert_eq!(s.next_frame(), None);
}

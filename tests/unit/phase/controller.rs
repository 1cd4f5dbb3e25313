use super::*;

fn controller() -> PhaseController {
    PhaseController::new(2600.0, 3200.0).unwrap()
}

#[test]
fn durations_must_be_positive() {
    assert!(PhaseController::new(0.0, 3200.0).is_err());
    assert!(PhaseController::new(2600.0, -1.0).is_err());
    assert!(PhaseController::new(f64::NAN, 3200.0).is_err());
}

#[test]
fn idle_reports_zeroes_and_no_events() {
    let mut c = controller();
    let t = c.tick(5000.0);
    assert_eq!(t.phase, Phase::Idle);
    assert_eq!(t.raw, 0.0);
    assert_eq!(t.openness, 0.0);
    assert_eq!(t.dolly, 0.0);
    assert_eq!(t.event, None);
}

#[test]
fn opening_scenario_reaches_full_openness_at_duration() {
    let mut c = controller();
    c.set_phase(Phase::opening(), 0.0);

    let halfway = c.tick(1300.0);
    assert_eq!(halfway.raw, 0.5);
    assert!(halfway.openness > 0.06);
    assert!(halfway.openness < 1.0);
    assert_eq!(halfway.event, None);

    let done = c.tick(2600.0);
    assert_eq!(done.raw, 1.0);
    assert!((done.openness - 1.0).abs() < 1e-12);
    assert_eq!(done.event, Some(PhaseEvent::EyeOpened));
    assert_eq!(done.phase, Phase::Opening { fired: true });
}

#[test]
fn eye_opened_fires_exactly_once_over_many_ticks() {
    let mut c = controller();
    c.set_phase(Phase::opening(), 0.0);

    let mut fired = 0;
    for i in 0..200 {
        let now = 2600.0 + f64::from(i) * 16.0;
        if c.tick(now).event == Some(PhaseEvent::EyeOpened) {
            fired += 1;
        }
    }
    assert_eq!(fired, 1);
}

#[test]
fn reentering_a_phase_rearms_its_event() {
    let mut c = controller();
    c.set_phase(Phase::opening(), 0.0);
    assert_eq!(c.tick(2600.0).event, Some(PhaseEvent::EyeOpened));
    assert_eq!(c.tick(2700.0).event, None);

    c.set_phase(Phase::opening(), 3000.0);
    assert_eq!(c.tick(3100.0).event, None);
    assert_eq!(c.tick(5600.0).event, Some(PhaseEvent::EyeOpened));
}

#[test]
fn transition_scenario_fires_zoom_complete_once() {
    let mut c = controller();
    c.set_phase(Phase::transitioning(), 0.0);

    let early = c.tick(480.0);
    assert_eq!(early.raw, 0.15);
    assert!((early.dolly - 0.02).abs() < 1e-12);

    let done = c.tick(3200.0);
    assert_eq!(done.raw, 1.0);
    assert!((done.dolly - 1.0).abs() < 1e-12);
    assert_eq!(done.event, Some(PhaseEvent::ZoomComplete));

    assert_eq!(c.tick(3300.0).event, None);
    assert_eq!(c.tick(9999.0).event, None);
}

#[test]
fn openness_latches_when_leaving_the_opening_phase() {
    let mut c = controller();
    c.set_phase(Phase::opening(), 0.0);
    let mid = c.tick(1300.0);
    let latched = mid.openness;
    assert!(latched > 0.0 && latched < 1.0);

    c.set_phase(Phase::transitioning(), 1300.0);
    let t = c.tick(1800.0);
    assert_eq!(t.openness, latched);
    assert!(t.dolly > 0.0);
}

#[test]
fn clock_skew_never_regresses_progress() {
    let mut c = controller();
    c.set_phase(Phase::opening(), 1000.0);
    let t = c.tick(200.0);
    assert_eq!(t.raw, 0.0);
    assert_eq!(t.openness, 0.0);
    assert_eq!(t.event, None);
}

#[test]
fn complete_phase_keeps_terminal_values() {
    let mut c = controller();
    c.set_phase(Phase::transitioning(), 0.0);
    c.tick(3200.0);
    c.set_phase(Phase::Complete, 3200.0);

    let t = c.tick(10_000.0);
    assert_eq!(t.phase, Phase::Complete);
    assert!((t.dolly - 1.0).abs() < 1e-12);
    assert_eq!(t.event, None);
}

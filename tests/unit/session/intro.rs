use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::session::scheduler::FixedStepScheduler;
use crate::session::sink::InMemorySink;

fn small_opts() -> IntroOpts {
    IntroOpts {
        width: 64,
        height: 36,
        seed: 9,
        particle_count: 8,
        ..IntroOpts::default()
    }
}

#[test]
fn full_run_covers_the_canonical_beat_sheet() {
    let mut session = IntroSession::new(small_opts()).unwrap();
    let opened = Rc::new(Cell::new(0u32));
    let completed = Rc::new(Cell::new(0u32));
    {
        let opened = Rc::clone(&opened);
        session.on_eye_opened(move || opened.set(opened.get() + 1));
        let completed = Rc::clone(&completed);
        session.on_zoom_complete(move || completed.set(completed.get() + 1));
    }

    let mut scheduler = FixedStepScheduler::new(60.0, 2000).unwrap();
    let mut sink = InMemorySink::new();
    let stats = session.run(&mut scheduler, &mut sink).unwrap();

    // 600ms hold, 2600ms opening, 600ms handoff, 3200ms dolly: at 60 fps
    // the completing frame lands exactly on 7000ms, frame index 420.
    assert_eq!(
        stats,
        RunStats {
            frames_rendered: 421,
            eye_opened: true,
            zoom_completed: true,
        }
    );
    assert_eq!(opened.get(), 1);
    assert_eq!(completed.get(), 1);
    assert_eq!(sink.frames().len(), 421);
    assert_eq!(sink.frames()[420].0, 7000.0);
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 64,
            height: 36,
        })
    );
    assert!(session.done());
}

#[test]
fn events_and_phases_follow_the_manual_clock() {
    let mut session = IntroSession::new(small_opts()).unwrap();

    let t0 = session.tick(0.0).unwrap();
    assert_eq!(t0.phase, Phase::Idle);
    assert_eq!(t0.event, None);
    assert_eq!(t0.scene_frame.openness, 0.0);

    let t600 = session.tick(600.0).unwrap();
    assert_eq!(t600.phase, Phase::Opening { fired: false });
    assert_eq!(t600.scene_frame.openness, 0.0);

    let t3200 = session.tick(3200.0).unwrap();
    assert_eq!(t3200.phase, Phase::Opening { fired: true });
    assert_eq!(t3200.event, Some(PhaseEvent::EyeOpened));
    assert_eq!(t3200.scene_frame.openness, 1.0);
    assert!(!t3200.done);

    let t3800 = session.tick(3800.0).unwrap();
    assert_eq!(t3800.phase, Phase::Transitioning { fired: false });
    assert_eq!(t3800.scene_frame.dolly, 0.0);

    let t7000 = session.tick(7000.0).unwrap();
    assert_eq!(t7000.phase, Phase::Complete);
    assert_eq!(t7000.event, Some(PhaseEvent::ZoomComplete));
    assert_eq!(t7000.scene_frame.dolly, 1.0);
    assert!(t7000.done);

    // Ticks past completion render the terminal picture without events.
    let after = session.tick(7400.0).unwrap();
    assert_eq!(after.phase, Phase::Complete);
    assert_eq!(after.event, None);
    assert!(after.done);
}

#[test]
fn external_phase_change_drops_the_scheduled_handoff() {
    let mut session = IntroSession::new(small_opts()).unwrap();
    session.tick(0.0).unwrap();
    session.set_phase(Phase::transitioning(), 0.0);

    // Without the override this tick would have entered Opening.
    let tick = session.tick(600.0).unwrap();
    assert_eq!(tick.phase, Phase::Transitioning { fired: false });
    assert!(tick.scene_frame.dolly > 0.0);
    assert_eq!(tick.scene_frame.openness, 0.0);
}

#[test]
fn capped_scheduler_stops_an_unfinished_run() {
    let mut session = IntroSession::new(small_opts()).unwrap();
    let mut scheduler = FixedStepScheduler::new(60.0, 10).unwrap();
    let mut sink = InMemorySink::new();
    let stats = session.run(&mut scheduler, &mut sink).unwrap();

    assert_eq!(stats.frames_rendered, 10);
    assert!(!stats.eye_opened);
    assert!(!stats.zoom_completed);
    assert!(!session.done());
}

#[test]
fn resize_keeps_the_clock_and_changes_the_surface() {
    let mut session = IntroSession::new(small_opts()).unwrap();
    let before = session.tick(0.0).unwrap();
    assert_eq!((before.frame.width, before.frame.height), (64, 36));

    session.resize(100, 50, 1.0).unwrap();
    let after = session.tick(16.0).unwrap();
    assert_eq!((after.frame.width, after.frame.height), (100, 50));
    // The pending start-delay handoff survives the resize.
    assert_eq!(after.phase, Phase::Idle);
}

#[test]
fn rejects_a_non_finite_clock() {
    let mut session = IntroSession::new(small_opts()).unwrap();
    assert!(session.tick(f64::NAN).is_err());
}

#[test]
fn opts_validation_catches_bad_fields() {
    let bad_width = IntroOpts {
        width: 0,
        ..IntroOpts::default()
    };
    assert!(bad_width.validate().is_err());

    let bad_opening = IntroOpts {
        opening_ms: 0.0,
        ..IntroOpts::default()
    };
    assert!(bad_opening.validate().is_err());

    let bad_start = IntroOpts {
        start_delay_ms: -1.0,
        ..IntroOpts::default()
    };
    assert!(bad_start.validate().is_err());

    let bad_handoff = IntroOpts {
        handoff_delay_ms: f64::INFINITY,
        ..IntroOpts::default()
    };
    assert!(bad_handoff.validate().is_err());

    assert!((IntroOpts::default().total_duration_ms() - 7000.0).abs() < 1e-12);
}

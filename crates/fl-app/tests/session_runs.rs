//! Session edits interleaved with simulation runs.

use fl_app::{AppError, DriveOptions, FactorySession, drive};
use fl_graph::{EdgeSpec, NodeSpec};
use fl_sim::{EventKind, Recorder, SimError, SimOptions, TickStatus};
use proptest::prelude::*;

fn press_line() -> FactorySession {
    FactorySession::from_specs(
        vec![
            NodeSpec::new("load", "Loader", 1.0),
            NodeSpec::new("press", "Press", 2.0),
            NodeSpec::new("unload", "Unloader", 1.0),
        ],
        vec![
            EdgeSpec::new("e1", "load", "press"),
            EdgeSpec::new("e2", "press", "unload"),
        ],
    )
    .unwrap()
}

#[test]
fn edits_during_a_run_do_not_touch_it() {
    let mut session = press_line();
    let mut rec = Recorder::new();
    session.start_simulation(&mut rec).unwrap();
    session.tick(0.0, &mut rec).unwrap();

    session.remove_node(&"unload".into()).unwrap();
    assert_eq!(session.graph().nodes().len(), 2);

    let mut t = 0.0;
    let summary = loop {
        t += 50.0;
        if let TickStatus::Finished(summary) = session.tick(t, &mut rec).unwrap() {
            break summary;
        }
    };
    // The run finished on the three-node line it started with.
    assert_eq!(summary.nodes.len(), 3);
    assert_eq!(rec.count(EventKind::UnitComplete), 1);
}

#[test]
fn options_apply_to_later_runs() {
    let mut session = press_line();
    let mut rec = Recorder::new();
    let slow = drive(&mut session, &DriveOptions::at_fps(16.0), &mut rec).unwrap();

    session
        .set_options(SimOptions::default().with_speed(2.0))
        .unwrap();
    let fast = drive(&mut session, &DriveOptions::at_fps(16.0), &mut rec).unwrap();

    assert_eq!(slow.frames, 16 + 2 + 32 + 2 + 16);
    assert_eq!(fast.frames, 8 + 1 + 16 + 1 + 8);
}

#[test]
fn bad_options_are_rejected() {
    let mut session = press_line();
    let err = session
        .set_options(SimOptions::default().with_speed(-1.0))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Simulation(SimError::InvalidArg { .. })
    ));
    assert_eq!(session.options().speed_multiplier, 1.0);
}

#[test]
fn line_without_edges_cannot_run() {
    let mut session = FactorySession::new();
    session.add_node(NodeSpec::new("solo", "Solo", 3.0)).unwrap();
    let mut rec = Recorder::new();

    let err = drive(&mut session, &DriveOptions::default(), &mut rec).unwrap_err();
    assert!(matches!(
        err,
        AppError::Simulation(SimError::NoStartingPoint)
    ));
    assert_eq!(rec.count(EventKind::SimulationError), 1);
}

#[test]
fn stop_mid_run_clears_state() {
    let mut session = press_line();
    let mut rec = Recorder::new();
    session.start_simulation(&mut rec).unwrap();
    for i in 0..10 {
        session.tick(i as f64 * 50.0, &mut rec).unwrap();
    }
    session.stop_simulation(&mut rec);
    assert!(!session.is_running());
    assert_eq!(rec.positions.last(), Some(&None));
    assert_eq!(session.tick(1_000.0, &mut rec).unwrap(), TickStatus::Idle);
}

proptest! {
    #[test]
    fn live_stats_match_a_fresh_build(
        cycles in prop::collection::vec(0.0f64..60.0, 3),
        capacity in 1u32..5,
        transit in 0.0f64..10.0,
    ) {
        let mut session = press_line();
        for (id, cycle) in ["load", "press", "unload"].iter().zip(&cycles) {
            session.set_cycle_time(&(*id).into(), *cycle).unwrap();
        }
        session.set_max_capacity(&"press".into(), capacity).unwrap();
        session.set_transit_time(&"e2".into(), transit).unwrap();

        let fresh = FactorySession::from_specs(
            session.nodes().to_vec(),
            session.edges().to_vec(),
        ).unwrap();
        prop_assert_eq!(session.live_stats(), fresh.live_stats());
    }
}

use crate::common::{assert_close, feedback_network, TestHarness};
use qnet_core::*;

#[test]
fn test_draw_budget_stops_the_run() {
    let budget = 5_000;
    let mut h = TestHarness::new(feedback_network().with_draw_budget(budget));

    let report = h.run_checked();

    assert_eq!(report.stop_reason, Some(StopReason::DrawBudgetExhausted));
    assert!(report.draws >= budget);
    // One event never draws more than a service time, a route and a follow-up service.
    assert!(report.draws <= budget + 3, "overshot budget: {}", report.draws);
}

#[test]
fn test_horizon_fixes_final_clock() {
    let mut h = TestHarness::new(feedback_network().with_horizon(750.5).with_draw_budget(u64::MAX));

    let report = h.run_checked();

    assert_eq!(report.stop_reason, Some(StopReason::HorizonReached));
    assert_eq!(report.final_time, 750.5);
    for q in &report.queues {
        assert_close(q.total_time(), 750.5);
    }
}

#[test]
fn test_whichever_limit_comes_first_wins() {
    let tight_budget = feedback_network().with_horizon(1e9).with_draw_budget(100);
    let report = Simulation::new(&tight_budget).unwrap().run().unwrap();
    assert_eq!(report.stop_reason, Some(StopReason::DrawBudgetExhausted));

    let short_horizon = feedback_network().with_horizon(10.0).with_draw_budget(1_000_000);
    let report = Simulation::new(&short_horizon).unwrap().run().unwrap();
    assert_eq!(report.stop_reason, Some(StopReason::HorizonReached));
}

#[test]
fn test_network_without_entry_points_drains_immediately() {
    let config = NetworkConfig::new(vec![QueueConfig::new(1, TimeRange::new(1.0, 2.0))]).with_horizon(50.0);
    let mut h = TestHarness::new(config);

    let report = h.run_checked();

    assert_eq!(report.stop_reason, Some(StopReason::EventsExhausted));
    assert_eq!(report.final_time, 0.0);
    assert_eq!(report.events_processed, 0);
    assert_eq!(report.queues[0].utilization, 0.0);
}

#[test]
fn test_step_after_termination_is_a_noop() {
    let mut sim = Simulation::new(&feedback_network().with_draw_budget(50)).unwrap();
    while sim.step().unwrap() {}
    let (time, draws) = (sim.time(), sim.draws());
    assert!(!sim.step().unwrap());
    assert_eq!((sim.time(), sim.draws()), (time, draws));
}

#[test]
fn test_invalid_network_is_rejected_before_running() {
    let mut config = feedback_network();
    config.queues[2].routes.push(Route {
        target: RouteTarget::Queue(0),
        probability: 0.5,
    });
    let err = Simulation::new(&config).err();
    assert!(matches!(
        err,
        Some(SimError::Config(ConfigError::ProbabilityMass { queue: 2, .. }))
    ));

    let unterminated = NetworkConfig {
        draw_budget: None,
        ..feedback_network()
    };
    assert!(matches!(
        Simulation::new(&unterminated).err(),
        Some(SimError::Config(ConfigError::NoTermination))
    ));
}

use crate::common::{assert_close, TestHarness};
use qnet_core::*;

#[test]
fn test_deterministic_service_matching_arrivals_loses_nothing() {
    // Given: one client per time unit, each served in exactly one unit
    let config = TestHarness::single_queue(Some(1), 1, TimeRange::fixed(1.0), TimeRange::fixed(1.0))
        .with_horizon(10.0);
    let mut h = TestHarness::new(config);

    // When
    let report = h.run_checked();

    // Then: arrivals at 0, 1, ..., 10 are all admitted and the server never idles
    let q = &report.queues[0];
    assert_eq!(report.stop_reason, Some(StopReason::HorizonReached));
    assert_eq!(report.final_time, 10.0);
    assert_eq!(q.lost, 0);
    assert_eq!(q.admitted, 11);
    assert_eq!(q.served, 10);
    assert_close(q.occupancy_times[0], 0.0);
    assert_close(q.occupancy_times[1], 10.0);
    assert_close(q.utilization, 1.0);
}

#[test]
fn test_service_twice_as_slow_loses_every_other_client() {
    // Given: arrivals every unit, service takes two, no waiting room
    let config = TestHarness::single_queue(Some(1), 1, TimeRange::fixed(1.0), TimeRange::fixed(2.0))
        .with_horizon(20.0);
    let mut h = TestHarness::new(config);

    let report = h.run_checked();

    // Then: even instants are admitted, odd ones find the server busy
    let q = &report.queues[0];
    assert_eq!(q.admitted, 11);
    assert_eq!(q.lost, 10);
    assert_eq!(report.total_lost, 10);
    assert_close(q.occupancy_times[1], 20.0);
}

#[test]
fn test_tandem_network_conserves_clients() {
    // Given: queue 1 feeds queue 2, queue 2 always exits, no capacity limits
    let config = NetworkConfig::new(vec![
        QueueConfig::new(1, TimeRange::new(0.5, 1.0))
            .with_arrivals(TimeRange::new(1.0, 2.0))
            .with_route(RouteTarget::Queue(1), 1.0),
        QueueConfig::new(2, TimeRange::new(1.0, 2.0)).with_route(RouteTarget::Exit, 1.0),
    ])
    .with_horizon(5_000.0);
    let mut h = TestHarness::new(config);

    let report = h.run_checked();

    let (q1, q2) = (&report.queues[0], &report.queues[1]);
    assert_eq!(report.total_lost, 0);
    assert_eq!(q2.admitted, q1.served, "every client finishing at 1 reaches 2");
    assert_eq!(report.total_completed, q2.served);

    let in_system = h.sim.queues().iter().map(|q| q.occupancy() as u64).sum::<u64>();
    assert_eq!(q1.admitted, report.total_completed + in_system);
    assert!(report.total_completed as f64 >= 0.99 * q1.admitted as f64);
}

#[test]
fn test_multi_server_queue_keeps_busy_servers_bounded() {
    let config = TestHarness::single_queue(
        Some(6),
        3,
        TimeRange::new(0.2, 0.6),
        TimeRange::new(1.0, 2.5),
    )
    .with_draw_budget(20_000);
    let mut h = TestHarness::new(config);

    let report = h.run_checked();

    let q = &report.queues[0];
    assert!(q.max_occupancy <= 6);
    assert!(q.lost > 0, "an overloaded G/G/3/6 station must lose clients");
    assert!(q.server_utilization <= 1.0 + 1e-12);
    assert!(q.mean_waiting <= q.mean_occupancy);
    assert_eq!(q.kendall, "G/G/3/6");
}

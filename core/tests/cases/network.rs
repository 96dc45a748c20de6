use crate::common::{assert_close, feedback_network, TestHarness};
use qnet_core::*;

#[test]
fn test_feedback_network_statistics_cover_whole_run() {
    let mut h = TestHarness::new(feedback_network());

    let report = h.run_checked();

    for q in &report.queues {
        assert_close(q.total_time(), report.final_time);
        let mass: f64 = q.probabilities().iter().sum();
        assert_close(mass, 1.0);
        assert!(q.utilization >= 0.0 && q.utilization <= 1.0);
        if let Some(cap) = q.capacity {
            assert!(q.occupancy_times.len() == cap as usize + 1);
        }
    }
    assert_eq!(report.queues[1].kendall, "G/G/2/5");
    assert_eq!(report.queues[0].kendall, "G/G/1");
}

#[test]
fn test_feedback_network_aggregates() {
    let mut h = TestHarness::new(feedback_network());

    let report = h.run_checked();

    let admitted: u64 = report.queues.iter().map(|q| q.admitted).sum();
    let lost: u64 = report.queues.iter().map(|q| q.lost).sum();
    assert_eq!(report.total_admitted, admitted);
    assert_eq!(report.total_lost, lost);
    assert_eq!(report.total_external_arrivals, report.queues[0].external_arrivals);
    assert_eq!(report.queues[1].external_arrivals, 0);
    assert!(report.total_completed > 0);
    assert!(report.total_completed <= report.total_external_arrivals);
}

#[test]
fn test_mean_occupancy_matches_table() {
    let mut h = TestHarness::new(feedback_network());

    let report = h.run_checked();

    for q in &report.queues {
        let weighted: f64 = q
            .occupancy_times
            .iter()
            .enumerate()
            .map(|(level, t)| level as f64 * t)
            .sum();
        assert_close(q.mean_occupancy, weighted / report.final_time);
        if q.throughput > 0.0 {
            assert_close(q.mean_response_time, q.mean_occupancy / q.throughput);
        }
    }
}

#[test]
fn test_snapshot_reflects_live_state() {
    let mut sim = Simulation::new(&feedback_network()).unwrap();
    for _ in 0..50 {
        sim.step().unwrap();
    }
    let snapshot = sim.snapshot();
    assert_eq!(snapshot["queues"].as_array().map(Vec::len), Some(3));
    assert_eq!(snapshot["time"].as_f64(), Some(sim.time()));
    assert_eq!(
        snapshot["queues"][0]["occupancy"].as_u64(),
        Some(sim.queues()[0].occupancy() as u64)
    );
}

#[test]
fn test_report_json_round_trip() {
    let report = Simulation::new(&feedback_network().with_draw_budget(2_000))
        .unwrap()
        .run()
        .unwrap();
    let json = report.to_json().unwrap();
    let back: SimulationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.queues.len(), report.queues.len());
    assert_eq!(back.total_completed, report.total_completed);
}

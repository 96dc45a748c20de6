use crate::common::feedback_network;
use qnet_core::*;

#[test]
fn test_replications_match_individual_runs() {
    let config = feedback_network().with_draw_budget(10_000);
    let seeds = derive_seeds(42, 4);

    let reports = replicate(&config, &seeds).unwrap();

    assert_eq!(reports.len(), 4);
    for (seed, report) in seeds.iter().zip(&reports) {
        let solo = Simulation::new(&config.clone().with_seed(*seed))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(report.seed, *seed);
        assert_eq!(*report, solo);
    }
}

#[test]
fn test_summary_aggregates_each_queue() {
    let config = feedback_network().with_draw_budget(10_000);
    let reports = replicate(&config, &derive_seeds(7, 5)).unwrap();

    let summary = ReplicationSummary::from_reports(&reports);

    assert_eq!(summary.replications, 5);
    assert_eq!(summary.queues.len(), 3);
    let mean_q1: f64 = reports.iter().map(|r| r.queues[0].mean_occupancy).sum::<f64>() / 5.0;
    assert!((summary.queues[0].mean_occupancy.mean - mean_q1).abs() < 1e-12);
    assert!(summary.final_time.std_dev > 0.0);
}

#[test]
fn test_replication_rejects_invalid_network() {
    let config = NetworkConfig::new(Vec::new()).with_horizon(1.0);
    assert_eq!(
        replicate(&config, &[1, 2]).err(),
        Some(SimError::Config(ConfigError::EmptyNetwork))
    );
}

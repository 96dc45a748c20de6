use crate::common::{feedback_network, TestHarness};
use qnet_core::*;

#[test]
fn test_determinism_across_runs() {
    let seed = 12345;

    let mut h1 = TestHarness::new(feedback_network().with_seed(seed));
    let r1 = h1.run_checked();

    let mut h2 = TestHarness::new(feedback_network().with_seed(seed));
    let r2 = h2.run_checked();

    assert_eq!(r1.final_time.to_bits(), r2.final_time.to_bits());
    assert_eq!(r1.total_lost, r2.total_lost);
    assert_eq!(r1.total_completed, r2.total_completed);
    for (q1, q2) in r1.queues.iter().zip(&r2.queues) {
        assert_eq!(q1.lost, q2.lost, "loss mismatch at queue {}", q1.id);
        assert_eq!(q1.served, q2.served, "served mismatch at queue {}", q1.id);
        let bits1: Vec<u64> = q1.occupancy_times.iter().map(|t| t.to_bits()).collect();
        let bits2: Vec<u64> = q2.occupancy_times.iter().map(|t| t.to_bits()).collect();
        assert_eq!(bits1, bits2, "occupancy table mismatch at queue {}", q1.id);
    }
    assert_eq!(r1, r2);
}

#[test]
fn test_determinism_with_different_seeds() {
    let r1 = Simulation::new(&feedback_network().with_seed(100))
        .unwrap()
        .run()
        .unwrap();
    let r2 = Simulation::new(&feedback_network().with_seed(200))
        .unwrap()
        .run()
        .unwrap();

    assert_ne!(
        r1.final_time, r2.final_time,
        "Different seeds should produce different results"
    );
}

#[test]
fn test_step_by_step_matches_run() {
    let mut stepped = Simulation::new(&feedback_network()).unwrap();
    while stepped.step().unwrap() {}
    stepped.finalize();
    let stepped = SimulationReport::from_simulation(&stepped);

    let ran = Simulation::new(&feedback_network()).unwrap().run().unwrap();
    assert_eq!(stepped, ran);
}

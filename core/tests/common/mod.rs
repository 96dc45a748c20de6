use qnet_core::*;

pub const TOLERANCE: f64 = 1e-9;

pub struct TestHarness {
    pub sim: Simulation,
}

impl TestHarness {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            sim: Simulation::new(&config).expect("valid test network"),
        }
    }

    /// Single station fed from outside; clients leave after service.
    pub fn single_queue(
        capacity: Option<u32>,
        servers: u32,
        arrival: TimeRange,
        service: TimeRange,
    ) -> NetworkConfig {
        let mut queue = QueueConfig::new(servers, service).with_arrivals(arrival);
        queue.capacity = capacity;
        NetworkConfig::new(vec![queue]).with_start_offset(0.0)
    }

    /// Steps to termination, checking the per-queue invariants after every event.
    pub fn run_checked(&mut self) -> SimulationReport {
        while self.sim.step().expect("engine invariant") {
            self.assert_invariants();
        }
        self.sim.finalize();
        SimulationReport::from_simulation(&self.sim)
    }

    pub fn assert_invariants(&self) {
        let now = self.sim.time();
        for q in self.sim.queues() {
            if let Some(cap) = q.capacity() {
                assert!(q.occupancy() <= cap, "queue {} over capacity", q.id());
            }
            assert_eq!(q.busy_servers(), q.occupancy().min(q.servers()));
            assert!(q.last_update() <= now);
            assert_close(q.table().total(), now);
        }
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= TOLERANCE * scale,
        "expected {} got {}",
        expected,
        actual
    );
}

/// Three stations with feedback: 1 -> {2, 3}, 2 -> {1, exit}, 3 -> {2, exit}.
pub fn feedback_network() -> NetworkConfig {
    NetworkConfig::new(vec![
        QueueConfig::new(1, TimeRange::new(1.0, 2.0))
            .with_arrivals(TimeRange::new(2.0, 4.0))
            .with_route(RouteTarget::Queue(1), 0.8)
            .with_route(RouteTarget::Queue(2), 0.2),
        QueueConfig::new(2, TimeRange::new(4.0, 8.0))
            .with_capacity(5)
            .with_route(RouteTarget::Queue(0), 0.3)
            .with_route(RouteTarget::Exit, 0.5),
        QueueConfig::new(2, TimeRange::new(5.0, 15.0))
            .with_capacity(10)
            .with_route(RouteTarget::Queue(1), 0.7)
            .with_route(RouteTarget::Exit, 0.3),
    ])
    .with_draw_budget(100_000)
}

use crate::config::TimeRange;
use crate::engine::{Simulation, StopReason};
use crate::queue::Queue;
use crate::traits::QueueId;
use serde::{Deserialize, Serialize};

/// Final state of one queue, with the measures derived from its occupancy table.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct QueueReport {
    pub id: QueueId,
    pub name: String,
    pub kendall: String,
    pub servers: u32,
    pub capacity: Option<u32>,
    pub service: TimeRange,
    pub arrival: Option<TimeRange>,
    /// Simulated time spent at each occupancy level.
    pub occupancy_times: Vec<f64>,
    pub max_occupancy: u32,
    pub external_arrivals: u64,
    pub admitted: u64,
    pub lost: u64,
    pub served: u64,
    /// 1 - P(empty).
    pub utilization: f64,
    /// Busy-server time over available server time.
    pub server_utilization: f64,
    pub mean_occupancy: f64,
    pub mean_waiting: f64,
    pub throughput: f64,
    /// Little's law estimate, zero when nothing was served.
    pub mean_response_time: f64,
}

impl QueueReport {
    pub fn from_queue(queue: &Queue, total_time: f64) -> Self {
        let table = queue.table();
        let servers = queue.servers();
        let cfg = queue.config();
        let (utilization, server_utilization, throughput) = if total_time > 0.0 {
            (
                1.0 - table.time_at(0) / total_time,
                table.busy_time() / (servers as f64 * total_time),
                queue.served() as f64 / total_time,
            )
        } else {
            (0.0, 0.0, 0.0)
        };
        let mean_occupancy = table.mean_level();
        let mean_response_time = if throughput > 0.0 {
            mean_occupancy / throughput
        } else {
            0.0
        };

        Self {
            id: queue.id(),
            name: queue.name(),
            kendall: kendall_notation(servers, queue.capacity()),
            servers,
            capacity: queue.capacity(),
            service: cfg.service,
            arrival: cfg.arrival,
            occupancy_times: table.times().to_vec(),
            max_occupancy: table.max_level(),
            external_arrivals: queue.external_arrivals(),
            admitted: queue.admitted(),
            lost: queue.lost(),
            served: queue.served(),
            utilization,
            server_utilization,
            mean_occupancy,
            mean_waiting: table.mean_waiting(servers),
            throughput,
            mean_response_time,
        }
    }

    pub fn total_time(&self) -> f64 {
        self.occupancy_times.iter().sum()
    }

    /// Steady-state probability estimate of each occupancy level.
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total_time();
        if total <= 0.0 {
            return vec![0.0; self.occupancy_times.len()];
        }
        self.occupancy_times.iter().map(|t| t / total).collect()
    }
}

pub fn kendall_notation(servers: u32, capacity: Option<u32>) -> String {
    match capacity {
        Some(k) => format!("G/G/{}/{}", servers, k),
        None => format!("G/G/{}", servers),
    }
}

/// Immutable result of a finished run.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SimulationReport {
    pub seed: u64,
    pub final_time: f64,
    pub draws: u64,
    pub events_processed: u64,
    pub stop_reason: Option<StopReason>,
    pub queues: Vec<QueueReport>,
    pub total_external_arrivals: u64,
    pub total_admitted: u64,
    pub total_lost: u64,
    pub total_completed: u64,
}

impl SimulationReport {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let final_time = sim.time();
        let queues: Vec<QueueReport> = sim
            .queues()
            .iter()
            .map(|q| QueueReport::from_queue(q, final_time))
            .collect();
        Self {
            seed: sim.seed(),
            final_time,
            draws: sim.draws(),
            events_processed: sim.processed_events(),
            stop_reason: sim.stop_reason(),
            total_external_arrivals: queues.iter().map(|q| q.external_arrivals).sum(),
            total_admitted: queues.iter().map(|q| q.admitted).sum(),
            total_lost: queues.iter().map(|q| q.lost).sum(),
            total_completed: sim.completed(),
            queues,
        }
    }

    pub fn queue(&self, id: QueueId) -> Option<&QueueReport> {
        self.queues.get(id as usize)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

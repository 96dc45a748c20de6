//! Independent replications of one network.
//!
//! Each seed gets its own [`Simulation`] with a private generator, so runs share
//! nothing and can be spread over rayon's pool. Inside a run the event loop stays
//! sequential, which keeps every replication reproducible on its own.

use crate::analytics::{QueueReport, SimulationReport};
use crate::config::NetworkConfig;
use crate::engine::Simulation;
use crate::error::SimResult;
use crate::traits::QueueId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reports come back in the order of `seeds`.
pub fn replicate(config: &NetworkConfig, seeds: &[u64]) -> SimResult<Vec<SimulationReport>> {
    config.validate()?;
    info!(replications = seeds.len(), "Starting replications");
    seeds
        .par_iter()
        .map(|&seed| {
            let cfg = config.clone().with_seed(seed);
            Simulation::new(&cfg)?.run()
        })
        .collect()
}

/// Deterministic replication seeds derived from `base`.
pub fn derive_seeds(base: u64, count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(base);
    (0..count).map(|_| rng.gen()).collect()
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Estimate {
    pub mean: f64,
    /// Sample standard deviation, zero for fewer than two samples.
    pub std_dev: f64,
}

impl Estimate {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std_dev = if samples.len() > 1 {
            let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        Self { mean, std_dev }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct QueueSummary {
    pub id: QueueId,
    pub name: String,
    pub mean_occupancy: Estimate,
    pub utilization: Estimate,
    pub lost: Estimate,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ReplicationSummary {
    pub replications: usize,
    pub final_time: Estimate,
    pub total_completed: Estimate,
    pub queues: Vec<QueueSummary>,
}

impl ReplicationSummary {
    pub fn from_reports(reports: &[SimulationReport]) -> Self {
        let queues: Vec<QueueSummary> = reports
            .first()
            .map(|first| {
                first
                    .queues
                    .iter()
                    .enumerate()
                    .map(|(idx, q)| QueueSummary {
                        id: q.id,
                        name: q.name.clone(),
                        mean_occupancy: queue_estimate(reports, idx, |q| q.mean_occupancy),
                        utilization: queue_estimate(reports, idx, |q| q.utilization),
                        lost: queue_estimate(reports, idx, |q| q.lost as f64),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            replications: reports.len(),
            final_time: estimate(reports, |r| r.final_time),
            total_completed: estimate(reports, |r| r.total_completed as f64),
            queues,
        }
    }
}

fn estimate<T>(items: &[T], f: impl Fn(&T) -> f64) -> Estimate {
    let samples: Vec<f64> = items.iter().map(f).collect();
    Estimate::from_samples(&samples)
}

fn queue_estimate(
    reports: &[SimulationReport],
    idx: usize,
    f: impl Fn(&QueueReport) -> f64,
) -> Estimate {
    estimate(reports, |r| r.queues.get(idx).map_or(0.0, &f))
}

use crate::traits::QueueId;
use thiserror::Error;

/// Topology or parameter problems detected before a run starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("network has no queues")]
    EmptyNetwork,

    #[error("queue {queue}: server count must be at least 1")]
    NoServers { queue: QueueId },

    #[error("queue {queue}: capacity must be at least 1")]
    ZeroCapacity { queue: QueueId },

    #[error("queue {queue}: invalid {kind} range {min}..{max}")]
    InvalidRange {
        queue: QueueId,
        kind: &'static str,
        min: f64,
        max: f64,
    },

    #[error("queue {queue}: route probability {probability} is outside [0, 1]")]
    InvalidProbability { queue: QueueId, probability: f64 },

    #[error("queue {queue}: routing probabilities sum to {total}, more than 1")]
    ProbabilityMass { queue: QueueId, total: f64 },

    #[error("queue {queue}: route targets unknown queue {target}")]
    UnknownRouteTarget { queue: QueueId, target: QueueId },

    #[error("queue {queue}: routing cycle of zero-length services stalls the clock; set a draw budget")]
    ZeroTimeCycle { queue: QueueId },

    #[error("no termination condition: set a horizon or a draw budget")]
    NoTermination,

    #[error("horizon must be a finite non-negative time, got {0}")]
    InvalidHorizon(f64),

    #[error("start offset must be a finite non-negative time, got {0}")]
    InvalidStartOffset(f64),

    #[error("generator modulus must be in 2..=2^53 and the multiplier non-zero")]
    InvalidGenerator,

    #[error("network has {0} queues, more than queue ids can address")]
    TooManyQueues(usize),
}

/// Engine states that can only be reached through a bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("event references unknown queue {0}")]
    UnknownQueue(QueueId),

    #[error("service completion at queue {0} while it is empty")]
    EmptyRelease(QueueId),

    #[error("clock would move backwards from {now} to {next}")]
    ClockRegression { now: f64, next: f64 },

    #[error("queue {0} does not accept external arrivals")]
    NoExternalArrivals(QueueId),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

pub type SimResult<T> = Result<T, SimError>;

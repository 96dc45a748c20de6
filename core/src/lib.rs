pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod queue;
pub mod replication;
pub mod rng;
pub mod stats;
pub mod traits;

pub use analytics::{kendall_notation, QueueReport, SimulationReport};
pub use config::{NetworkConfig, QueueConfig, Route, RouteTarget, TimeRange};
pub use engine::{Simulation, StopReason};
pub use error::{ConfigError, InvariantViolation, SimError, SimResult};
pub use event::{Event, EventKind, EventQueue};
pub use queue::{Admission, Queue, QueueSnapshot};
pub use replication::{derive_seeds, replicate, Estimate, ReplicationSummary};
pub use rng::{Lcg, LcgParams};
pub use stats::OccupancyTable;
pub use traits::{QueueId, RandomSource};

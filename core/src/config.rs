use crate::error::ConfigError;
use crate::rng::LcgParams;
use crate::traits::QueueId;
use serde::{Deserialize, Serialize};

/// Slack allowed when probabilities are summed.
pub const PROBABILITY_EPSILON: f64 = 1e-9;

pub const DEFAULT_SEED: u64 = 123_456_789;
pub const DEFAULT_START_OFFSET: f64 = 2.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate range that always samples `value`.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    fn check(&self, queue: QueueId, kind: &'static str) -> Result<(), ConfigError> {
        let valid = self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                queue,
                kind,
                min: self.min,
                max: self.max,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    Queue(QueueId),
    Exit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub target: RouteTarget,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueConfig {
    #[serde(default)]
    pub name: Option<String>,
    /// `None` is an infinite waiting room.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default = "default_servers")]
    pub servers: u32,
    pub service: TimeRange,
    /// Present iff the queue receives clients from outside the network.
    #[serde(default)]
    pub arrival: Option<TimeRange>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

fn default_servers() -> u32 {
    1
}

impl QueueConfig {
    pub fn new(servers: u32, service: TimeRange) -> Self {
        Self {
            name: None,
            capacity: None,
            servers,
            service,
            arrival: None,
            routes: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_arrivals(mut self, arrival: TimeRange) -> Self {
        self.arrival = Some(arrival);
        self
    }

    pub fn with_route(mut self, target: RouteTarget, probability: f64) -> Self {
        self.routes.push(Route { target, probability });
        self
    }

    pub fn routing_mass(&self) -> f64 {
        self.routes.iter().map(|r| r.probability).sum()
    }

    fn validate(&self, id: QueueId, queue_count: usize) -> Result<(), ConfigError> {
        if self.servers == 0 {
            return Err(ConfigError::NoServers { queue: id });
        }
        if self.capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity { queue: id });
        }
        self.service.check(id, "service")?;
        if let Some(arrival) = &self.arrival {
            arrival.check(id, "arrival")?;
            // Gaps that are always zero never let the clock move.
            if arrival.max <= 0.0 {
                return Err(ConfigError::InvalidRange {
                    queue: id,
                    kind: "arrival",
                    min: arrival.min,
                    max: arrival.max,
                });
            }
        }
        for route in &self.routes {
            if !(0.0..=1.0).contains(&route.probability) {
                return Err(ConfigError::InvalidProbability {
                    queue: id,
                    probability: route.probability,
                });
            }
            if let RouteTarget::Queue(target) = route.target {
                if target as usize >= queue_count {
                    return Err(ConfigError::UnknownRouteTarget { queue: id, target });
                }
            }
        }
        let total = self.routing_mass();
        if total > 1.0 + PROBABILITY_EPSILON {
            return Err(ConfigError::ProbabilityMass { queue: id, total });
        }
        Ok(())
    }
}

/// Complete description of one run: topology plus global parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Queue id is the position in this list.
    pub queues: Vec<QueueConfig>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_start_offset")]
    pub start_offset: f64,
    #[serde(default)]
    pub horizon: Option<f64>,
    #[serde(default)]
    pub draw_budget: Option<u64>,
    #[serde(default)]
    pub generator: LcgParams,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_start_offset() -> f64 {
    DEFAULT_START_OFFSET
}

impl NetworkConfig {
    pub fn new(queues: Vec<QueueConfig>) -> Self {
        Self {
            queues,
            seed: DEFAULT_SEED,
            start_offset: DEFAULT_START_OFFSET,
            horizon: None,
            draw_budget: None,
            generator: LcgParams::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_start_offset(mut self, offset: f64) -> Self {
        self.start_offset = offset;
        self
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    pub fn with_draw_budget(mut self, budget: u64) -> Self {
        self.draw_budget = Some(budget);
        self
    }

    pub fn with_generator(mut self, params: LcgParams) -> Self {
        self.generator = params;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queues.is_empty() {
            return Err(ConfigError::EmptyNetwork);
        }
        if QueueId::try_from(self.queues.len()).is_err() {
            return Err(ConfigError::TooManyQueues(self.queues.len()));
        }
        if self.horizon.is_none() && self.draw_budget.is_none() {
            return Err(ConfigError::NoTermination);
        }
        if let Some(h) = self.horizon {
            if !h.is_finite() || h < 0.0 {
                return Err(ConfigError::InvalidHorizon(h));
            }
        }
        if !self.start_offset.is_finite() || self.start_offset < 0.0 {
            return Err(ConfigError::InvalidStartOffset(self.start_offset));
        }
        self.generator.validate()?;
        for (idx, queue) in self.queues.iter().enumerate() {
            queue.validate(idx as QueueId, self.queues.len())?;
        }
        if self.draw_budget.is_none() {
            if let Some(queue) = self.zero_time_cycle() {
                return Err(ConfigError::ZeroTimeCycle { queue });
            }
        }
        Ok(())
    }

    /// A queue on a routing cycle whose services all take zero time. Clients
    /// can circle such a cycle without the clock advancing, so only the draw
    /// budget bounds the run. Route targets must already be validated.
    fn zero_time_cycle(&self) -> Option<QueueId> {
        #[derive(Clone, Copy, PartialEq)]
        enum Visit {
            New,
            Open,
            Done,
        }

        let instant: Vec<bool> = self.queues.iter().map(|q| q.service.max <= 0.0).collect();
        let mut visit = vec![Visit::New; self.queues.len()];

        for start in 0..self.queues.len() {
            if !instant[start] || visit[start] != Visit::New {
                continue;
            }
            visit[start] = Visit::Open;
            let mut stack = vec![(start, 0usize)];
            while let Some((node, edge)) = stack.pop() {
                let routes = &self.queues[node].routes;
                let Some(route) = routes.get(edge) else {
                    visit[node] = Visit::Done;
                    continue;
                };
                stack.push((node, edge + 1));
                let RouteTarget::Queue(next) = route.target else {
                    continue;
                };
                let next = next as usize;
                if route.probability <= 0.0 || !instant[next] {
                    continue;
                }
                match visit[next] {
                    Visit::Open => return Some(next as QueueId),
                    Visit::New => {
                        visit[next] = Visit::Open;
                        stack.push((next, 0));
                    }
                    Visit::Done => {}
                }
            }
        }
        None
    }
}

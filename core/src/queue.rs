use crate::config::{QueueConfig, RouteTarget, PROBABILITY_EPSILON};
use crate::error::InvariantViolation;
use crate::stats::OccupancyTable;
use crate::traits::{QueueId, RandomSource};
use serde::Serialize;

/// Outcome of offering a client to a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// `starts_service` is set when a server was free, so a completion must be scheduled.
    Accepted { starts_service: bool },
    /// The waiting room was full; counted as a loss.
    Rejected,
}

/// One service station and its running statistics.
///
/// Occupancy counts every client present, waiting or in service. Busy servers
/// are always `min(occupancy, servers)`.
#[derive(Debug, Clone)]
pub struct Queue {
    id: QueueId,
    config: QueueConfig,
    occupancy: u32,
    busy_servers: u32,
    table: OccupancyTable,
    admitted: u64,
    lost: u64,
    served: u64,
    arrivals: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    pub id: QueueId,
    pub occupancy: u32,
    pub busy_servers: u32,
    pub admitted: u64,
    pub lost: u64,
    pub served: u64,
}

impl Queue {
    pub fn new(id: QueueId, config: QueueConfig) -> Self {
        let table = OccupancyTable::with_levels(config.capacity);
        Self {
            id,
            config,
            occupancy: 0,
            busy_servers: 0,
            table,
            admitted: 0,
            lost: 0,
            served: 0,
            arrivals: 0,
        }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn name(&self) -> String {
        self.config
            .name
            .clone()
            .unwrap_or_else(|| (self.id + 1).to_string())
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn busy_servers(&self) -> u32 {
        self.busy_servers
    }

    pub fn capacity(&self) -> Option<u32> {
        self.config.capacity
    }

    pub fn servers(&self) -> u32 {
        self.config.servers
    }

    pub fn accepts_external(&self) -> bool {
        self.config.arrival.is_some()
    }

    pub fn admitted(&self) -> u64 {
        self.admitted
    }

    pub fn lost(&self) -> u64 {
        self.lost
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    /// External arrivals offered to this queue, admitted or not.
    pub fn external_arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn table(&self) -> &OccupancyTable {
        &self.table
    }

    pub fn last_update(&self) -> f64 {
        self.table.last_update()
    }

    pub fn can_admit(&self) -> bool {
        self.config.capacity.map_or(true, |cap| self.occupancy < cap)
    }

    /// Integrates the time since the last update into the current occupancy level.
    pub fn advance(&mut self, now: f64) {
        self.table.advance(self.occupancy, self.busy_servers, now);
    }

    pub fn note_external_arrival(&mut self) {
        self.arrivals += 1;
    }

    pub fn admit(&mut self, now: f64) -> Admission {
        if !self.can_admit() {
            self.lost += 1;
            return Admission::Rejected;
        }
        self.advance(now);
        self.occupancy += 1;
        self.busy_servers = self.occupancy.min(self.config.servers);
        self.table.observe(self.occupancy);
        self.admitted += 1;
        Admission::Accepted {
            starts_service: self.occupancy <= self.config.servers,
        }
    }

    /// Removes the client whose service just finished.
    ///
    /// Returns whether a waiting client takes the freed server, or `None` when
    /// the queue was already empty.
    pub fn release(&mut self, now: f64) -> Option<bool> {
        if self.occupancy == 0 {
            return None;
        }
        self.advance(now);
        self.occupancy -= 1;
        self.busy_servers = self.occupancy.min(self.config.servers);
        self.served += 1;
        Some(self.occupancy >= self.config.servers)
    }

    /// Closes the final interval. Call once the event loop has stopped.
    pub fn finalize(&mut self, end: f64) {
        self.advance(end);
    }

    pub fn sample_service_time(&self, rng: &mut impl RandomSource) -> f64 {
        let range = self.config.service;
        rng.next_in_range(range.min, range.max)
    }

    pub fn sample_arrival_gap(&self, rng: &mut impl RandomSource) -> Result<f64, InvariantViolation> {
        let range = self
            .config
            .arrival
            .ok_or(InvariantViolation::NoExternalArrivals(self.id))?;
        Ok(rng.next_in_range(range.min, range.max))
    }

    /// Draws the next hop of a client leaving service.
    pub fn choose_route(&self, rng: &mut impl RandomSource) -> RouteTarget {
        let routes = &self.config.routes;
        let Some(last) = routes.last() else {
            return RouteTarget::Exit;
        };
        let u = rng.next_uniform();
        let mut cumulative = 0.0;
        for route in routes {
            cumulative += route.probability;
            if u < cumulative {
                return route.target;
            }
        }
        // A table summing to one only falls through on rounding.
        if cumulative >= 1.0 - PROBABILITY_EPSILON {
            last.target
        } else {
            RouteTarget::Exit
        }
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            id: self.id,
            occupancy: self.occupancy,
            busy_servers: self.busy_servers,
            admitted: self.admitted,
            lost: self.lost,
            served: self.served,
        }
    }
}

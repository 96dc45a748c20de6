use serde::{Deserialize, Serialize};

/// Time-weighted histogram of occupancy levels for one queue.
///
/// `times[level]` is the simulated time the queue spent with exactly `level`
/// clients. The table only ever integrates forward: each call to
/// [`OccupancyTable::advance`] books `now - last_update` against the level the
/// queue held during that interval, so at every evaluation point the sum of all
/// levels equals the elapsed time since the start of the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OccupancyTable {
    times: Vec<f64>,
    busy_time: f64,
    last_update: f64,
    max_level: u32,
}

impl OccupancyTable {
    /// Pre-sizes the table for a bounded queue so every reachable level is present.
    pub fn with_levels(capacity: Option<u32>) -> Self {
        let levels = capacity.map_or(1, |c| c as usize + 1);
        Self {
            times: vec![0.0; levels],
            ..Default::default()
        }
    }

    /// Books the interval `[last_update, now]` at `level` with `busy` servers working.
    pub fn advance(&mut self, level: u32, busy: u32, now: f64) {
        let elapsed = now - self.last_update;
        if elapsed > 0.0 {
            let idx = level as usize;
            if idx >= self.times.len() {
                self.times.resize(idx + 1, 0.0);
            }
            self.times[idx] += elapsed;
            self.busy_time += busy as f64 * elapsed;
        }
        if now > self.last_update {
            self.last_update = now;
        }
    }

    /// Records that `level` has been reached; the time spent there is booked later.
    pub fn observe(&mut self, level: u32) {
        self.max_level = self.max_level.max(level);
        let idx = level as usize;
        if idx >= self.times.len() {
            self.times.resize(idx + 1, 0.0);
        }
    }

    pub fn last_update(&self) -> f64 {
        self.last_update
    }

    pub fn time_at(&self, level: u32) -> f64 {
        self.times.get(level as usize).copied().unwrap_or(0.0)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn total(&self) -> f64 {
        self.times.iter().sum()
    }

    /// Integral of busy servers over time.
    pub fn busy_time(&self) -> f64 {
        self.busy_time
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Fraction of time at each level. All zeros when no time has elapsed.
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total();
        if total <= 0.0 {
            return vec![0.0; self.times.len()];
        }
        self.times.iter().map(|t| t / total).collect()
    }

    pub fn mean_level(&self) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .times
            .iter()
            .enumerate()
            .map(|(level, t)| level as f64 * t)
            .sum();
        weighted / total
    }

    /// Mean number of clients waiting for a server.
    pub fn mean_waiting(&self, servers: u32) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .times
            .iter()
            .enumerate()
            .map(|(level, t)| (level as f64 - servers as f64).max(0.0) * t)
            .sum();
        weighted / total
    }
}

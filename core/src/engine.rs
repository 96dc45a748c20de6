use crate::analytics::SimulationReport;
use crate::config::{NetworkConfig, RouteTarget};
use crate::error::{InvariantViolation, SimResult};
use crate::event::{Event, EventKind, EventQueue};
use crate::queue::{Admission, Queue, QueueSnapshot};
use crate::rng::Lcg;
use crate::traits::{QueueId, RandomSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    EventsExhausted,
    HorizonReached,
    DrawBudgetExhausted,
}

/// One replication: the queues, the generator, the pending events and the clock.
///
/// The loop is strictly sequential. Every pop advances the clock to the event's
/// time, brings all queues' statistics up to that instant, then dispatches.
pub struct Simulation {
    time: f64,
    queues: Vec<Queue>,
    events: EventQueue,
    rng: Lcg,
    seed: u64,
    horizon: Option<f64>,
    draw_budget: Option<u64>,
    processed: u64,
    completed: u64,
    stop: Option<StopReason>,
    finalized: bool,
}

impl Simulation {
    /// Validates `config` and schedules the first external arrival of every entry queue.
    pub fn new(config: &NetworkConfig) -> SimResult<Self> {
        config.validate()?;
        let queues: Vec<Queue> = config
            .queues
            .iter()
            .enumerate()
            .map(|(idx, cfg)| Queue::new(idx as QueueId, cfg.clone()))
            .collect();

        let mut events = EventQueue::new();
        for queue in queues.iter().filter(|q| q.accepts_external()) {
            events.push(Event::arrival(config.start_offset, queue.id()));
        }

        info!(
            seed = config.seed,
            queues = queues.len(),
            entry_queues = events.len(),
            horizon = ?config.horizon,
            draw_budget = ?config.draw_budget,
            "Simulation initialized"
        );

        Ok(Self {
            time: 0.0,
            queues,
            events,
            rng: Lcg::with_params(config.seed, config.generator),
            seed: config.seed,
            horizon: config.horizon,
            draw_budget: config.draw_budget,
            processed: 0,
            completed: 0,
            stop: None,
            finalized: false,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn queues(&self) -> &[Queue] {
        &self.queues
    }

    pub fn queue(&self, id: QueueId) -> Option<&Queue> {
        self.queues.get(id as usize)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn draws(&self) -> u64 {
        self.rng.draws()
    }

    pub fn processed_events(&self) -> u64 {
        self.processed
    }

    /// Clients that left the network through an exit route.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Processes the next event. Returns `false` once a termination condition holds.
    pub fn step(&mut self) -> SimResult<bool> {
        if self.stop.is_some() {
            return Ok(false);
        }
        if let Some(budget) = self.draw_budget {
            if self.rng.draws() >= budget {
                return self.halt(StopReason::DrawBudgetExhausted);
            }
        }
        let Some(due) = self.events.peek_time() else {
            return self.halt(StopReason::EventsExhausted);
        };
        if let Some(horizon) = self.horizon {
            if due > horizon {
                self.advance_clock(horizon)?;
                return self.halt(StopReason::HorizonReached);
            }
        }
        let Some(event) = self.events.pop() else {
            return self.halt(StopReason::EventsExhausted);
        };

        self.advance_clock(event.time)?;
        self.processed += 1;
        trace!(time = event.time, kind = ?event.kind, "Processing event");
        self.dispatch(event)?;
        Ok(true)
    }

    /// Runs to termination, closes the statistics and builds the report.
    pub fn run(&mut self) -> SimResult<SimulationReport> {
        while self.step()? {}
        self.finalize();
        Ok(SimulationReport::from_simulation(self))
    }

    /// Books the last interval of every queue at the final clock value. Idempotent.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        for queue in &mut self.queues {
            queue.finalize(self.time);
        }
        self.finalized = true;
        info!(
            time = self.time,
            draws = self.rng.draws(),
            events = self.processed,
            completed = self.completed,
            reason = ?self.stop,
            "Simulation finished"
        );
    }

    pub fn snapshot(&self) -> serde_json::Value {
        let queues: Vec<QueueSnapshot> = self.queues.iter().map(Queue::snapshot).collect();
        serde_json::json!({
            "time": self.time,
            "draws": self.rng.draws(),
            "pending_events": self.events.len(),
            "completed": self.completed,
            "queues": queues,
        })
    }

    fn halt(&mut self, reason: StopReason) -> SimResult<bool> {
        debug!(time = self.time, ?reason, "Termination condition reached");
        self.stop = Some(reason);
        Ok(false)
    }

    fn advance_clock(&mut self, next: f64) -> SimResult<()> {
        if next < self.time {
            return Err(InvariantViolation::ClockRegression {
                now: self.time,
                next,
            }
            .into());
        }
        self.time = next;
        for queue in &mut self.queues {
            queue.advance(next);
        }
        Ok(())
    }

    fn schedule(&mut self, event: Event) {
        self.events.push(event);
    }

    fn dispatch(&mut self, event: Event) -> SimResult<()> {
        match event.kind {
            EventKind::Arrival { destination } => self.on_arrival(destination),
            EventKind::Transfer {
                origin,
                destination,
            } => self.on_transfer(origin, destination),
            EventKind::Departure { origin } => self.on_service_complete(origin),
        }
    }

    fn index(&self, id: QueueId) -> SimResult<usize> {
        let idx = id as usize;
        if idx < self.queues.len() {
            Ok(idx)
        } else {
            Err(InvariantViolation::UnknownQueue(id).into())
        }
    }

    fn on_arrival(&mut self, id: QueueId) -> SimResult<()> {
        let idx = self.index(id)?;
        self.queues[idx].note_external_arrival();
        self.admit(idx);
        let gap = self.queues[idx].sample_arrival_gap(&mut self.rng)?;
        self.schedule(Event::arrival(self.time + gap, id));
        Ok(())
    }

    fn on_transfer(&mut self, origin: QueueId, destination: QueueId) -> SimResult<()> {
        let idx = self.index(destination)?;
        trace!(time = self.time, origin, destination, "Transfer");
        self.admit(idx);
        Ok(())
    }

    fn on_service_complete(&mut self, id: QueueId) -> SimResult<()> {
        let idx = self.index(id)?;
        let now = self.time;
        let queue = &mut self.queues[idx];
        let next_in_line = queue
            .release(now)
            .ok_or(InvariantViolation::EmptyRelease(id))?;
        if next_in_line {
            let service = queue.sample_service_time(&mut self.rng);
            self.schedule(Event::departure(now + service, id));
        }

        match self.queues[idx].choose_route(&mut self.rng) {
            RouteTarget::Exit => {
                self.completed += 1;
                Ok(())
            }
            // The hand-over happens at the same instant; it never waits in the event set.
            RouteTarget::Queue(destination) => self.dispatch(Event::transfer(now, id, destination)),
        }
    }

    fn admit(&mut self, idx: usize) {
        let now = self.time;
        let queue = &mut self.queues[idx];
        match queue.admit(now) {
            Admission::Accepted {
                starts_service: true,
            } => {
                let service = queue.sample_service_time(&mut self.rng);
                let id = queue.id();
                self.schedule(Event::departure(now + service, id));
            }
            Admission::Accepted {
                starts_service: false,
            } => {}
            Admission::Rejected => {
                debug!(time = now, queue = queue.id(), lost = queue.lost(), "Client lost, queue full");
            }
        }
    }
}

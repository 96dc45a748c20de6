use crate::traits::QueueId;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum EventKind {
    /// A client reaches `destination` from outside the network.
    Arrival { destination: QueueId },
    /// A client finished at `origin` moves on to `destination`.
    Transfer {
        origin: QueueId,
        destination: QueueId,
    },
    /// A server at `origin` finishes; the client's next hop is drawn when this fires.
    Departure { origin: QueueId },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn arrival(time: f64, destination: QueueId) -> Self {
        Self {
            time,
            kind: EventKind::Arrival { destination },
        }
    }

    pub fn transfer(time: f64, origin: QueueId, destination: QueueId) -> Self {
        Self {
            time,
            kind: EventKind::Transfer {
                origin,
                destination,
            },
        }
    }

    pub fn departure(time: f64, origin: QueueId) -> Self {
        Self {
            time,
            kind: EventKind::Departure { origin },
        }
    }

    /// `None` stands for outside the network.
    pub fn origin(&self) -> Option<QueueId> {
        match self.kind {
            EventKind::Arrival { .. } => None,
            EventKind::Transfer { origin, .. } | EventKind::Departure { origin } => Some(origin),
        }
    }

    pub fn destination(&self) -> Option<QueueId> {
        match self.kind {
            EventKind::Arrival { destination } | EventKind::Transfer { destination, .. } => {
                Some(destination)
            }
            EventKind::Departure { .. } => None,
        }
    }
}

#[derive(Debug)]
struct Pending {
    seq: u64,
    event: Event,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Pending {}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.event
            .time
            .total_cmp(&other.event.time)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Future events ordered by time, equal times in insertion order.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Pending { seq, event }));
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(p)| p.event)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(p)| p.event.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total events ever pushed.
    pub fn scheduled(&self) -> u64 {
        self.next_seq
    }
}

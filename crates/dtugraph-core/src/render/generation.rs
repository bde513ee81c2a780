//! Relayout generations
//!
//! Every relayout request gets the next generation number. A result is only
//! admitted when it carries the latest generation and that request is still
//! in flight, so the order in which adapters finish never matters.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Monotonic tag attached to each relayout request
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of presenting a finished relayout to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Latest request; apply it
    Current,
    /// Superseded by a newer request
    Stale { latest: Generation },
    /// Latest generation, but already settled (completed, failed, or timed out)
    Settled,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    generation: Generation,
    started_at: Instant,
}

/// Tracks the latest relayout generation and whether it is still running
#[derive(Debug, Clone, Default)]
pub struct RelayoutTracker {
    latest: Generation,
    in_flight: Option<InFlight>,
    applied: Option<Generation>,
}

impl RelayoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new relayout, superseding any request still in flight
    pub fn begin(&mut self, now: Instant) -> Generation {
        self.latest = self.latest.next();
        self.in_flight = Some(InFlight {
            generation: self.latest,
            started_at: now,
        });
        self.latest
    }

    /// Settle `generation` if it is the current in-flight request
    pub fn admit(&mut self, generation: Generation) -> Admission {
        if generation != self.latest {
            return Admission::Stale {
                latest: self.latest,
            };
        }
        match self.in_flight {
            Some(flight) if flight.generation == generation => {
                self.in_flight = None;
                Admission::Current
            }
            _ => Admission::Settled,
        }
    }

    /// Record that `generation`'s positions are on screen
    pub fn mark_applied(&mut self, generation: Generation) {
        self.applied = Some(generation);
    }

    /// Expire the in-flight request if it has run longer than `timeout`
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> Option<Generation> {
        let flight = self.in_flight?;
        if now.saturating_duration_since(flight.started_at) < timeout {
            return None;
        }
        self.in_flight = None;
        Some(flight.generation)
    }

    pub fn latest(&self) -> Generation {
        self.latest
    }

    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight.map(|f| f.generation)
    }

    pub fn applied(&self) -> Option<Generation> {
        self.applied
    }
}

//! Simulated-time timers
//!
//! Replaces self-rescheduling callbacks with an explicit queue of
//! fixed-period and one-shot timers. Time only moves when the caller
//! advances it, so tests run without real time passing.

use serde::{Deserialize, Serialize};

use super::entity::EntityKind;

pub type TimerId = u32;

/// Work a timer triggers when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Job {
    /// Move every entity of this class by one cell
    Advance(EntityKind),
    /// Introduce one entity of this class
    Spawn(EntityKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub due_ms: u64,
    /// `Some` for repeating timers
    pub period_ms: Option<u64>,
    pub job: Job,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now_ms: u64,
    timers: Vec<Timer>,
    next_id: TimerId,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn alloc_id(&mut self) -> TimerId {
        self.next_id += 1;
        self.next_id
    }

    /// Repeating timer; first fires one period from now
    pub fn every(&mut self, period_ms: u64, job: Job) -> TimerId {
        let period_ms = period_ms.max(1);
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + period_ms,
            period_ms: Some(period_ms),
            job,
        });
        id
    }

    /// One-shot timer
    pub fn after(&mut self, delay_ms: u64, job: Job) -> TimerId {
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms: None,
            job,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Change a repeating timer's period. The next firing is re-based on now.
    pub fn set_period(&mut self, id: TimerId, period_ms: u64) -> bool {
        let now = self.now_ms;
        match self.timers.iter_mut().find(|t| t.id == id) {
            Some(timer) if timer.period_ms.is_some() => {
                let period_ms = period_ms.max(1);
                timer.period_ms = Some(period_ms);
                timer.due_ms = timer.due_ms.min(now + period_ms);
                true
            }
            _ => false,
        }
    }

    pub fn period_of(&self, id: TimerId) -> Option<u64> {
        self.timers.iter().find(|t| t.id == id)?.period_ms
    }

    /// Pending one-shot jobs
    pub fn pending(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter().filter(|t| t.period_ms.is_none())
    }

    /// Drop all timers; the clock keeps its value
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// The clock moves to the timer's due time, so timers scheduled while
    /// handling the job are measured from when it fired. Ties fire in
    /// creation order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Job> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let Timer {
            due_ms,
            period_ms,
            job,
            ..
        } = self.timers[idx];
        self.now_ms = self.now_ms.max(due_ms);
        match period_ms {
            Some(period) => self.timers[idx].due_ms = due_ms + period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(job)
    }

    /// Move the clock forward to `until_ms` once all due jobs are handled
    pub fn finish(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

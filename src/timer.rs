//! Cancellable deferred events.
//!
//! Every delayed action in a session (effect expiry, respawn countdown, the intro
//! timeout, section regeneration) is a [`Timers`] entry. Timers only move when the
//! session ticks, so pausing the session freezes all of them, and tearing the session
//! down is a single [`Timers::cancel_all`].

use smallvec::SmallVec;
use tracing::trace;

/// Cancel token for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Pending<E> {
    id: TimerId,
    remaining: f32,
    duration: f32,
    event: E,
}

/// A queue of countdowns that fire a payload when they reach zero.
#[derive(Debug, Clone)]
pub struct Timers<E> {
    pending: Vec<Pending<E>>,
    next_id: u64,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Clone + std::fmt::Debug> Timers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` to fire after `delay` seconds of ticking.
    pub fn schedule(&mut self, delay: f32, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        trace!(timer = id.0, delay, ?event, "Timer scheduled");
        self.pending.push(Pending {
            id,
            remaining: delay.max(0.0),
            duration: delay.max(0.0),
            event,
        });
        id
    }

    /// Cancels a timer. Cancelling an unknown or already-fired timer does nothing.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != id);
        let cancelled = self.pending.len() != before;
        if cancelled {
            trace!(timer = id.0, "Timer cancelled");
        }
        cancelled
    }

    /// Cancels `id` if present, clearing the slot.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerId>) {
        if let Some(id) = slot.take() {
            self.cancel(id);
        }
    }

    /// Cancels everything.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            trace!(count = self.pending.len(), "Cancelling all timers");
        }
        self.pending.clear();
    }

    /// Seconds left on a timer, if it is still pending.
    pub fn remaining(&self, id: TimerId) -> Option<f32> {
        self.pending.iter().find(|pending| pending.id == id).map(|pending| pending.remaining)
    }

    /// Fraction of the timer still left, from 1.0 (just scheduled) to 0.0.
    pub fn remaining_fraction(&self, id: TimerId) -> Option<f32> {
        self.pending.iter().find(|pending| pending.id == id).map(|pending| {
            if pending.duration <= 0.0 {
                0.0
            } else {
                (pending.remaining / pending.duration).clamp(0.0, 1.0)
            }
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advances every timer by `dt` and returns the payloads that fired, in firing order.
    ///
    /// Timers that fire in the same advance are ordered by how far past zero they went,
    /// then by scheduling order.
    pub fn advance(&mut self, dt: f32) -> SmallVec<[E; 4]> {
        let mut fired: SmallVec<[(f32, TimerId, E); 4]> = SmallVec::new();

        self.pending.retain_mut(|pending| {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                fired.push((pending.remaining, pending.id, pending.event.clone()));
                false
            } else {
                true
            }
        });

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, event)| event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once() {
        let mut timers = Timers::new();
        timers.schedule(0.5, "done");

        assert!(timers.advance(0.3).is_empty());
        assert_eq!(timers.advance(0.3).as_slice(), &["done"]);
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = Timers::new();
        let id = timers.schedule(1.0, 1);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance(2.0).is_empty());
    }

    #[test]
    fn test_cancel_slot_clears() {
        let mut timers = Timers::new();
        let mut slot = Some(timers.schedule(1.0, 1));
        timers.cancel_slot(&mut slot);
        assert!(slot.is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_firing_order() {
        let mut timers = Timers::new();
        timers.schedule(0.2, "late");
        timers.schedule(0.1, "early");
        timers.schedule(0.2, "late-second");

        assert_eq!(timers.advance(0.5).as_slice(), &["early", "late", "late-second"]);
    }

    #[test]
    fn test_remaining_fraction() {
        let mut timers = Timers::new();
        let id = timers.schedule(4.0, ());
        timers.advance(1.0);
        assert_eq!(timers.remaining(id), Some(3.0));
        assert_eq!(timers.remaining_fraction(id), Some(0.75));
    }
}

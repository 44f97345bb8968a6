//! Deadline-based timers for the single-threaded handler loop.
//!
//! The handlers never block on time; they register one-shot or recurring
//! entries and the driving loop calls [`Timers::poll`] with the current
//! instant. Tests drive the same API with synthetic instants.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: Instant,
    period: Option<Duration>,
    tag: T,
}

#[derive(Debug)]
pub struct Timers<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T: Copy> Timers<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a one-shot timer firing once `delay` after `now`.
    pub fn after(&mut self, now: Instant, delay: Duration, tag: T) -> TimerId {
        self.insert(now + delay, None, tag)
    }

    /// Registers a recurring timer firing every `interval` after `now`.
    pub fn every(&mut self, now: Instant, interval: Duration, tag: T) -> TimerId {
        debug_assert!(interval > Duration::ZERO);
        self.insert(now + interval, Some(interval), tag)
    }

    fn insert(&mut self, deadline: Instant, period: Option<Duration>, tag: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline,
            period,
            tag,
        });
        id
    }

    /// Removes the timer, returning whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(pos) => {
                self.entries.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Fires every due timer in deadline order. One-shot timers are removed;
    /// recurring timers advance by their period and fire once per elapsed
    /// period, so a late poll catches up on missed ticks.
    pub fn poll(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let mut fired = Vec::new();
        while let Some(pos) = self.earliest_due(now) {
            let entry = &mut self.entries[pos];
            fired.push((entry.id, entry.tag));
            match entry.period {
                Some(period) => entry.deadline += period,
                None => {
                    self.entries.swap_remove(pos);
                }
            }
        }
        fired
    }

    fn earliest_due(&self, now: Instant) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(_, entry)| entry.deadline)
            .map(|(pos, _)| pos)
    }
}

impl<T: Copy> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

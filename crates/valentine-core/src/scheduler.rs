//! Virtual-time timer queue.
//!
//! Screens never arm wall-clock timers themselves. Each screen owns a
//! `Scheduler`, every `schedule` call hands back a [`TimerToken`], and the
//! driver (terminal player or test) decides how virtual milliseconds map onto
//! real time. Dropping the scheduler drops every pending timer with it.

use std::collections::{BTreeMap, HashMap};

/// Milliseconds of virtual time since a screen was mounted.
pub type Millis = u64;

/// Cancellation handle returned by every schedule call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// A timer that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K> {
    /// Token the timer was scheduled under.
    pub token: TimerToken,
    /// Virtual time the timer was due at.
    pub due: Millis,
    /// Caller-supplied key identifying what to do.
    pub key: K,
}

#[derive(Debug, Clone)]
struct Entry<K> {
    token: TimerToken,
    key: K,
    period: Option<Millis>,
}

/// Single-threaded timer queue keyed by `(deadline, insertion order)`.
#[derive(Debug)]
pub struct Scheduler<K> {
    now: Millis,
    next_seq: u64,
    queue: BTreeMap<(Millis, u64), Entry<K>>,
    slots: HashMap<TimerToken, (Millis, u64)>,
}

impl<K: Clone> Scheduler<K> {
    /// Creates an empty scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Arms a one-shot timer `delay` milliseconds from now.
    pub fn schedule(&mut self, delay: Millis, key: K) -> TimerToken {
        self.insert(delay, key, None)
    }

    /// Arms a timer that fires every `period` milliseconds until cancelled.
    pub fn schedule_repeating(&mut self, period: Millis, key: K) -> TimerToken {
        let period = period.max(1);
        self.insert(period, key, Some(period))
    }

    /// Cancels a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        self.slots
            .remove(&token)
            .and_then(|slot| self.queue.remove(&slot))
            .is_some()
    }

    /// Cancels every pending timer, returning how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.queue.len();
        self.queue.clear();
        self.slots.clear();
        cancelled
    }

    /// Whether `token` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.slots.contains_key(&token)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Removes the earliest timer due at or before `until`, moving virtual
    /// time to its deadline. Repeating timers are re-armed under the same
    /// token before they are returned.
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired<K>> {
        let (&(due, seq), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let entry = self.queue.remove(&(due, seq))?;
        self.slots.remove(&entry.token);
        self.now = self.now.max(due);

        let fired = Fired {
            token: entry.token,
            due,
            key: entry.key.clone(),
        };
        if let Some(period) = entry.period {
            let slot = (due.saturating_add(period), self.bump());
            self.slots.insert(entry.token, slot);
            self.queue.insert(slot, entry);
        }
        Some(fired)
    }

    /// Moves virtual time to `until` if nothing is due before it. Returns
    /// whether time moved all the way.
    pub fn settle(&mut self, until: Millis) -> bool {
        match self.next_deadline() {
            Some(due) if due <= until => false,
            _ => {
                self.now = self.now.max(until);
                true
            }
        }
    }

    fn insert(&mut self, delay: Millis, key: K, period: Option<Millis>) -> TimerToken {
        let seq = self.bump();
        let token = TimerToken(seq);
        let slot = (self.now.saturating_add(delay), seq);
        self.slots.insert(token, slot);
        self.queue.insert(slot, Entry { token, key, period });
        token
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<K: Clone> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

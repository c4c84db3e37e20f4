//! Single-consumer event queue and per-trigger generation counters.
//!
//! Reactions run to completion one at a time. A computation that started
//! for a trigger holds a [`Ticket`]; starting a newer one for the same
//! trigger, or invalidating it, makes the old ticket stale so its result is
//! dropped instead of applied out of order.

use std::collections::{BTreeMap, VecDeque};

use geoclima_model::WidgetId;

#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    events: VecDeque<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }
}

impl<E> EventQueue<E> {
    pub fn push(&mut self, event: E) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<E> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True when a queued event satisfies `predicate`.
    pub fn any(&self, predicate: impl Fn(&E) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

/// Identity of one in-flight computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket<K> {
    pub key: K,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct GenerationTracker<K: Ord> {
    current: BTreeMap<K, u64>,
    counter: u64,
}

impl<K: Ord> Default for GenerationTracker<K> {
    fn default() -> Self {
        Self {
            current: BTreeMap::new(),
            counter: 0,
        }
    }
}

impl<K: Ord + Copy> GenerationTracker<K> {
    /// Start a computation for `key`, superseding any earlier one.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.counter += 1;
        self.current.insert(key, self.counter);
        Ticket {
            key,
            generation: self.counter,
        }
    }

    /// Cancel whatever is in flight for `key`.
    pub fn invalidate(&mut self, key: K) {
        self.current.remove(&key);
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.current.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Consume `ticket` if it is still current.
    pub fn complete(&mut self, ticket: &Ticket<K>) -> bool {
        if self.is_current(ticket) {
            self.current.remove(&ticket.key);
            true
        } else {
            false
        }
    }

    /// The ticket in flight for `key`, if any.
    pub fn in_flight(&self, key: K) -> Option<Ticket<K>> {
        self.current
            .get(&key)
            .map(|generation| Ticket { key, generation: *generation })
    }
}

/// Logical triggers whose computations may be superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trigger {
    /// Bounds fetch issued on activation.
    Fetch(WidgetId),
    /// Parameter derivation for a range change.
    Derive(WidgetId),
}

//! Storage capability - persisted counters owned by the hosting platform
//!
//! The session never touches disk or global state. Daily attempt counters and
//! the lifetime point total go through a [`KeyValueStore`] handed to it by the
//! host; [`MemoryStore`] backs tests and headless tools.

use std::collections::HashMap;

/// Minimal integer key/value storage
pub trait KeyValueStore {
    fn get_i64(&self, key: &str) -> Option<i64>;
    fn set_i64(&mut self, key: &str, value: i64);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get_i64(&self, key: &str) -> Option<i64> {
        (**self).get_i64(key)
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        (**self).set_i64(key, value)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}

pub const TOTAL_POINTS_KEY: &str = "points/total";

pub fn attempts_key(day: u32) -> String {
    format!("attempts/{day}")
}

/// Level starts already used on `day`
pub fn attempts_used(store: &impl KeyValueStore, day: u32) -> u32 {
    store
        .get_i64(&attempts_key(day))
        .map(|v| v.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

pub fn record_attempt(store: &mut impl KeyValueStore, day: u32) {
    let used = attempts_used(&*store, day);
    store.set_i64(&attempts_key(day), used.saturating_add(1) as i64);
}

pub fn total_points(store: &impl KeyValueStore) -> u64 {
    store
        .get_i64(TOTAL_POINTS_KEY)
        .map(|v| v.max(0) as u64)
        .unwrap_or(0)
}

/// Add to the lifetime total; returns the new total
pub fn add_points(store: &mut impl KeyValueStore, points: u32) -> u64 {
    let total = total_points(&*store).saturating_add(points as u64);
    store.set_i64(TOTAL_POINTS_KEY, total.min(i64::MAX as u64) as i64);
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_are_counted_per_day() {
        let mut store = MemoryStore::new();
        record_attempt(&mut store, 10);
        record_attempt(&mut store, 10);
        record_attempt(&mut store, 11);
        assert_eq!(attempts_used(&store, 10), 2);
        assert_eq!(attempts_used(&store, 11), 1);
        assert_eq!(attempts_used(&store, 12), 0);
    }

    #[test]
    fn points_accumulate() {
        let mut store = MemoryStore::new();
        assert_eq!(total_points(&store), 0);
        assert_eq!(add_points(&mut store, 120), 120);
        assert_eq!(add_points(&mut store, 30), 150);
        assert_eq!(store.get_i64(TOTAL_POINTS_KEY), Some(150));
    }

    #[test]
    fn negative_values_read_as_zero() {
        let mut store = MemoryStore::new();
        store.set_i64(&attempts_key(1), -4);
        store.set_i64(TOTAL_POINTS_KEY, -9);
        assert_eq!(attempts_used(&store, 1), 0);
        assert_eq!(total_points(&store), 0);
    }
}

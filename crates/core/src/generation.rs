//! Request generations: only the newest request on a channel may publish.
//!
//! Each request takes a [`Generation`] when it starts. When it finishes,
//! [`LatestSlots::publish`] keeps its result only if no newer request was
//! started on the same channel in the meantime, so a slow early response
//! can never overwrite a fast later one.
//!
//! Channels are evicted once idle for longer than the configured TTL, and
//! the least recently used channel makes room when the map is full.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::StaleGeneration;

/// Default idle time after which a channel is dropped.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Default maximum number of live channels.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Monotonically increasing request number.
///
/// Numbers are unique across all channels of one [`LatestSlots`], so a
/// channel that was evicted and started again never reissues a number an
/// in-flight request still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Channel<T> {
    issued: Generation,
    published: Option<(Generation, T)>,
    touched: Instant,
    /// Recency order for capacity eviction.
    used: u64,
}

struct Slots<K, T> {
    next: u64,
    clock: u64,
    channels: HashMap<K, Channel<T>>,
}

/// Latest accepted value per channel.
pub struct LatestSlots<K, T> {
    ttl: Duration,
    capacity: usize,
    inner: Mutex<Slots<K, T>>,
}

impl<K: Eq + Hash + Clone, T: Clone> LatestSlots<K, T> {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    /// Slots dropping channels idle for `ttl` and holding at most `capacity`
    /// channels (at least one).
    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            inner: Mutex::new(Slots {
                next: 0,
                clock: 0,
                channels: HashMap::new(),
            }),
        }
    }

    // The map holds no invariants a panicking holder could break.
    fn lock(&self) -> MutexGuard<'_, Slots<K, T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a request on `key`, superseding any request still in flight.
    pub fn begin(&self, key: &K) -> Generation {
        let now = Instant::now();
        let mut slots = self.lock();

        let ttl = self.ttl;
        slots
            .channels
            .retain(|_, channel| now.duration_since(channel.touched) < ttl);

        if !slots.channels.contains_key(key) && slots.channels.len() >= self.capacity {
            let oldest = slots
                .channels
                .iter()
                .min_by_key(|(_, channel)| channel.used)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                slots.channels.remove(&oldest);
            }
        }

        slots.next += 1;
        slots.clock += 1;
        let issued = Generation(slots.next);
        let used = slots.clock;
        slots
            .channels
            .entry(key.clone())
            .and_modify(|channel| {
                channel.issued = issued;
                channel.touched = now;
                channel.used = used;
            })
            .or_insert(Channel {
                issued,
                published: None,
                touched: now,
                used,
            });
        issued
    }

    /// Whether `generation` is still the newest request on `key`.
    pub fn is_current(&self, key: &K, generation: Generation) -> bool {
        self.lock()
            .channels
            .get(key)
            .is_some_and(|channel| channel.issued == generation)
    }

    /// Store `value` if `generation` is still the newest request on `key`.
    ///
    /// A channel evicted while the request was in flight rejects it too.
    pub fn publish(&self, key: &K, generation: Generation, value: T) -> Result<(), StaleGeneration> {
        let mut slots = self.lock();
        slots.clock += 1;
        let used = slots.clock;
        let Some(channel) = slots.channels.get_mut(key) else {
            return Err(StaleGeneration {
                generation: generation.0,
                current: 0,
            });
        };

        if channel.issued != generation {
            return Err(StaleGeneration {
                generation: generation.0,
                current: channel.issued.0,
            });
        }
        channel.published = Some((generation, value));
        channel.touched = Instant::now();
        channel.used = used;
        Ok(())
    }

    /// Most recently published value on `key`.
    pub fn latest(&self, key: &K) -> Option<(Generation, T)> {
        self.lock()
            .channels
            .get(key)
            .and_then(|channel| channel.published.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().channels.is_empty()
    }
}

impl<K: Eq + Hash + Clone, T: Clone> Default for LatestSlots<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

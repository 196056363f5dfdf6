//! Seedable virtual clock for deterministic telemetry feeds.
//!
//! Nanosecond resolution, lock-free, shared via `Arc`. Only simulation and
//! replay use it; live mode stamps readings with wall time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

#[derive(Clone, Debug)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a clock starting at `seed_ns` nanoseconds past the epoch.
    pub fn new(seed_ns: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(seed_ns)),
        }
    }

    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    /// Current virtual time as a UTC timestamp.
    pub fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.now_ns() as i64)
    }

    #[inline]
    pub fn advance(&self, ns: u64) {
        self.offset.fetch_add(ns, Ordering::Release);
    }
}

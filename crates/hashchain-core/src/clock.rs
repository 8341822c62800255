//! Timestamp sources for new blocks.
//!
//! The timestamp is one of the hashed fields, so tests inject a deterministic
//! clock instead of reading wall-clock time.

use chrono::{SecondsFormat, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

pub trait Clock: Send + Sync {
    /// Opaque timestamp string stored verbatim in the next block.
    fn now(&self) -> String;
}

/// Wall-clock UTC time in RFC 3339 with nanosecond precision.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// Always returns the same timestamp.
#[derive(Clone, Debug)]
pub struct FixedClock(String);

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

/// Returns `"<prefix><n>"` with `n` counting up from zero on every call.
#[derive(Debug)]
pub struct SequenceClock {
    prefix: String,
    next: AtomicU64,
}

impl SequenceClock {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl Clock for SequenceClock {
    fn now(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

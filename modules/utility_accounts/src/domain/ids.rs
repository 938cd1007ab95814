use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Identifiers derived from the creation instant (milliseconds since epoch).
///
/// Two ids handed out by the same generator are strictly increasing even when
/// they are requested within the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_at(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        self.next_at(now).to_string()
    }

    /// Transaction ids carry a `TXN` prefix so they never collide with activity ids.
    pub fn next_transaction_id(&self, now: DateTime<Utc>) -> String {
        format!("TXN{}", self.next_at(now))
    }
}

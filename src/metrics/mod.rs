//! Metrics collection module
//!
//! Counts what the flows did on the wire: requests issued, responses thrown
//! away as stale, submissions ignored while busy, and failures.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Flow counters shared by all components of one storefront
#[derive(Debug, Default)]
pub struct Metrics {
    suggest_requests: AtomicU64,
    suggest_stale: AtomicU64,
    suggest_failures: AtomicU64,
    cart_adds: AtomicU64,
    cart_busy_ignored: AtomicU64,
    cart_failures: AtomicU64,
    counter_syncs: AtomicU64,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_suggest_request(&self) {
        self.suggest_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// A suggestion response arrived after a newer query superseded it
    pub fn inc_suggest_stale(&self) {
        self.suggest_stale.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_suggest_failure(&self) {
        self.suggest_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cart_add(&self) {
        self.cart_adds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cart_busy_ignored(&self) {
        self.cart_busy_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cart_failure(&self) {
        self.cart_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_counter_sync(&self) {
        self.counter_syncs.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            suggest_requests: self.suggest_requests.load(Ordering::Relaxed),
            suggest_stale: self.suggest_stale.load(Ordering::Relaxed),
            suggest_failures: self.suggest_failures.load(Ordering::Relaxed),
            cart_adds: self.cart_adds.load(Ordering::Relaxed),
            cart_busy_ignored: self.cart_busy_ignored.load(Ordering::Relaxed),
            cart_failures: self.cart_failures.load(Ordering::Relaxed),
            counter_syncs: self.counter_syncs.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`Metrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub suggest_requests: u64,
    pub suggest_stale: u64,
    pub suggest_failures: u64,
    pub cart_adds: u64,
    pub cart_busy_ignored: u64,
    pub cart_failures: u64,
    pub counter_syncs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_suggest_request();
        metrics.inc_suggest_request();
        metrics.inc_suggest_stale();
        metrics.inc_cart_add();
        metrics.inc_cart_busy_ignored();

        let snap = metrics.snapshot();
        assert_eq!(snap.suggest_requests, 2);
        assert_eq!(snap.suggest_stale, 1);
        assert_eq!(snap.cart_adds, 1);
        assert_eq!(snap.cart_busy_ignored, 1);
        assert_eq!(snap.cart_failures, 0);
    }
}

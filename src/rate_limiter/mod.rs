
//! # Rate Limiter Module
//!
//! This module provides fixed-window rate limiting for the submission
//! endpoints. It counts requests per opaque string identifier (client IP or
//! normalized email address) within discrete, non-overlapping windows that
//! reset wholesale once their deadline passes.
//!
//! ## Features
//!
//! - **Fixed-Window Counting**: One counter and one absolute reset deadline
//!   per identifier; the window never slides
//! - **Lazy Expiry**: An expired entry is replaced on the next request for
//!   its identifier, independent of the sweep
//! - **Periodic Sweep**: A background task removes expired entries to bound
//!   memory growth; correctness never depends on when it runs
//! - **Dual Dimensions**: The server constructs one limiter for client IPs
//!   and one for email addresses, each with its own limits
//!
//! ## Rate Limiting Strategy
//!
//! A fixed window admits a burst of up to twice the configured maximum at a
//! window boundary. That tradeoff is intentional and preserved; the limiter
//! is an abuse-mitigation layer, not a precise quota.
//!
//! ## Thread Safety
//!
//! The counter map lives behind a `Mutex` inside the limiter, so the
//! lookup-then-mutate sequence of a check is a single critical section. The
//! limiter is shared as `Arc<RateLimiter>` between handlers and the sweep.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Fixed period between background sweeps.
pub const SWEEP_INTERVAL_SECS: u64 = 300;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Limits for one rate-limiting dimension.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests admitted per window before limiting kicks in
    pub max_requests: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

/// Counter state for one identifier within its current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests seen in the current window
    pub count: u32,
    /// Epoch milliseconds at which the window expires
    pub reset_at: u64,
}

/// Fixed-window rate limiter owning its counter map.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether `identifier` has exceeded its limit, counting this call.
    ///
    /// Returns `true` if the request should be rejected. The first call in a
    /// fresh window (including a window whose deadline has already passed)
    /// always resets the counter to 1 and is admitted.
    pub fn is_rate_limited(&self, identifier: &str, config: &RateLimitConfig) -> bool {
        self.check_at(identifier, config, now_ms())
    }

    /// Return the raw counter entry for an identifier, if one exists.
    ///
    /// Read-only; expired entries are reported as-is until replaced or swept.
    pub fn info(&self, identifier: &str) -> Option<RateLimitEntry> {
        let entries = self.entries.lock().unwrap();
        entries.get(identifier).cloned()
    }

    /// Unconditionally delete an identifier's counter.
    ///
    /// Administrative override; not part of the request path.
    pub fn clear(&self, identifier: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(identifier).is_some() {
            debug!(identifier = %identifier, "cleared rate limit entry");
        }
    }

    /// Remove every entry whose window has already expired.
    ///
    /// Returns the number of entries removed. Safe to run at any time; a
    /// sweep with nothing expired leaves every counter untouched.
    pub fn sweep(&self) -> usize {
        self.sweep_at(now_ms())
    }

    /// Window check against an explicit clock, shared by `is_rate_limited`.
    fn check_at(&self, identifier: &str, config: &RateLimitConfig, now: u64) -> bool {
        let mut entries = self.entries.lock().unwrap();

        match entries.get_mut(identifier) {
            Some(entry) if now < entry.reset_at => {
                // Window still open: count this request, then compare.
                entry.count += 1;
                let limited = entry.count > config.max_requests;
                if limited {
                    warn!(
                        identifier = %identifier,
                        count = entry.count,
                        max_requests = config.max_requests,
                        "rate limit exceeded"
                    );
                }
                limited
            }
            _ => {
                // No entry, or the deadline has passed: start a fresh window.
                entries.insert(
                    identifier.to_string(),
                    RateLimitEntry {
                        count: 1,
                        reset_at: now + config.window_ms,
                    },
                );
                false
            }
        }
    }

    fn sweep_at(&self, now: u64) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.reset_at);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(
                removed = removed,
                remaining = entries.len(),
                "swept expired rate limit entries"
            );
        }
        removed
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

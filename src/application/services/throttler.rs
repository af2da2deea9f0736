//! Per-client throttling of creation requests.
//!
//! Two stages share one fixed window per client: past `delay_after` attempts
//! each extra request is slowed down by a growing delay, past `max_requests`
//! it is rejected outright. Rejected attempts still count.

use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Identity a client is throttled under, usually its IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<IpAddr> for ClientKey {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Throttle thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Length of a client's counting window.
    pub window: Duration,
    /// Attempts per window that pass without delay.
    pub delay_after: u32,
    /// Delay added for every attempt beyond `delay_after`.
    pub delay_step: Duration,
    /// Attempts per window after which requests are rejected.
    pub max_requests: u32,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(30),
            delay_after: 1,
            delay_step: Duration::from_millis(500),
            max_requests: 1,
        }
    }
}

impl ThrottlePolicy {
    /// A policy that admits every request immediately.
    pub fn unlimited() -> Self {
        Self {
            window: Duration::from_secs(1),
            delay_after: u32::MAX,
            delay_step: Duration::ZERO,
            max_requests: u32::MAX,
        }
    }
}

/// Outcome of [`Throttler::admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// Proceed after waiting this long.
    Delayed(Duration),
    /// Over the hard cap; the window resets after `retry_after`.
    Rejected { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    attempts: u32,
}

/// In-memory, process-local throttle state.
#[derive(Debug)]
pub struct Throttler {
    policy: ThrottlePolicy,
    windows: Mutex<HashMap<ClientKey, Window>>,
}

impl Throttler {
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    /// Records an attempt by `key` and decides whether it may proceed.
    pub fn admit(&self, key: &ClientKey) -> Admission {
        self.admit_at(key, Instant::now())
    }

    fn admit_at(&self, key: &ClientKey, now: Instant) -> Admission {
        let (attempts, elapsed) = {
            let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
            let window = windows.entry(key.clone()).or_insert(Window {
                started_at: now,
                attempts: 0,
            });

            if now.saturating_duration_since(window.started_at) >= self.policy.window {
                *window = Window {
                    started_at: now,
                    attempts: 0,
                };
            }

            window.attempts = window.attempts.saturating_add(1);
            (
                window.attempts,
                now.saturating_duration_since(window.started_at),
            )
        };

        if attempts > self.policy.max_requests {
            Admission::Rejected {
                retry_after: self.policy.window.saturating_sub(elapsed),
            }
        } else if attempts > self.policy.delay_after {
            Admission::Delayed(
                self.policy
                    .delay_step
                    .saturating_mul(attempts - self.policy.delay_after),
            )
        } else {
            Admission::Allowed
        }
    }

    /// Drops windows that have run out. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.started_at) < self.policy.window);
        before - windows.len()
    }

    /// Number of clients with a live window.
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Periodically purges expired throttle windows. Runs until the task is dropped.
pub async fn run_purge_loop(throttler: Arc<Throttler>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let purged = throttler.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired throttle windows");
        }
    }
}

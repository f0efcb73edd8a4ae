//! Fixed-window submission rate limiter keyed by sender address.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::chain::Address;
use crate::config::RateLimitConfig;

/// One sender's window.
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counter: at most `max_submissions` per address per window.
///
/// The first submission opens the window; entries are dropped once their
/// window expires. Process-local by design.
pub struct RateLimiter {
    windows: Mutex<HashMap<Address, Window>>,
    max_submissions: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_submissions: config.max_submissions,
            window: Duration::from_secs(config.window_secs),
        }
    }

    /// Record a submission attempt for `sender`.
    ///
    /// Returns `Ok(())` when allowed, or the seconds to wait when the sender
    /// has exhausted the current window.
    pub fn check(&self, sender: &Address) -> Result<(), u64> {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");

        if let Some(window) = windows.get(sender) {
            if window.reset_at <= now {
                windows.remove(sender);
            }
        }

        match windows.get_mut(sender) {
            None => {
                windows.insert(
                    sender.clone(),
                    Window {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                Ok(())
            }
            Some(window) if window.count >= self.max_submissions => {
                let wait = window
                    .reset_at
                    .saturating_duration_since(now)
                    .as_secs()
                    .max(1);
                Err(wait)
            }
            Some(window) => {
                window.count += 1;
                Ok(())
            }
        }
    }
}

//! Client-side throttling of GitHub write calls.
//!
//! GitHub's secondary rate limits trip on bursts of content creation long
//! before the primary quota runs out. [`CallThrottle`] counts issue, comment
//! and close calls and pauses for a fixed time after every `budget` calls.

use std::time::Duration;
use tracing::info;

/// Default pause once the call budget is spent.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(60);

/// Fixed-window limiter for mutating GitHub calls.
///
/// A budget of zero disables throttling.
#[derive(Debug, Clone)]
pub struct CallThrottle {
    budget: u32,
    pause: Duration,
    calls: u64,
    pauses: u64,
}

impl CallThrottle {
    /// Creates a throttle that pauses for `pause` after every `budget` calls.
    #[must_use]
    pub fn new(budget: u32, pause: Duration) -> Self {
        Self {
            budget,
            pause,
            calls: 0,
            pauses: 0,
        }
    }

    /// Creates a throttle that never pauses.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, DEFAULT_PAUSE)
    }

    /// Returns true if calls are being throttled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.budget > 0
    }

    /// Records one completed call, pausing if it used up the budget.
    pub async fn record_call(&mut self) {
        self.calls += 1;
        if !self.is_enabled() || self.calls % u64::from(self.budget) != 0 {
            return;
        }

        self.pauses += 1;
        info!(
            calls = self.calls,
            pause_secs = self.pause.as_secs(),
            "Call budget reached, pausing"
        );
        tokio::time::sleep(self.pause).await;
    }

    /// Number of calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Number of pauses taken so far.
    #[must_use]
    pub fn pauses(&self) -> u64 {
        self.pauses
    }
}

impl Default for CallThrottle {
    fn default() -> Self {
        Self::disabled()
    }
}

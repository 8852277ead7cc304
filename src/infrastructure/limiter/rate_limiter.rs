use serde::{Deserialize, Serialize};

/// Session key holding the submission timestamps.
pub const RATE_SESSION_KEY: &str = "cf_times";

/// Limits applied to one session's submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub min_interval_secs: i64,
    pub max_per_window: usize,
    pub window_secs: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_interval_secs: 30,
            max_per_window: 5,
            window_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Admit,
    /// The previous submission was less than the minimum interval ago.
    TooSoon { retry_after_secs: u64 },
    /// The window already holds the maximum number of submissions.
    WindowFull { retry_after_secs: u64 },
}

impl RateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, RateDecision::Admit)
    }

    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            RateDecision::Admit => None,
            RateDecision::TooSoon { retry_after_secs }
            | RateDecision::WindowFull { retry_after_secs } => Some(*retry_after_secs),
        }
    }
}

/// Epoch-second timestamps of counted submissions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionWindow(Vec<i64>);

impl SubmissionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_timestamps(mut timestamps: Vec<i64>) -> Self {
        timestamps.sort_unstable();
        SubmissionWindow(timestamps)
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops entries older than the policy window.
    pub fn prune(&mut self, policy: &RateLimitPolicy, now: i64) {
        let cutoff = now - policy.window_secs;
        self.0.retain(|&t| t > cutoff);
    }

    /// Decides whether another submission may proceed. Prunes, never appends.
    pub fn admit(&mut self, policy: &RateLimitPolicy, now: i64) -> RateDecision {
        self.prune(policy, now);

        if let Some(&last) = self.0.last() {
            let elapsed = now - last;
            if elapsed < policy.min_interval_secs {
                return RateDecision::TooSoon {
                    retry_after_secs: seconds_until(policy.min_interval_secs - elapsed),
                };
            }
        }

        if self.0.len() >= policy.max_per_window {
            let oldest = self.0.first().copied().unwrap_or(now);
            return RateDecision::WindowFull {
                retry_after_secs: seconds_until(oldest + policy.window_secs - now),
            };
        }

        RateDecision::Admit
    }

    /// Counts a submission at `now`.
    pub fn tick(&mut self, policy: &RateLimitPolicy, now: i64) {
        self.0.push(now);
        self.0.sort_unstable();
        self.prune(policy, now);
    }
}

fn seconds_until(delta: i64) -> u64 {
    delta.max(1) as u64
}

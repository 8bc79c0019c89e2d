//! Retry with exponential backoff.
//!
//! Runs a fallible operation until it succeeds or the attempt budget is
//! spent. The delay between attempts starts at the policy's initial delay
//! and is multiplied after every failure. The executor sleeps on the calling
//! thread and never runs attempts concurrently.

use std::fmt::Display;
use std::time::Duration;

use dockhand_common::constants::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, RETRY_BACKOFF_MULTIPLIER,
};

/// Attempt budget and backoff schedule for [`RetryPolicy::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RETRY_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }
}

impl RetryPolicy {
    /// Creates a doubling policy. A zero attempt count is treated as one.
    #[must_use]
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            multiplier: RETRY_BACKOFF_MULTIPLIER,
        }
    }

    /// Replaces the delay growth factor.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Total number of invocations allowed.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the second attempt.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Runs `op` under this policy, sleeping the current thread between attempts.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt if every attempt fails.
    pub fn run<T, E, F>(&self, op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        self.run_with_sleep(op, std::thread::sleep)
    }

    /// Runs `op` under this policy using `sleep` to wait between attempts.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt if every attempt fails.
    pub fn run_with_sleep<T, E, F, S>(&self, mut op: F, mut sleep: S) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
        S: FnMut(Duration),
    {
        let mut delay = self.initial_delay;
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.max_attempts => {
                    tracing::debug!(attempt, error = %err, "giving up");
                    return Err(err);
                }
                Err(err) => {
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "attempt failed, backing off"
                    );
                    sleep(delay);
                    delay = delay.saturating_mul(self.multiplier);
                    attempt += 1;
                }
            }
        }
    }
}

/// Runs `op` up to `max_attempts` times, doubling `initial_delay` after each failure.
///
/// # Errors
///
/// Returns the error of the last attempt if every attempt fails.
pub fn retry<T, E, F>(max_attempts: u32, initial_delay: Duration, op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    RetryPolicy::new(max_attempts, initial_delay).run(op)
}

/// Runs `op` under the default policy (10 attempts starting at 100ms).
///
/// # Errors
///
/// Returns the error of the last attempt if every attempt fails.
pub fn retry_with_defaults<T, E, F>(op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    RetryPolicy::default().run(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_on_first_try_never_sleeps() {
        let mut calls = 0;
        let mut sleeps = Vec::new();
        let result: Result<u32, String> = RetryPolicy::new(5, Duration::from_millis(10))
            .run_with_sleep(
                || {
                    calls += 1;
                    Ok(7)
                },
                |d| sleeps.push(d),
            );
        assert_eq!(result, Ok(7));
        assert_eq!(calls, 1);
        assert!(sleeps.is_empty());
    }

    #[test]
    fn exhaustion_returns_last_error_and_doubles_delay() {
        let mut calls = 0;
        let mut sleeps = Vec::new();
        let result: Result<(), String> = RetryPolicy::new(3, Duration::from_millis(10))
            .run_with_sleep(
                || {
                    calls += 1;
                    Err(format!("failure {calls}"))
                },
                |d| sleeps.push(d),
            );
        assert_eq!(result, Err("failure 3".to_owned()));
        assert_eq!(calls, 3);
        assert_eq!(
            sleeps,
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[test]
    fn eventual_success_stops_retrying() {
        let mut calls = 0;
        let result: Result<&str, String> = RetryPolicy::new(5, Duration::ZERO).run_with_sleep(
            || {
                calls += 1;
                if calls < 3 {
                    Err("not yet".to_owned())
                } else {
                    Ok("ready")
                }
            },
            |_| {},
        );
        assert_eq!(result, Ok("ready"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);

        let mut calls = 0;
        let result: Result<(), String> = policy.run(|| {
            calls += 1;
            Err("boom".to_owned())
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn default_policy_matches_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 10);
        assert_eq!(policy.initial_delay(), Duration::from_millis(100));
    }

    #[test]
    fn custom_multiplier_changes_schedule() {
        let mut sleeps = Vec::new();
        let _ = RetryPolicy::new(3, Duration::from_millis(5))
            .with_multiplier(3)
            .run_with_sleep(|| Err::<(), _>("no"), |d| sleeps.push(d));
        assert_eq!(
            sleeps,
            vec![Duration::from_millis(5), Duration::from_millis(15)]
        );
    }

    #[test]
    fn free_function_retries_with_real_sleep() {
        let mut calls = 0;
        let result: Result<(), String> = retry(2, Duration::from_millis(1), || {
            calls += 1;
            Err("down".to_owned())
        });
        assert_eq!(result, Err("down".to_owned()));
        assert_eq!(calls, 2);
    }
}

//! Whole-task retry policy for the orchestration boundary.
//! The core fetcher never retries; callers wrap a complete fetch with this policy.

use std::fmt::Display;
use std::thread::sleep;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// `delay * n` before the n-th retry.
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize, // total attempts including the first; at least 1
    pub delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    /// Three retries, 30 s apart.
    fn default() -> Self {
        Self { max_attempts: 4, delay: Duration::from_secs(30), backoff: Backoff::Fixed }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), delay, backoff: Backoff::Fixed }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: usize) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Linear => self.delay.saturating_mul(retry as u32),
        }
    }

    /// Run `op` until it succeeds, returns a non-retryable error, or attempts run out.
    /// `op` receives the 1-based attempt number.
    pub fn run<T, E, F, R>(&self, label: &str, is_retryable: R, mut op: F) -> Result<T, E>
    where
        F: FnMut(usize) -> Result<T, E>,
        R: Fn(&E) -> bool,
        E: Display,
    {
        let tries = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(v) => return Ok(v),
                Err(e) if attempt < tries && is_retryable(&e) => {
                    let wait = self.delay_for(attempt);
                    tracing::warn!("{} failed (attempt {}/{}): {}; retrying in {:?}", label, attempt, tries, e, wait);
                    sleep(wait);
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        tracing::warn!("{} failed after {} attempts: {}", label, attempt, e);
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_until_success() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;
        let out: Result<u32, String> = policy.run("op", |_| true, |attempt| {
            calls += 1;
            if attempt < 3 { Err(format!("fail {attempt}")) } else { Ok(7) }
        });
        assert_eq!(out, Ok(7));
        assert_eq!(calls, 3);
    }

    #[test]
    fn stops_on_non_retryable_error() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;
        let out: Result<(), String> = policy.run("op", |e: &String| e != "fatal", |_| {
            calls += 1;
            Err("fatal".to_string())
        });
        assert!(out.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let mut calls = 0;
        let out: Result<(), String> = policy.run("op", |_| true, |_| {
            calls += 1;
            Err("again".to_string())
        });
        assert_eq!(out, Err("again".to_string()));
        assert_eq!(calls, 2);
    }

    #[test]
    fn linear_backoff_grows() {
        let p = RetryPolicy::new(4, Duration::from_millis(50)).with_backoff(Backoff::Linear);
        assert_eq!(p.delay_for(1), Duration::from_millis(50));
        assert_eq!(p.delay_for(3), Duration::from_millis(150));
        assert_eq!(RetryPolicy::default().delay_for(3), Duration::from_secs(30));
    }
}

// usbtop - Statistics Context
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Configuration shared by every sample window of one engine.

use std::sync::OnceLock;

/// Window length for the "instantaneous" view, in seconds.
pub const WINDOW_SECOND: f64 = 1.0;
/// Window length for the smoothed view, in seconds.
pub const WINDOW_MINUTE: f64 = 60.0;

/// Window duration and lifetime baseline shared by all windows of an engine.
///
/// The duration is fixed at construction. `t0` is the timestamp of the first
/// sample pushed into any window of this context; it is set exactly once and
/// every later attempt is a no-op.
#[derive(Debug)]
pub struct StatsContext {
    window_duration: f64,
    t0: OnceLock<f64>,
}

impl StatsContext {
    /// Create a context with the given window duration in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `window_duration` is not a finite, strictly positive number.
    pub fn new(window_duration: f64) -> Self {
        assert!(
            window_duration.is_finite() && window_duration > 0.0,
            "window duration must be a positive number of seconds, got {}",
            window_duration
        );
        Self {
            window_duration,
            t0: OnceLock::new(),
        }
    }

    /// Window duration in seconds.
    pub fn window_duration(&self) -> f64 {
        self.window_duration
    }

    /// Timestamp of the first observed sample, if any.
    pub fn t0(&self) -> Option<f64> {
        self.t0.get().copied()
    }

    /// Record `timestamp` as `t0` unless another sample got there first.
    /// Returns the effective `t0`.
    pub(crate) fn observe_sample(&self, timestamp: f64) -> f64 {
        *self.t0.get_or_init(|| timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_first_writer_wins() {
        let ctx = StatsContext::new(1.0);
        assert_eq!(ctx.t0(), None);
        assert_eq!(ctx.observe_sample(5.0), 5.0);
        assert_eq!(ctx.observe_sample(2.0), 5.0);
        assert_eq!(ctx.t0(), Some(5.0));
    }

    #[test]
    fn test_concurrent_first_samples() {
        let ctx = Arc::new(StatsContext::new(1.0));
        let barrier = Arc::new(Barrier::new(8));
        let attempts: Vec<f64> = (0..8).map(|i| 10.0 + i as f64 * 0.125).collect();

        let handles: Vec<_> = attempts
            .iter()
            .map(|&ts| {
                let ctx = Arc::clone(&ctx);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    ctx.observe_sample(ts)
                })
            })
            .collect();

        let seen: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let t0 = ctx.t0().unwrap();
        assert!(attempts.contains(&t0));
        assert!(seen.iter().all(|&s| s == t0));

        ctx.observe_sample(0.0);
        assert_eq!(ctx.t0(), Some(t0));
    }

    #[test]
    fn test_contexts_are_independent() {
        let a = StatsContext::new(1.0);
        let b = StatsContext::new(60.0);
        a.observe_sample(3.0);
        assert_eq!(b.t0(), None);
        assert_eq!(b.window_duration(), WINDOW_MINUTE);
    }

    #[test]
    #[should_panic(expected = "window duration")]
    fn test_rejects_zero_duration() {
        let _ = StatsContext::new(0.0);
    }

    #[test]
    #[should_panic(expected = "window duration")]
    fn test_rejects_nan_duration() {
        let _ = StatsContext::new(f64::NAN);
    }
}

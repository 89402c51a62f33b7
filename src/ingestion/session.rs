//! Exponential backoff for reconnection, with jitter to avoid thundering herd
//! on mass reconnects.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    pub base: Duration,
    pub max: Duration,
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            max: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Tracks reconnection attempt count and computes the next delay. `reset` on
/// every successful connection restarts the sequence from `base`.
#[derive(Debug)]
pub struct Backoff {
    config: BackoffConfig,
    attempt: u32,
    rng_state: u64,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            attempt: 0,
            rng_state: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64 | 1)
                .unwrap_or(0x9E3779B97F4A7C15),
        }
    }

    #[inline]
    fn next_random(&mut self) -> f64 {
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 7;
        self.rng_state ^= self.rng_state << 17;
        (self.rng_state as f64) / (u64::MAX as f64)
    }

    /// Next delay, with ±10% jitter, capped at `config.max`.
    pub fn next_delay(&mut self) -> Duration {
        let base_ms = self.config.base.as_millis() as f64;
        let max_ms = self.config.max.as_millis() as f64;
        let raw = base_ms * self.config.multiplier.powi(self.attempt as i32);
        let capped = raw.min(max_ms);

        let jitter_range = capped * 0.1;
        let jitter = (self.next_random() * 2.0 - 1.0) * jitter_range;
        let final_ms = (capped + jitter).max(base_ms);

        self.attempt += 1;
        Duration::from_millis(final_ms as u64)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delay_is_near_base() {
        let mut b = Backoff::new(BackoffConfig::default());
        let d = b.next_delay();
        assert!(d.as_millis() >= 900 && d.as_millis() <= 1100);
    }

    #[test]
    fn delay_grows_and_caps_at_max() {
        let mut b = Backoff::new(BackoffConfig::default());
        for _ in 0..20 {
            let d = b.next_delay();
            assert!(d.as_millis() <= 33_000);
        }
    }

    #[test]
    fn reset_restarts_sequence() {
        let mut b = Backoff::new(BackoffConfig::default());
        b.next_delay();
        b.next_delay();
        assert_eq!(b.attempt(), 2);
        b.reset();
        assert_eq!(b.attempt(), 0);
        let d = b.next_delay();
        assert!(d.as_millis() >= 900 && d.as_millis() <= 1100);
    }

    #[test]
    fn s6_reconnect_schedule_matches_approximately() {
        let mut b = Backoff::new(BackoffConfig::default());
        let expected = [1.0, 2.0, 4.0, 8.0, 16.0];
        for e in expected {
            let d = b.next_delay().as_secs_f64();
            assert!((d - e).abs() < e * 0.15 + 0.2, "delay {d} far from expected {e}");
        }
    }
}

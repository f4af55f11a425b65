//! Sliding-window request admission.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Admits at most `limit` requests in any trailing `period`.
///
/// [`admit`](Self::admit) never rejects; it sleeps until the oldest request
/// in the window ages out. The lock is released while sleeping, so other
/// threads can still observe the window.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    period: Duration,
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter. A `limit` of zero is treated as one.
    pub fn new(limit: usize, period: Duration) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            period,
            window: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn prune(&self, window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = window.front() {
            if now.duration_since(oldest) >= self.period {
                window.pop_front();
            } else {
                break;
            }
        }
    }

    /// Blocks until a slot is free, then records the request.
    ///
    /// Returns how long the caller waited.
    pub fn admit(&self) -> Duration {
        let started = Instant::now();
        loop {
            let wait = {
                let mut window = self.window.lock().unwrap();
                let now = Instant::now();
                self.prune(&mut window, now);

                if window.len() < self.limit {
                    window.push_back(now);
                    return started.elapsed();
                }

                match window.front() {
                    Some(&oldest) => (oldest + self.period).saturating_duration_since(now),
                    None => Duration::ZERO,
                }
            };
            thread::sleep(wait);
        }
    }

    /// Records the request and returns `true` if a slot is free now.
    pub fn try_admit(&self) -> bool {
        let mut window = self.window.lock().unwrap();
        let now = Instant::now();
        self.prune(&mut window, now);

        if window.len() < self.limit {
            window.push_back(now);
            true
        } else {
            false
        }
    }

    /// Number of requests in the current window.
    pub fn in_window(&self) -> usize {
        let mut window = self.window.lock().unwrap();
        self.prune(&mut window, Instant::now());
        window.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_admits_up_to_limit_without_waiting() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.admit() < Duration::from_millis(50));
        }
        assert_eq!(limiter.in_window(), 3);
    }

    #[test]
    fn test_try_admit_rejects_when_full() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_admit());
        assert!(limiter.try_admit());
        assert!(!limiter.try_admit());
        assert_eq!(limiter.in_window(), 2);
    }

    #[test]
    fn test_admit_blocks_for_about_one_period() {
        let period = Duration::from_millis(200);
        let limiter = RateLimiter::new(2, period);
        limiter.admit();
        limiter.admit();

        let start = Instant::now();
        limiter.admit();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(150), "waited {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1000), "waited {:?}", elapsed);
    }

    #[test]
    fn test_window_expires() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        assert!(limiter.try_admit());
        thread::sleep(Duration::from_millis(80));
        assert_eq!(limiter.in_window(), 0);
        assert!(limiter.try_admit());
    }

    #[test]
    fn test_zero_limit_is_one() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert_eq!(limiter.limit(), 1);
        assert!(limiter.try_admit());
        assert!(!limiter.try_admit());
    }

    #[test]
    fn test_concurrent_admission_respects_limit() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::from_secs(60)));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || limiter.try_admit())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(admitted, 5);
    }
}

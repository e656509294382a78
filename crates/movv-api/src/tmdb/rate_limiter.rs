//! Request throttle for the TMDB API.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Spaces consecutive requests at least `min_interval` apart.
///
/// Country probing fires one request per country, so the limiter keeps
/// bursts under TMDB's per-second allowance.
#[derive(Debug)]
pub struct RequestThrottle {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_slot: Option<Instant>,
}

impl RequestThrottle {
    /// Creates a throttle with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a throttle with the default interval (25ms).
    pub(crate) const fn with_default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Sleeps until the next slot, then reserves the following one.
    pub async fn acquire(&mut self) {
        if let Some(slot) = self.next_slot {
            let now = Instant::now();
            if slot > now {
                tokio::time::sleep(slot.saturating_duration_since(now)).await;
            }
        }

        self.next_slot = Instant::now().checked_add(self.min_interval);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    #[tokio::test]
    async fn test_first_acquire_does_not_wait() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_secs(1));

        // Act
        let start = Instant::now();
        throttle.acquire().await;

        // Assert
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_consecutive_acquires_are_spaced() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        throttle.acquire().await;
        throttle.acquire().await;
        throttle.acquire().await;

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_acquire_reserves_next_slot() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_millis(10));

        // Act
        let before = Instant::now();
        throttle.acquire().await;

        // Assert
        assert!(throttle.next_slot.unwrap() >= before + Duration::from_millis(10));
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let throttle = RequestThrottle::with_default_interval();

        // Assert
        assert_eq!(throttle.min_interval, Duration::from_millis(25));
        assert!(throttle.next_slot.is_none());
    }
}

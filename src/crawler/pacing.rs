//! Randomized pacing between crawl items

use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// A uniform delay window `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWindow {
    min: Duration,
    max: Duration,
}

impl DelayWindow {
    /// Creates a window; inverted bounds are swapped
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.min_delay(), config.max_delay())
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws a delay uniformly from the window, at millisecond resolution
    pub fn sample(&self) -> Duration {
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        if lo == hi {
            return self.min;
        }
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }

    /// Sleeps for a sampled delay and returns it
    pub async fn pause(&self) -> Duration {
        let delay = self.sample();
        tracing::info!("Waiting {:.1}s before the next profile", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
        delay
    }
}

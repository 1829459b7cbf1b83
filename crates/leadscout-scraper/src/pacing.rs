//! Randomized pauses between page interactions.
//!
//! The worker sleeps a uniformly random duration inside a configured window
//! after every scroll and every enrichment fetch so requests never land on a
//! fixed cadence.

use std::time::Duration;

use rand::Rng;

/// Inclusive millisecond window for one kind of pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Jitter {
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A window that never sleeps.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    /// Draws one delay from the window. An inverted window collapses to its
    /// lower bound.
    #[must_use]
    pub fn sample(&self) -> Duration {
        let ms = if self.max_ms <= self.min_ms {
            self.min_ms
        } else {
            rand::rng().random_range(self.min_ms..=self.max_ms)
        };
        Duration::from_millis(ms)
    }

    /// Blocks the current thread for one sampled delay.
    pub fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Timing knobs for one scrape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After each feed scroll.
    pub scroll: Jitter,
    /// After each successful enrichment fetch.
    pub enrich: Jitter,
    /// After opening a listing's detail view.
    pub detail_settle: Duration,
}

impl Pacing {
    /// No pauses at all; for replayed pages and tests.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            scroll: Jitter::none(),
            enrich: Jitter::none(),
            detail_settle: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn from_config(config: &leadscout_core::AppConfig) -> Self {
        Self {
            scroll: Jitter::new(config.scroll_delay_min_ms, config.scroll_delay_max_ms),
            enrich: Jitter::new(config.enrich_delay_min_ms, config.enrich_delay_max_ms),
            detail_settle: Duration::from_millis(config.detail_settle_ms),
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            scroll: Jitter::new(1_000, 3_000),
            enrich: Jitter::new(1_000, 2_000),
            detail_settle: Duration::from_millis(500),
        }
    }
}

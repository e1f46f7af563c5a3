use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;

/// Picks a cache lifetime uniformly from a fixed `[min, max]` window so that
/// entries written together do not all expire together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeGenerator {
    min_secs: u64,
    max_secs: u64,
}

impl LifetimeGenerator {
    pub fn new(min_secs: u64, max_secs: u64) -> Result<Self, ConfigError> {
        if min_secs > max_secs {
            return Err(ConfigError::InvalidLifetimeWindow {
                min: min_secs,
                max: max_secs,
            });
        }
        Ok(Self { min_secs, max_secs })
    }

    pub fn min_secs(&self) -> u64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> u64 {
        self.max_secs
    }

    /// Seconds, inclusive of both bounds.
    pub fn generate_secs(&self) -> u64 {
        rand::thread_rng().gen_range(self.min_secs..=self.max_secs)
    }

    pub fn generate(&self) -> Duration {
        Duration::from_secs(self.generate_secs())
    }
}

//! Resolver configuration

use crate::error::{Result, ScrollError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for the scroll-sync resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Distance below the viewport top used as the reference line on wide
    /// viewports (usually the sticky navbar height)
    pub offset: f64,
    /// Minimum visible ratio for a section to win on visibility alone
    pub threshold: f64,
    /// Minimum time between two reported changes
    pub cooldown_ms: u64,
    /// Minimum time between two scroll evaluations
    pub frame_ms: u64,
    /// Viewports narrower than this are treated as touch devices
    pub narrow_breakpoint: f64,
    /// Whether visibility reports will arrive at all
    pub observer_available: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            offset: 80.0,
            threshold: 0.3,
            cooldown_ms: 50,
            frame_ms: 16,
            narrow_breakpoint: 768.0,
            observer_available: true,
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown_ms = u64::try_from(cooldown.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Disable the visibility producer; scroll events drive everything
    #[inline]
    #[must_use]
    pub fn without_observer(mut self) -> Self {
        self.observer_available = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// Check ranges
    ///
    /// # Errors
    /// Returns `ScrollError::Config` if the threshold is outside `0..=1` or
    /// the offset or breakpoint is negative
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ScrollError::Config(format!(
                "threshold {} not in 0..=1",
                self.threshold
            )));
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(ScrollError::Config(format!("offset {} is negative", self.offset)));
        }
        if !self.narrow_breakpoint.is_finite() || self.narrow_breakpoint < 0.0 {
            return Err(ScrollError::Config(format!(
                "breakpoint {} is negative",
                self.narrow_breakpoint
            )));
        }
        Ok(())
    }
}

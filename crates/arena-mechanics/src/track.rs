//! Resource tracks (health, stamina).
//!
//! A track is a numeric value clamped between zero and a maximum. Every
//! mutation goes through [`Track::adjust`], and deserialized tracks are
//! clamped the same way, so the value can never leave `[0, max]`.

use serde::{Deserialize, Serialize};

/// A numeric resource that is clamped between 0 and max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Current value.
    current: i32,
    /// Maximum value.
    max: i32,
}

impl Track {
    /// Create a new track starting at its maximum value.
    ///
    /// Negative maxima are treated as zero.
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Create a track with a custom starting value, clamped to `[0, max]`.
    pub fn with_current(current: i32, max: i32) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    /// Current value.
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Maximum value.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Adjust the track by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = self.current.saturating_add(delta).clamp(0, self.max);
        self.current
    }

    /// Restore a fraction of the maximum (e.g. `0.3` restores 30% of max).
    pub fn restore_fraction(&mut self, fraction: f64) -> i32 {
        let amount = (self.max as f64 * fraction.clamp(0.0, 1.0)).round() as i32;
        self.adjust(amount)
    }

    /// Refill the track to its maximum.
    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Returns true if the track is at zero.
    pub fn is_empty(&self) -> bool {
        self.current <= 0
    }

    /// Returns true if the track is at its maximum value.
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Returns the fraction of the track that is filled (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            return 1.0;
        }
        self.current as f64 / self.max as f64
    }
}

impl<'de> Deserialize<'de> for Track {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            current: i32,
            max: i32,
        }
        let helper = Helper::deserialize(deserializer)?;
        Ok(Self::with_current(helper.current, helper.max))
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

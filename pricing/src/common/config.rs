#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::error::PricingError;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// The non-recombining lattice holds `2^(steps + 1)` nodes.
pub const MAX_BINARY_TREE_STEPS: usize = 20;

/// The recombining lattice holds `(steps + 1)^2` nodes.
pub const MAX_RECOMBINING_STEPS: usize = 5_000;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatticeConfig {
    /// steps of the recombining lattice when no override is given
    pub default_steps: usize,
    /// steps between two consecutive Bermudan decision times
    pub bermudan_steps_per_interval: usize,
    /// steps of the non-recombining lattice when no override is given
    pub binary_tree_steps: usize,
    pub max_binary_tree_steps: usize,
    pub max_recombining_steps: usize,
    pub trading_days_per_year: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            default_steps: 1_000,
            bermudan_steps_per_interval: 100,
            binary_tree_steps: 16,
            max_binary_tree_steps: MAX_BINARY_TREE_STEPS,
            max_recombining_steps: MAX_RECOMBINING_STEPS,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl LatticeConfig {
    pub fn with_default_steps(mut self, steps: usize) -> Self {
        self.default_steps = steps;
        self
    }

    pub fn with_bermudan_steps_per_interval(mut self, steps: usize) -> Self {
        self.bermudan_steps_per_interval = steps;
        self
    }

    pub fn with_binary_tree_steps(mut self, steps: usize) -> Self {
        self.binary_tree_steps = steps;
        self
    }

    pub fn with_max_binary_tree_steps(mut self, limit: usize) -> Self {
        self.max_binary_tree_steps = limit;
        self
    }

    pub fn with_max_recombining_steps(mut self, limit: usize) -> Self {
        self.max_recombining_steps = limit;
        self
    }

    pub fn with_trading_days_per_year(mut self, days: f64) -> Self {
        self.trading_days_per_year = days;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonteCarloConfig {
    pub nr_paths: usize,
    pub nr_steps: usize,
    pub seed_nr: u64,
    pub trading_days_per_year: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            nr_paths: 10_000,
            nr_steps: 100,
            seed_nr: 42,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl MonteCarloConfig {
    pub fn new(nr_paths: usize, nr_steps: usize, seed_nr: u64) -> Self {
        Self {
            nr_paths,
            nr_steps,
            seed_nr,
            ..Self::default()
        }
    }

    pub fn with_trading_days_per_year(mut self, days: f64) -> Self {
        self.trading_days_per_year = days;
        self
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if self.nr_paths == 0 || self.nr_steps == 0 {
            return Err(PricingError::invalid(
                "monte carlo needs at least one path and one step",
            ));
        }
        Ok(())
    }
}

/// Rejects step counts outside `1..=limit` before anything is allocated.
pub(crate) fn check_steps(steps: usize, limit: usize) -> Result<(), PricingError> {
    if steps < 1 {
        return Err(PricingError::invalid("step count must be at least 1"));
    }
    if steps > limit {
        tracing::warn!(steps, limit, "step count exceeds lattice ceiling");
        return Err(PricingError::ResourceLimitExceeded { steps, limit });
    }
    Ok(())
}

/// A step count whose total does not fit a `usize` is over any ceiling.
pub(crate) fn steps_overflow(steps: usize, limit: usize) -> PricingError {
    tracing::warn!(steps, limit, "step count overflows");
    PricingError::ResourceLimitExceeded { steps, limit }
}

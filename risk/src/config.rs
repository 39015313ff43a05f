#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed, empirically chosen bump per Greek.
///
/// There is no adaptive step selection: for tiny volatilities or horizons
/// the difference quotients become ill-conditioned.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BumpSizes {
    /// absolute spot bump of the forward-difference delta
    pub spot: f64,
    /// absolute spot bump of the central second-difference gamma
    pub gamma_spot: f64,
    /// absolute volatility bump
    pub vol: f64,
    /// absolute rate bump
    pub rate: f64,
    /// calendar time bump in years
    pub time: f64,
    /// smallest bump accepted as divisor, `None` rejects exact zeros only
    pub threshold: Option<f64>,
}

impl Default for BumpSizes {
    fn default() -> Self {
        Self {
            spot: 0.01,
            gamma_spot: 1.0,
            vol: 1e-4,
            rate: 1e-4,
            time: 0.01,
            threshold: None,
        }
    }
}

impl BumpSizes {
    /// The non-recombining tree prices piecewise linearly in the spot between
    /// node crossings, its gamma only shows up with a bump of about 10% of the
    /// spot. Known accuracy limitation: the estimate is coarse.
    pub fn for_binary_tree() -> Self {
        Self {
            gamma_spot: 10.0,
            ..Self::default()
        }
    }

    pub fn with_spot(mut self, bump: f64) -> Self {
        self.spot = bump;
        self
    }

    pub fn with_gamma_spot(mut self, bump: f64) -> Self {
        self.gamma_spot = bump;
        self
    }

    pub fn with_vol(mut self, bump: f64) -> Self {
        self.vol = bump;
        self
    }

    pub fn with_rate(mut self, bump: f64) -> Self {
        self.rate = bump;
        self
    }

    pub fn with_time(mut self, bump: f64) -> Self {
        self.time = bump;
        self
    }

    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }
}

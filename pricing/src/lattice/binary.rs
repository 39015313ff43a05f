use ndarray::Array1;

use crate::common::config::check_steps;
use crate::common::error::PricingError;
use crate::common::models::MarketParameters;

/// Non-recombining multiplicative binary tree.
///
/// Level `i` holds `2^i` nodes. Node `k` of level `i` branches to `2k` (up)
/// and `2k + 1` (down) on level `i + 1`, so the bits of `k` spell out the
/// path that leads to it. Both branches carry weight 1/2; the log drift
/// '''math
/// \nu = (r - q) dt - \ln \cosh(\sigma \sqrt{dt})
/// '''
/// makes the discounted asset a martingale without a fitted probability.
///
/// The tree grows as `O(2^N)`: the step count is checked against a ceiling
/// before any allocation.
#[derive(Debug, Clone)]
pub struct BinaryLattice {
    steps: usize,
    dt: f64,
    up_factor: f64,
    down_factor: f64,
    step_discount: f64,
    levels: Vec<Array1<f64>>,
}

impl BinaryLattice {
    pub fn build(
        market: &MarketParameters,
        horizon: f64,
        steps: usize,
        max_steps: usize,
    ) -> Result<Self, PricingError> {
        check_steps(steps, max_steps)?;
        market.validate()?;
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(PricingError::invalid(format!(
                "horizon must be positive, got {}",
                horizon
            )));
        }

        let dt = horizon / steps as f64;
        let log_step = market.vol * dt.sqrt();
        let drift = market.carry() * dt - log_step.cosh().ln();
        let up_factor = (drift + log_step).exp();
        let down_factor = (drift - log_step).exp();
        let step_discount = (-market.rate * dt).exp();

        let mut levels = Vec::with_capacity(steps + 1);
        levels.push(Array1::from_elem(1, market.spot));
        for i in 0..steps {
            let previous = &levels[i];
            let next = Array1::from_shape_fn(1 << (i + 1), |k| {
                let parent = previous[k >> 1];
                if k & 1 == 0 {
                    parent * up_factor
                } else {
                    parent * down_factor
                }
            });
            levels.push(next);
        }

        tracing::debug!(
            steps,
            dt,
            up_factor,
            down_factor,
            nodes = (1usize << (steps + 1)) - 1,
            "built non-recombining lattice"
        );

        Ok(Self {
            steps,
            dt,
            up_factor,
            down_factor,
            step_discount,
            levels,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn up_factor(&self) -> f64 {
        self.up_factor
    }

    pub fn down_factor(&self) -> f64 {
        self.down_factor
    }

    pub fn step_discount(&self) -> f64 {
        self.step_discount
    }

    pub fn level(&self, i: usize) -> &Array1<f64> {
        &self.levels[i]
    }

    #[inline]
    pub fn price(&self, i: usize, k: usize) -> f64 {
        self.levels[i][k]
    }

    /// Prices `[S_0, ..., S_i]` along the branch choices leading to node `(i, k)`.
    pub fn path(&self, i: usize, k: usize) -> Vec<f64> {
        (0..=i).map(|l| self.levels[l][k >> (i - l)]).collect()
    }
}

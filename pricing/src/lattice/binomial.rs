use ndarray::Array2;

use crate::common::config::check_steps;
use crate::common::error::PricingError;
use crate::common::models::MarketParameters;

/// Recombining Cox-Ross-Rubinstein lattice of asset prices.
///
/// Node `(i, j)` is the price after `i` steps of which `j` were down moves:
/// '''math
/// S_{i,j} = S_0 u^{i-j} d^j, u = e^{\sigma \sqrt{dt}}, d = 1 / u
/// '''
/// Only the lower triangle `j <= i` of `prices` is populated.
/// https://en.wikipedia.org/wiki/Binomial_options_pricing_model
#[derive(Debug, Clone)]
pub struct RecombiningLattice {
    steps: usize,
    dt: f64,
    up: f64,
    down: f64,
    /// risk-neutral probability of an up move
    probability: f64,
    step_discount: f64,
    prices: Array2<f64>,
}

impl RecombiningLattice {
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
        if market.vol == 0.0 {
            return Err(PricingError::invalid(
                "zero volatility collapses the recombining lattice (u = d = 1)",
            ));
        }

        let dt = horizon / steps as f64;
        let up = (market.vol * dt.sqrt()).exp();
        let down = 1.0 / up;
        let probability = ((market.carry() * dt).exp() - down) / (up - down);
        let step_discount = (-market.rate * dt).exp();

        let spot = market.spot;
        let prices = Array2::from_shape_fn((steps + 1, steps + 1), |(i, j)| {
            if j <= i {
                spot * up.powi((i - j) as i32) * down.powi(j as i32)
            } else {
                0.0
            }
        });

        tracing::debug!(steps, dt, up, down, probability, "built recombining lattice");

        Ok(Self {
            steps,
            dt,
            up,
            down,
            probability,
            step_discount,
            prices,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn up(&self) -> f64 {
        self.up
    }

    pub fn down(&self) -> f64 {
        self.down
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// e^{-r dt}, applied once per level.
    pub fn step_discount(&self) -> f64 {
        self.step_discount
    }

    /// Price at level `i` after `j` down moves, `j <= i`.
    #[inline]
    pub fn price(&self, i: usize, j: usize) -> f64 {
        self.prices[[i, j]]
    }

    /// Fails with `InvalidLattice` unless `0 <= p <= 1`.
    pub fn check_probability(&self) -> Result<(), PricingError> {
        if self.probability.is_finite() && (0.0..=1.0).contains(&self.probability) {
            Ok(())
        } else {
            tracing::warn!(
                probability = self.probability,
                "arbitrage-inconsistent recombining lattice"
            );
            Err(PricingError::InvalidLattice {
                probability: self.probability,
            })
        }
    }
}

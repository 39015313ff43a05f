use std::collections::HashMap;

use lattice_pricing::{Greek, LatticeGreeks, Pricer, Scenario};

use crate::config::BumpSizes;
use crate::error::RiskError;
use crate::finite_difference::{central_second_difference, forward_difference};

/// Greeks by bump-and-reprice on top of any [`Pricer`].
///
/// Every perturbation is a copy of the instrument's market snapshot, the
/// instrument itself is never mutated, so one instrument can serve
/// concurrent estimators.
///
/// Delta and gamma are read off the base lattice when the instrument offers
/// it (recombining trees) unless [`SensitivityEstimator::bump_and_reprice`]
/// is requested.
pub struct SensitivityEstimator<'a, T: ?Sized> {
    instrument: &'a T,
    bumps: BumpSizes,
    use_lattice: bool,
}

impl<'a, T> SensitivityEstimator<'a, T>
where
    T: Pricer + ?Sized,
{
    pub fn new(instrument: &'a T) -> Self {
        Self {
            instrument,
            bumps: BumpSizes::default(),
            use_lattice: true,
        }
    }

    pub fn with_bumps(mut self, bumps: BumpSizes) -> Self {
        self.bumps = bumps;
        self
    }

    /// Always re-price, even when lattice sensitivities are available.
    pub fn bump_and_reprice(mut self) -> Self {
        self.use_lattice = false;
        self
    }

    fn base(&self) -> Scenario {
        Scenario::new(self.instrument.market())
    }

    fn reprice(&self, scenario: &Scenario, steps: Option<usize>) -> Result<f64, RiskError> {
        Ok(self.instrument.price_scenario(scenario, steps)?)
    }

    fn lattice_greeks(&self, steps: Option<usize>) -> Option<Result<LatticeGreeks, RiskError>> {
        if !self.use_lattice {
            return None;
        }
        self.instrument
            .lattice_greeks(steps)
            .map(|greeks| greeks.map_err(RiskError::from))
    }

    pub fn price(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        self.reprice(&self.base(), steps)
    }

    pub fn delta(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        if let Some(greeks) = self.lattice_greeks(steps) {
            return greeks.map(|g| g.delta);
        }
        let base = self.base();
        let h = self.bumps.spot;
        let bumped = Scenario::new(base.market.with_spot(base.market.spot + h));

        let price = self.reprice(&base, steps)?;
        let price_eps = self.reprice(&bumped, steps)?;
        tracing::debug!(bump = h, price, price_eps, "delta");
        forward_difference(price_eps, price, h, self.bumps.threshold)
    }

    pub fn gamma(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        if let Some(greeks) = self.lattice_greeks(steps) {
            return greeks.map(|g| g.gamma);
        }
        let base = self.base();
        let h = self.bumps.gamma_spot;
        let spot = base.market.spot;
        let up = Scenario::new(base.market.with_spot(spot + h));
        let down = Scenario::new(base.market.with_spot(spot - h));

        let price = self.reprice(&base, steps)?;
        let price_up = self.reprice(&up, steps)?;
        let price_down = self.reprice(&down, steps)?;
        tracing::debug!(bump = h, price, price_up, price_down, "gamma");
        central_second_difference(price_up, price, price_down, h, self.bumps.threshold)
    }

    pub fn vega(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        let base = self.base();
        let h = self.bumps.vol;
        let bumped = Scenario::new(base.market.with_vol(base.market.vol + h));

        let price = self.reprice(&base, steps)?;
        let price_eps = self.reprice(&bumped, steps)?;
        tracing::debug!(bump = h, price, price_eps, "vega");
        forward_difference(price_eps, price, h, self.bumps.threshold)
    }

    pub fn rho(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        let base = self.base();
        let h = self.bumps.rate;
        let bumped = Scenario::new(base.market.with_rate(base.market.rate + h));

        let price = self.reprice(&base, steps)?;
        let price_eps = self.reprice(&bumped, steps)?;
        tracing::debug!(bump = h, price, price_eps, "rho");
        forward_difference(price_eps, price, h, self.bumps.threshold)
    }

    /// Price change per year of calendar time: the contract is re-priced as
    /// seen `time` years later (shorter expiry, every decision date shifted),
    /// so a decaying option has a negative theta.
    pub fn theta(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        let base = self.base();
        let h = self.bumps.time;
        let later = base.with_elapsed(h);

        let price = self.reprice(&base, steps)?;
        let price_eps = self.reprice(&later, steps)?;
        tracing::debug!(bump = h, price, price_eps, "theta");
        forward_difference(price_eps, price, h, self.bumps.threshold)
    }

    pub fn greek(&self, greek: Greek, steps: Option<usize>) -> Result<f64, RiskError> {
        match greek {
            Greek::Delta => self.delta(steps),
            Greek::Gamma => self.gamma(steps),
            Greek::Vega => self.vega(steps),
            Greek::Rho => self.rho(steps),
            Greek::Theta => self.theta(steps),
        }
    }

    /// The requested greeks; a failing one does not hide the others.
    pub fn greeks(
        &self,
        greeks: &[Greek],
        steps: Option<usize>,
    ) -> HashMap<Greek, Result<f64, RiskError>> {
        greeks
            .iter()
            .map(|greek| (*greek, self.greek(*greek, steps)))
            .collect()
    }
}

/// Per-instance Greeks with default bump sizes.
pub trait Greeks: Pricer {
    fn delta(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        SensitivityEstimator::new(self).delta(steps)
    }

    fn gamma(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        SensitivityEstimator::new(self).gamma(steps)
    }

    fn vega(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        SensitivityEstimator::new(self).vega(steps)
    }

    fn rho(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        SensitivityEstimator::new(self).rho(steps)
    }

    fn theta(&self, steps: Option<usize>) -> Result<f64, RiskError> {
        SensitivityEstimator::new(self).theta(steps)
    }
}

impl<T: Pricer + ?Sized> Greeks for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use lattice_pricing::{MarketParameters, PricingError};

    /// Prices `spot^2 + vol + rate - elapsed`, derivatives known in closed form.
    struct Quadratic {
        market: MarketParameters,
    }

    impl Pricer for Quadratic {
        fn market(&self) -> MarketParameters {
            self.market
        }

        fn price_scenario(
            &self,
            scenario: &Scenario,
            _steps: Option<usize>,
        ) -> Result<f64, PricingError> {
            scenario.market.validate()?;
            let m = scenario.market;
            Ok(m.spot * m.spot + 2.0 * m.vol + 3.0 * m.rate - 4.0 * scenario.elapsed)
        }
    }

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn difference_quotients() {
        let quadratic = Quadratic {
            market: MarketParameters::new(3.0, 0.05, 0.0, 0.2),
        };
        let estimator = SensitivityEstimator::new(&quadratic);

        assert_approx_eq!(estimator.delta(None).unwrap(), 6.01, TOLERANCE);
        assert_approx_eq!(estimator.gamma(None).unwrap(), 2.0, TOLERANCE);
        assert_approx_eq!(estimator.vega(None).unwrap(), 2.0, TOLERANCE);
        assert_approx_eq!(estimator.rho(None).unwrap(), 3.0, TOLERANCE);
        assert_approx_eq!(estimator.theta(None).unwrap(), -4.0, TOLERANCE);
    }

    #[test]
    fn the_snapshot_is_never_mutated() {
        let market = MarketParameters::new(3.0, 0.05, 0.0, 0.2);
        let quadratic = Quadratic { market };
        let _ = quadratic.delta(None);
        let _ = quadratic.vega(None);
        assert_eq!(quadratic.market(), market);
    }

    #[test]
    fn zero_bump_is_rejected() {
        let quadratic = Quadratic {
            market: MarketParameters::new(3.0, 0.05, 0.0, 0.2),
        };
        let estimator =
            SensitivityEstimator::new(&quadratic).with_bumps(BumpSizes::default().with_vol(0.0));
        assert_eq!(estimator.vega(None), Err(RiskError::ZeroDivision));
    }

    #[test]
    fn pricing_failures_propagate() {
        // spot - gamma bump is negative
        let quadratic = Quadratic {
            market: MarketParameters::new(0.5, 0.05, 0.0, 0.2),
        };
        let results = SensitivityEstimator::new(&quadratic).greeks(&Greek::ALL, None);
        assert_eq!(results.len(), 5);
        assert!(matches!(
            results[&Greek::Gamma],
            Err(RiskError::Pricing(PricingError::InvalidParameter(_)))
        ));
        assert!(results[&Greek::Delta].is_ok());
    }
}

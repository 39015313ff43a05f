use crate::common::config::MonteCarloConfig;
use crate::common::error::PricingError;
use crate::common::models::{Expiry, MarketParameters};
use crate::common::pricer::{Pricer, Scenario};
use crate::payoffs::PayoffFn;
use crate::simulation::gbm::GeometricBrownianMotion;
use crate::simulation::monte_carlo::{MonteCarloPathSimulator, PathEvaluator};

/// European-style contract valued by simulating risk-neutral GBM paths.
///
/// Every valuation draws its randoms from a fresh generator seeded with
/// `seed_nr`, so bumped scenarios share their random numbers with the base.
/// Bump-and-reprice theta and gamma remain noisy even so: the payoff kink
/// makes the difference quotient sensitive to the sampled paths near the strike.
#[derive(Debug, Clone)]
pub struct MonteCarloEuropeanOption<P> {
    market: MarketParameters,
    expiry: Expiry,
    payoff: P,
    config: MonteCarloConfig,
}

impl<P: PayoffFn> MonteCarloEuropeanOption<P> {
    pub fn new(
        market: MarketParameters,
        expiry: Expiry,
        payoff: P,
        config: MonteCarloConfig,
    ) -> Self {
        Self {
            market,
            expiry,
            payoff,
            config,
        }
    }

    fn sample_payoffs(&self, scenario: &Scenario, nr_steps: usize) -> Result<f64, PricingError> {
        let market = &scenario.market;
        market.validate()?;
        let tte = self.expiry.in_years(self.config.trading_days_per_year) - scenario.elapsed;
        if !tte.is_finite() || tte <= 0.0 {
            return Err(PricingError::invalid(format!(
                "time to expiration must be positive, got {}",
                tte
            )));
        }

        let mc_simulator = MonteCarloPathSimulator::new(self.config.nr_paths, nr_steps);
        let stock_gbm = GeometricBrownianMotion::risk_neutral(market, tte / nr_steps as f64);
        let paths = mc_simulator
            .simulate_standard_normal_paths(self.config.seed_nr, |random_normals| {
                stock_gbm.generate_path(random_normals)
            });

        let disc_factor = market.discount_factor(tte);
        let path_evaluator = PathEvaluator::new(&paths);
        let price = path_evaluator
            .evaluate_average(|path| Some(self.payoff.evaluate_path(path) * disc_factor))
            .ok_or_else(|| PricingError::invalid("no paths simulated"))?;

        tracing::debug!(
            nr_paths = self.config.nr_paths,
            nr_steps,
            seed_nr = self.config.seed_nr,
            price,
            "monte carlo valuation"
        );
        Ok(price)
    }
}

impl<P: PayoffFn> Pricer for MonteCarloEuropeanOption<P> {
    fn market(&self) -> MarketParameters {
        self.market
    }

    /// `steps` overrides the number of time steps per path.
    fn price_scenario(
        &self,
        scenario: &Scenario,
        steps: Option<usize>,
    ) -> Result<f64, PricingError> {
        let nr_steps = steps.unwrap_or(self.config.nr_steps);
        let config = MonteCarloConfig {
            nr_steps,
            ..self.config.clone()
        };
        config.validate()?;
        self.sample_payoffs(scenario, nr_steps)
    }
}

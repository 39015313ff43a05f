use std::borrow::Cow;

use crate::common::config::{steps_overflow, LatticeConfig};
use crate::common::error::PricingError;
use crate::common::models::{Expiry, MarketParameters};
use crate::common::pricer::{LatticeGreeks, Pricer, Scenario};
use crate::lattice::binary::BinaryLattice;
use crate::lattice::binomial::RecombiningLattice;
use crate::lattice::exercise::{ExercisePolicy, ExerciseSchedule};
use crate::lattice::valuator::{ValueLattice, Valuator};
use crate::payoffs::PayoffFn;

/// Horizon, total step count and exercise policy of one valuation.
struct Discretization<'a> {
    horizon: f64,
    steps: usize,
    policy: Cow<'a, ExercisePolicy>,
}

fn discretize<'a>(
    expiry: &Expiry,
    policy: &'a ExercisePolicy,
    config: &LatticeConfig,
    elapsed: f64,
    steps: usize,
    limit: usize,
) -> Result<Discretization<'a>, PricingError> {
    match policy {
        ExercisePolicy::Bermudan(schedule) => {
            // Level count comes from the unshifted schedule: a scenario later in
            // time keeps the grid size, only `dt` shrinks. A decision time at 0
            // opens no interval.
            let intervals = schedule.times().iter().filter(|t| **t > 0.0).count();
            let total = steps
                .checked_mul(intervals)
                .ok_or_else(|| steps_overflow(steps, limit))?;
            if elapsed == 0.0 {
                return Ok(Discretization {
                    horizon: schedule.horizon(),
                    steps: total,
                    policy: Cow::Borrowed(policy),
                });
            }
            let shifted = schedule.shifted(elapsed)?;
            Ok(Discretization {
                horizon: shifted.horizon(),
                steps: total,
                policy: Cow::Owned(ExercisePolicy::Bermudan(shifted)),
            })
        }
        _ => Ok(Discretization {
            horizon: expiry.in_years(config.trading_days_per_year) - elapsed,
            steps,
            policy: Cow::Borrowed(policy),
        }),
    }
}

/// A contract priced on the recombining lattice.
///
/// For Bermudan contracts the step count is per decision interval and the
/// lattice spans `steps * number_of_decision_times` levels.
#[derive(Debug, Clone)]
pub struct TreeOption<P> {
    market: MarketParameters,
    expiry: Expiry,
    payoff: P,
    policy: ExercisePolicy,
    config: LatticeConfig,
}

impl<P: PayoffFn> TreeOption<P> {
    pub fn new(
        market: MarketParameters,
        expiry: Expiry,
        payoff: P,
        policy: ExercisePolicy,
    ) -> Self {
        let expiry = match &policy {
            ExercisePolicy::Bermudan(schedule) => Expiry::Years(schedule.horizon()),
            _ => expiry,
        };
        Self {
            market,
            expiry,
            payoff,
            policy,
            config: LatticeConfig::default(),
        }
    }

    pub fn european(market: MarketParameters, expiry: Expiry, payoff: P) -> Self {
        Self::new(market, expiry, payoff, ExercisePolicy::European)
    }

    pub fn american(market: MarketParameters, expiry: Expiry, payoff: P) -> Self {
        Self::new(market, expiry, payoff, ExercisePolicy::American)
    }

    pub fn bermudan(market: MarketParameters, schedule: ExerciseSchedule, payoff: P) -> Self {
        let expiry = Expiry::Years(schedule.horizon());
        Self::new(market, expiry, payoff, ExercisePolicy::Bermudan(schedule))
    }

    pub fn with_config(mut self, config: LatticeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(&self) -> &ExercisePolicy {
        &self.policy
    }

    fn default_steps(&self) -> usize {
        match self.policy {
            ExercisePolicy::Bermudan(_) => self.config.bermudan_steps_per_interval,
            _ => self.config.default_steps,
        }
    }

    /// The asset-price lattice and the rolled-back value lattice.
    pub fn trees(
        &self,
        scenario: &Scenario,
        steps: Option<usize>,
    ) -> Result<(RecombiningLattice, ValueLattice), PricingError> {
        let steps = steps.unwrap_or_else(|| self.default_steps());
        let grid = discretize(
            &self.expiry,
            &self.policy,
            &self.config,
            scenario.elapsed,
            steps,
            self.config.max_recombining_steps,
        )?;
        let lattice = RecombiningLattice::build(
            &scenario.market,
            grid.horizon,
            grid.steps,
            self.config.max_recombining_steps,
        )?;
        let values = Valuator::new(&self.payoff, grid.policy.as_ref()).roll_back(&lattice)?;
        Ok((lattice, values))
    }

    /// Delta and gamma from the first two levels, theta from the node at
    /// level 2 that sits at today's spot.
    pub fn greeks_from_lattice(&self, steps: Option<usize>) -> Result<LatticeGreeks, PricingError> {
        let (s, v) = self.trees(&Scenario::new(self.market), steps)?;
        if s.steps() < 2 {
            return Err(PricingError::invalid(
                "lattice sensitivities need at least two steps",
            ));
        }
        let delta = (v.value(1, 0) - v.value(1, 1)) / (s.price(1, 0) - s.price(1, 1));
        let upper = (v.value(2, 0) - v.value(2, 1)) / (s.price(2, 0) - s.price(2, 1));
        let lower = (v.value(2, 1) - v.value(2, 2)) / (s.price(2, 1) - s.price(2, 2));
        let gamma = 2.0 * (upper - lower) / (s.price(2, 0) - s.price(2, 2));
        let theta = (v.value(2, 1) - v.root()) / (2.0 * s.dt());
        Ok(LatticeGreeks {
            delta,
            gamma,
            theta,
        })
    }
}

impl<P: PayoffFn> Pricer for TreeOption<P> {
    fn market(&self) -> MarketParameters {
        self.market
    }

    fn price_scenario(
        &self,
        scenario: &Scenario,
        steps: Option<usize>,
    ) -> Result<f64, PricingError> {
        self.trees(scenario, steps).map(|(_, values)| values.root())
    }

    fn lattice_greeks(&self, steps: Option<usize>) -> Option<Result<LatticeGreeks, PricingError>> {
        Some(self.greeks_from_lattice(steps))
    }
}

/// A contract priced on the non-recombining binary lattice.
///
/// Supports path-dependent payoffs. With symmetric sampling the price is
/// the average of the `N` and `N + 1` step values, which cancels most of the
/// odd/even oscillation of the tree.
#[derive(Debug, Clone)]
pub struct BinaryTreeOption<P> {
    market: MarketParameters,
    expiry: Expiry,
    payoff: P,
    policy: ExercisePolicy,
    config: LatticeConfig,
    symmetric: bool,
}

impl<P: PayoffFn> BinaryTreeOption<P> {
    pub fn new(
        market: MarketParameters,
        expiry: Expiry,
        payoff: P,
        policy: ExercisePolicy,
    ) -> Self {
        let expiry = match &policy {
            ExercisePolicy::Bermudan(schedule) => Expiry::Years(schedule.horizon()),
            _ => expiry,
        };
        Self {
            market,
            expiry,
            payoff,
            policy,
            config: LatticeConfig::default(),
            symmetric: false,
        }
    }

    pub fn european(market: MarketParameters, expiry: Expiry, payoff: P) -> Self {
        Self::new(market, expiry, payoff, ExercisePolicy::European)
    }

    pub fn american(market: MarketParameters, expiry: Expiry, payoff: P) -> Self {
        Self::new(market, expiry, payoff, ExercisePolicy::American)
    }

    pub fn bermudan(market: MarketParameters, schedule: ExerciseSchedule, payoff: P) -> Self {
        let expiry = Expiry::Years(schedule.horizon());
        Self::new(market, expiry, payoff, ExercisePolicy::Bermudan(schedule))
    }

    pub fn with_config(mut self, config: LatticeConfig) -> Self {
        self.config = config;
        self
    }

    /// Price with [`BinaryTreeOption::price_symmetric`] by default.
    pub fn with_symmetric_sampling(mut self) -> Self {
        self.symmetric = true;
        self
    }

    fn value(&self, scenario: &Scenario, steps: usize) -> Result<f64, PricingError> {
        let grid = discretize(
            &self.expiry,
            &self.policy,
            &self.config,
            scenario.elapsed,
            steps,
            self.config.max_binary_tree_steps,
        )?;
        let lattice = BinaryLattice::build(
            &scenario.market,
            grid.horizon,
            grid.steps,
            self.config.max_binary_tree_steps,
        )?;
        Valuator::new(&self.payoff, grid.policy.as_ref()).roll_back_binary(&lattice)
    }

    fn steps_or_default(&self, steps: Option<usize>) -> usize {
        steps.unwrap_or(match self.policy {
            ExercisePolicy::Bermudan(_) => 1,
            _ => self.config.binary_tree_steps,
        })
    }

    /// Average of the `N` and `N + 1` step prices.
    pub fn price_symmetric(&self, steps: Option<usize>) -> Result<f64, PricingError> {
        self.symmetric_value(&Scenario::new(self.market), self.steps_or_default(steps))
    }

    fn symmetric_value(&self, scenario: &Scenario, steps: usize) -> Result<f64, PricingError> {
        let finer = steps
            .checked_add(1)
            .ok_or_else(|| steps_overflow(steps, self.config.max_binary_tree_steps))?;
        let coarse = self.value(scenario, steps)?;
        let fine = self.value(scenario, finer)?;
        Ok(0.5 * (coarse + fine))
    }
}

impl<P: PayoffFn> Pricer for BinaryTreeOption<P> {
    fn market(&self) -> MarketParameters {
        self.market
    }

    fn price_scenario(
        &self,
        scenario: &Scenario,
        steps: Option<usize>,
    ) -> Result<f64, PricingError> {
        let steps = self.steps_or_default(steps);
        if self.symmetric {
            self.symmetric_value(scenario, steps)
        } else {
            self.value(scenario, steps)
        }
    }
}

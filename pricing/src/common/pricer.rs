use crate::common::error::PricingError;
use crate::common::models::MarketParameters;

/// A snapshot of the inputs a re-pricing depends on.
///
/// `elapsed` is calendar time (in years) that has passed since the base
/// valuation: expiries and exercise dates move `elapsed` closer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub market: MarketParameters,
    pub elapsed: f64,
}

impl Scenario {
    pub fn new(market: MarketParameters) -> Self {
        Self {
            market,
            elapsed: 0.0,
        }
    }

    pub fn with_elapsed(self, elapsed: f64) -> Self {
        Self { elapsed, ..self }
    }
}

/// Sensitivities read directly off an already rolled-back recombining lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
}

/// Anything that can be re-priced under a perturbed scenario.
pub trait Pricer {
    /// The base market snapshot of the instrument.
    fn market(&self) -> MarketParameters;

    /// Price under `scenario`; `steps` overrides the configured discretization.
    fn price_scenario(
        &self,
        scenario: &Scenario,
        steps: Option<usize>,
    ) -> Result<f64, PricingError>;

    fn price(&self, steps: Option<usize>) -> Result<f64, PricingError> {
        self.price_scenario(&Scenario::new(self.market()), steps)
    }

    /// Delta, gamma and theta from the base lattice, when the topology allows it.
    fn lattice_greeks(&self, _steps: Option<usize>) -> Option<Result<LatticeGreeks, PricingError>> {
        None
    }
}

pub mod analytic;
pub mod common;
pub mod lattice;
pub mod payoffs;
pub mod simulation;

pub use common::config::{LatticeConfig, MonteCarloConfig};
pub use common::error::PricingError;
pub use common::models::{Expiry, Greek, MarketParameters, OptionType};
pub use common::pricer::{LatticeGreeks, Pricer, Scenario};
pub use payoffs::{Payoff, PayoffFn};

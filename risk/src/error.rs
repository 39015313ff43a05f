use lattice_pricing::PricingError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("division by 0")]
    ZeroDivision,
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

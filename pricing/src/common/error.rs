use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Non-positive spot, negative volatility, zero steps or a degenerate horizon.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The risk-neutral transition probability left [0, 1].
    #[error("invalid lattice: risk-neutral probability {probability} outside [0, 1]")]
    InvalidLattice { probability: f64 },
    #[error("resource limit exceeded: {steps} steps requested, ceiling is {limit}")]
    ResourceLimitExceeded { steps: usize, limit: usize },
}

impl PricingError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PricingError::InvalidParameter(msg.into())
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::error::PricingError;

/// Market state of a single underlying.
///
/// Perturbations for Greeks are taken on copies (`with_*`), the base
/// snapshot is never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarketParameters {
    /// the asset's price at time t
    pub spot: f64,
    /// the annualized (continuously compounded) risk-free interest rate
    pub rate: f64,
    /// the annualized dividend or convenience yield
    pub divid: f64,
    /// the annualized standard deviation of the asset's log returns
    pub vol: f64,
}

impl Default for MarketParameters {
    fn default() -> Self {
        Self::new(100.0, 0.05, 0.03, 0.20)
    }
}

impl MarketParameters {
    pub fn new(spot: f64, rate: f64, divid: f64, vol: f64) -> Self {
        Self {
            spot,
            rate,
            divid,
            vol,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(PricingError::invalid(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if !self.vol.is_finite() || self.vol < 0.0 {
            return Err(PricingError::invalid(format!(
                "volatility must be non-negative, got {}",
                self.vol
            )));
        }
        if !self.rate.is_finite() || !self.divid.is_finite() {
            return Err(PricingError::invalid("rate and dividend yield must be finite"));
        }
        Ok(())
    }

    /// Drift of the underlying under the risk-neutral measure.
    pub fn carry(&self) -> f64 {
        self.rate - self.divid
    }

    pub fn discount_factor(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }

    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    pub fn with_rate(self, rate: f64) -> Self {
        Self { rate, ..self }
    }

    pub fn with_divid(self, divid: f64) -> Self {
        Self { divid, ..self }
    }

    pub fn with_vol(self, vol: f64) -> Self {
        Self { vol, ..self }
    }
}

/// Time to expiration, either as a year fraction or as a count of trading days.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expiry {
    Years(f64),
    TradingDays(f64),
}

impl Expiry {
    pub fn in_years(&self, trading_days_per_year: f64) -> f64 {
        match self {
            Expiry::Years(t) => *t,
            Expiry::TradingDays(days) => days / trading_days_per_year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Greek {
    Delta,
    Gamma,
    Vega,
    Rho,
    Theta,
}

impl Greek {
    pub const ALL: [Greek; 5] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Vega,
        Greek::Rho,
        Greek::Theta,
    ];
}

/// Inputs of the closed-form vanilla formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativeParameter {
    pub market: MarketParameters,
    /// the strike or exercise price of the asset
    pub strike: f64,
    /// (T - t) in years, where T is the time of the option's expiration and t is the current time
    pub time_to_expiration: f64,
}

impl DerivativeParameter {
    pub fn new(market: MarketParameters, strike: f64, time_to_expiration: f64) -> Self {
        Self {
            market,
            strike,
            time_to_expiration,
        }
    }
}

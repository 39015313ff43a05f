use crate::common::models::{DerivativeParameter, OptionType};
use probability::distribution::{Continuous, Distribution, Gaussian};

pub(crate) fn cdf(d: f64) -> f64 {
    let normal = Gaussian::new(0.0, 1.0);
    normal.distribution(d)
}

pub(crate) fn pdf(d: f64) -> f64 {
    let normal = Gaussian::new(0.0, 1.0);
    normal.density(d)
}

pub trait OptionPrice {
    type Params;
    fn put(params: &Self::Params) -> f64;
    fn call(params: &Self::Params) -> f64;

    fn price(option_type: OptionType, params: &Self::Params) -> f64 {
        match option_type {
            OptionType::Call => Self::call(params),
            OptionType::Put => Self::put(params),
        }
    }
}

/// European Put and Call option prices for stocks paying a continuous dividend yield.
/// https://en.wikipedia.org/wiki/Black-Scholes_model
pub struct BlackScholesMerton;

impl BlackScholesMerton {
    fn d1_d2(dp: &DerivativeParameter) -> (f64, f64) {
        let m = &dp.market;
        let sigma_exp = m.vol * dp.time_to_expiration.sqrt();
        let d1 = ((m.spot / dp.strike).ln()
            + (m.rate - m.divid + m.vol.powi(2) / 2.0) * dp.time_to_expiration)
            / sigma_exp;
        (d1, d1 - sigma_exp)
    }

    fn discount(dp: &DerivativeParameter) -> f64 {
        (-dp.market.rate * dp.time_to_expiration).exp()
    }

    fn dividend_discount(dp: &DerivativeParameter) -> f64 {
        (-dp.market.divid * dp.time_to_expiration).exp()
    }

    /// Value of the forward contract paying S_T - K at expiry.
    pub fn forward(dp: &DerivativeParameter) -> f64 {
        dp.market.spot * Self::dividend_discount(dp) - dp.strike * Self::discount(dp)
    }

    /// Cash-or-nothing call paying 1.
    pub fn digital_call(dp: &DerivativeParameter) -> f64 {
        let (_, d2) = Self::d1_d2(dp);
        Self::discount(dp) * cdf(d2)
    }

    /// Cash-or-nothing put paying 1.
    pub fn digital_put(dp: &DerivativeParameter) -> f64 {
        let (_, d2) = Self::d1_d2(dp);
        Self::discount(dp) * cdf(-d2)
    }

    pub fn delta(option_type: OptionType, dp: &DerivativeParameter) -> f64 {
        let (d1, _) = Self::d1_d2(dp);
        match option_type {
            OptionType::Call => Self::dividend_discount(dp) * cdf(d1),
            OptionType::Put => -Self::dividend_discount(dp) * cdf(-d1),
        }
    }

    /// Identical for calls and puts.
    pub fn gamma(dp: &DerivativeParameter) -> f64 {
        let (d1, _) = Self::d1_d2(dp);
        Self::dividend_discount(dp) * pdf(d1)
            / (dp.market.spot * dp.market.vol * dp.time_to_expiration.sqrt())
    }

    /// Identical for calls and puts.
    pub fn vega(dp: &DerivativeParameter) -> f64 {
        let (d1, _) = Self::d1_d2(dp);
        dp.market.spot * Self::dividend_discount(dp) * dp.time_to_expiration.sqrt() * pdf(d1)
    }

    pub fn rho(option_type: OptionType, dp: &DerivativeParameter) -> f64 {
        let (_, d2) = Self::d1_d2(dp);
        let k_t_disc = dp.strike * dp.time_to_expiration * Self::discount(dp);
        match option_type {
            OptionType::Call => k_t_disc * cdf(d2),
            OptionType::Put => -k_t_disc * cdf(-d2),
        }
    }

    /// Price change per year of calendar time, hence negative for a plain long option.
    pub fn theta(option_type: OptionType, dp: &DerivativeParameter) -> f64 {
        let (d1, d2) = Self::d1_d2(dp);
        let m = &dp.market;
        let fwd_spot = m.spot * Self::dividend_discount(dp);
        let k_disc = dp.strike * Self::discount(dp);
        let decay = fwd_spot * m.vol * pdf(d1) / (2.0 * dp.time_to_expiration.sqrt());
        match option_type {
            OptionType::Call => fwd_spot * m.divid * cdf(d1) - k_disc * m.rate * cdf(d2) - decay,
            OptionType::Put => -fwd_spot * m.divid * cdf(-d1) + k_disc * m.rate * cdf(-d2) - decay,
        }
    }
}

impl OptionPrice for BlackScholesMerton {
    type Params = DerivativeParameter;

    fn call(dp: &DerivativeParameter) -> f64 {
        let (d1, d2) = Self::d1_d2(dp);
        cdf(d1) * dp.market.spot * Self::dividend_discount(dp)
            - cdf(d2) * dp.strike * Self::discount(dp)
    }

    fn put(dp: &DerivativeParameter) -> f64 {
        let (d1, d2) = Self::d1_d2(dp);
        cdf(-d2) * dp.strike * Self::discount(dp)
            - cdf(-d1) * dp.market.spot * Self::dividend_discount(dp)
    }
}

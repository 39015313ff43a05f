//! Standard option payoffs.
//!
//! The lattice and Monte Carlo engines only see the [`PayoffFn`] contract:
//! deterministic, side-effect free and defined on the whole positive real line.
//! Any `Fn(f64) -> f64` closure satisfies it, so custom payoffs need no wrapper.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub trait PayoffFn {
    /// Payoff of a contract that only looks at a single price.
    fn evaluate(&self, spot: f64) -> f64;

    /// Payoff of the price path `[S_0, S_1, ..., S_t]`.
    fn evaluate_path(&self, path: &[f64]) -> f64 {
        path.last().map_or(0.0, |spot| self.evaluate(*spot))
    }

    fn is_path_dependent(&self) -> bool {
        false
    }
}

impl<F> PayoffFn for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, spot: f64) -> f64 {
        self(spot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Payoff {
    /// S - K
    Forward { strike: f64 },
    /// max(S - K, 0)
    VanillaCall { strike: f64 },
    /// max(K - S, 0)
    VanillaPut { strike: f64 },
    /// 1 if S > K
    DigitalCall { strike: f64 },
    /// 1 if S < K
    DigitalPut { strike: f64 },
    /// max(S - K, 0)^power
    PowerCall { strike: f64, power: f64 },
    /// max(K - S, 0)^power
    PowerPut { strike: f64, power: f64 },
    /// |S - K|
    Straddle { strike: f64 },
    /// max(mean(S) - K, 0)
    AsianCall { strike: f64 },
    /// max(K - mean(S), 0)
    AsianPut { strike: f64 },
    /// S_T - min(S), floating strike
    LookbackCall,
    /// max(S) - S_T, floating strike
    LookbackPut,
    /// max(S_T - K, 0) unless the path touched the barrier from below
    UpAndOutCall { strike: f64, barrier: f64 },
    /// max(K - S_T, 0) unless the path touched the barrier from above
    DownAndOutPut { strike: f64, barrier: f64 },
}

impl PayoffFn for Payoff {
    fn evaluate(&self, spot: f64) -> f64 {
        self.evaluate_path(&[spot])
    }

    fn evaluate_path(&self, path: &[f64]) -> f64 {
        let last = match path.last() {
            Some(last) => *last,
            None => return 0.0,
        };
        match *self {
            Payoff::Forward { strike } => last - strike,
            Payoff::VanillaCall { strike } => (last - strike).max(0.0),
            Payoff::VanillaPut { strike } => (strike - last).max(0.0),
            Payoff::DigitalCall { strike } => indicator(last > strike),
            Payoff::DigitalPut { strike } => indicator(last < strike),
            Payoff::PowerCall { strike, power } => (last - strike).max(0.0).powf(power),
            Payoff::PowerPut { strike, power } => (strike - last).max(0.0).powf(power),
            Payoff::Straddle { strike } => (last - strike).abs(),
            Payoff::AsianCall { strike } => (average(path) - strike).max(0.0),
            Payoff::AsianPut { strike } => (strike - average(path)).max(0.0),
            Payoff::LookbackCall => last - path.iter().cloned().fold(f64::INFINITY, f64::min),
            Payoff::LookbackPut => path.iter().cloned().fold(f64::NEG_INFINITY, f64::max) - last,
            Payoff::UpAndOutCall { strike, barrier } => {
                if path.iter().any(|s| *s >= barrier) {
                    0.0
                } else {
                    (last - strike).max(0.0)
                }
            }
            Payoff::DownAndOutPut { strike, barrier } => {
                if path.iter().any(|s| *s <= barrier) {
                    0.0
                } else {
                    (strike - last).max(0.0)
                }
            }
        }
    }

    fn is_path_dependent(&self) -> bool {
        matches!(
            self,
            Payoff::AsianCall { .. }
                | Payoff::AsianPut { .. }
                | Payoff::LookbackCall
                | Payoff::LookbackPut
                | Payoff::UpAndOutCall { .. }
                | Payoff::DownAndOutPut { .. }
        )
    }
}

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

fn average(path: &[f64]) -> f64 {
    path.iter().sum::<f64>() / path.len() as f64
}

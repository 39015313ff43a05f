use ndarray::{Array1, Array2};

use crate::common::error::PricingError;
use crate::lattice::binary::BinaryLattice;
use crate::lattice::binomial::RecombiningLattice;
use crate::lattice::exercise::ExercisePolicy;
use crate::payoffs::PayoffFn;

/// Discounted contract values on the nodes of a recombining lattice.
#[derive(Debug, Clone)]
pub struct ValueLattice {
    values: Array2<f64>,
}

impl ValueLattice {
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    pub fn root(&self) -> f64 {
        self.values[[0, 0]]
    }
}

/// Backward induction of a payoff through a lattice under an exercise policy.
pub struct Valuator<'a, P: ?Sized> {
    payoff: &'a P,
    policy: &'a ExercisePolicy,
}

impl<'a, P> Valuator<'a, P>
where
    P: PayoffFn + ?Sized,
{
    pub fn new(payoff: &'a P, policy: &'a ExercisePolicy) -> Self {
        Self { payoff, policy }
    }

    /// Rolls the payoff back through the recombining lattice.
    ///
    /// `V_{i,j} = e^{-r dt} (p V_{i+1,j} + (1 - p) V_{i+1,j+1})`, then the
    /// exercise policy decides between continuation and intrinsic value.
    pub fn roll_back(&self, lattice: &RecombiningLattice) -> Result<ValueLattice, PricingError> {
        if self.payoff.is_path_dependent() {
            return Err(PricingError::invalid(
                "path-dependent payoffs need the non-recombining lattice",
            ));
        }
        lattice.check_probability()?;

        let steps = lattice.steps();
        let p = lattice.probability();
        let disc = lattice.step_discount();
        let flags = self.policy.exercise_flags(steps, lattice.dt());

        let mut values = Array2::<f64>::zeros((steps + 1, steps + 1));
        for j in 0..=steps {
            values[[steps, j]] = self.payoff.evaluate(lattice.price(steps, j));
        }

        for i in (0..steps).rev() {
            for j in 0..=i {
                let continuation =
                    disc * (p * values[[i + 1, j]] + (1.0 - p) * values[[i + 1, j + 1]]);
                values[[i, j]] = ExercisePolicy::settle(
                    continuation,
                    || self.payoff.evaluate(lattice.price(i, j)),
                    flags[i],
                );
            }
        }

        tracing::debug!(steps, root = values[[0, 0]], "rolled back recombining lattice");
        Ok(ValueLattice { values })
    }

    /// Rolls the payoff back through the non-recombining lattice.
    ///
    /// Every pair `(2k, 2k + 1)` of level `i + 1` collapses into node `k` of
    /// level `i` with equal weights. Path-dependent payoffs see the full
    /// path of each node.
    pub fn roll_back_binary(&self, lattice: &BinaryLattice) -> Result<f64, PricingError> {
        let steps = lattice.steps();
        let disc = lattice.step_discount();
        let flags = self.policy.exercise_flags(steps, lattice.dt());
        let path_dependent = self.payoff.is_path_dependent();

        let intrinsic_level = |i: usize| -> Array1<f64> {
            Array1::from_shape_fn(1 << i, |k| {
                if path_dependent {
                    self.payoff.evaluate_path(&lattice.path(i, k))
                } else {
                    self.payoff.evaluate(lattice.price(i, k))
                }
            })
        };

        // intrinsic values of every exercisable level, computed up front
        let intrinsic: Vec<Option<Array1<f64>>> = (0..steps)
            .map(|i| if flags[i] { Some(intrinsic_level(i)) } else { None })
            .collect();

        let mut values = intrinsic_level(steps);
        for i in (0..steps).rev() {
            let next = &values;
            let exercise = intrinsic[i].as_ref();
            values = Array1::from_shape_fn(1 << i, |k| {
                let continuation = disc * 0.5 * (next[2 * k] + next[2 * k + 1]);
                match exercise {
                    Some(level) => ExercisePolicy::settle(continuation, || level[k], true),
                    None => continuation,
                }
            });
        }

        let root = values[0];
        tracing::debug!(steps, root, "rolled back non-recombining lattice");
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::models::MarketParameters;
    use crate::lattice::exercise::ExerciseSchedule;
    use crate::payoffs::Payoff;
    use assert_approx_eq::assert_approx_eq;

    const TOLERANCE: f64 = 1e-10;

    #[test]
    fn one_step_by_hand() {
        let market = MarketParameters::new(100.0, 0.05, 0.0, 0.2);
        let lattice = RecombiningLattice::build(&market, 1.0, 1, 10).unwrap();
        let put = Payoff::VanillaPut { strike: 100.0 };
        let values = Valuator::new(&put, &ExercisePolicy::European)
            .roll_back(&lattice)
            .unwrap();

        let (u, d, p) = (lattice.up(), lattice.down(), lattice.probability());
        let expected = (-0.05_f64).exp() * (p * 0.0 + (1.0 - p) * (100.0 - 100.0 * d));
        assert_eq!(values.value(1, 0), (100.0 - 100.0 * u).max(0.0));
        assert_approx_eq!(values.root(), expected, TOLERANCE);
    }

    #[test]
    fn american_exercise_dominates() {
        let market = MarketParameters::new(100.0, 0.08, 0.0, 0.2);
        let lattice = RecombiningLattice::build(&market, 1.0, 200, 1000).unwrap();
        let put = Payoff::VanillaPut { strike: 110.0 };

        let european = Valuator::new(&put, &ExercisePolicy::European)
            .roll_back(&lattice)
            .unwrap();
        let american = Valuator::new(&put, &ExercisePolicy::American)
            .roll_back(&lattice)
            .unwrap();

        assert!(american.root() > european.root());
        for i in 0..=200 {
            for j in 0..=i {
                assert!(american.value(i, j) >= put.evaluate(lattice.price(i, j)));
            }
        }
    }

    #[test]
    fn bermudan_at_every_level_is_american() {
        let market = MarketParameters::new(100.0, 0.05, 0.0, 0.25);
        let lattice = RecombiningLattice::build(&market, 1.0, 10, 100).unwrap();
        let put = Payoff::VanillaPut { strike: 105.0 };
        let every_level = ExerciseSchedule::new((0..=10).map(|i| i as f64 / 10.0)).unwrap();

        let bermudan = Valuator::new(&put, &ExercisePolicy::Bermudan(every_level))
            .roll_back(&lattice)
            .unwrap();
        let american = Valuator::new(&put, &ExercisePolicy::American)
            .roll_back(&lattice)
            .unwrap();
        assert_approx_eq!(bermudan.root(), american.root(), TOLERANCE);
    }

    #[test]
    fn rejects_invalid_probability() {
        let market = MarketParameters::new(100.0, 0.5, 0.0, 0.01);
        let lattice = RecombiningLattice::build(&market, 1.0, 1, 10).unwrap();
        let call = Payoff::VanillaCall { strike: 100.0 };
        let result = Valuator::new(&call, &ExercisePolicy::European).roll_back(&lattice);
        assert!(matches!(result, Err(PricingError::InvalidLattice { .. })));
    }

    #[test]
    fn rejects_path_dependent_payoff_on_recombining_lattice() {
        let market = MarketParameters::default();
        let lattice = RecombiningLattice::build(&market, 1.0, 10, 100).unwrap();
        let asian = Payoff::AsianCall { strike: 100.0 };
        let result = Valuator::new(&asian, &ExercisePolicy::European).roll_back(&lattice);
        assert!(matches!(result, Err(PricingError::InvalidParameter(_))));
    }

    #[test]
    fn binary_forward_is_model_free() {
        let market = MarketParameters::new(100.0, 0.05, 0.02, 0.3);
        let lattice = BinaryLattice::build(&market, 1.0, 10, 20).unwrap();
        let forward = Payoff::Forward { strike: 95.0 };
        let value = Valuator::new(&forward, &ExercisePolicy::European)
            .roll_back_binary(&lattice)
            .unwrap();
        let expected = 100.0 * (-0.02_f64).exp() - 95.0 * (-0.05_f64).exp();
        assert_approx_eq!(value, expected, 1e-9);
    }

    #[test]
    fn binary_path_dependent_payoffs() {
        let market = MarketParameters::new(100.0, 0.05, 0.0, 0.3);
        let lattice = BinaryLattice::build(&market, 1.0, 12, 20).unwrap();
        let policy = ExercisePolicy::European;

        let lookback = Valuator::new(&Payoff::LookbackCall, &policy)
            .roll_back_binary(&lattice)
            .unwrap();
        let vanilla = Valuator::new(&Payoff::VanillaCall { strike: 100.0 }, &policy)
            .roll_back_binary(&lattice)
            .unwrap();
        let barrier = Valuator::new(
            &Payoff::UpAndOutCall {
                strike: 100.0,
                barrier: 130.0,
            },
            &policy,
        )
        .roll_back_binary(&lattice)
        .unwrap();

        // the running minimum is never above the spot
        assert!(lookback >= vanilla);
        assert!(barrier > 0.0);
        assert!(barrier < vanilla);
    }
}

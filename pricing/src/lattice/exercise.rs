#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::error::PricingError;

/// Sorted Bermudan decision times, in years from today.
///
/// The last decision time is the expiry of the contract.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExerciseSchedule {
    times: Vec<f64>,
}

impl ExerciseSchedule {
    pub fn new(times: impl IntoIterator<Item = f64>) -> Result<Self, PricingError> {
        let mut times: Vec<f64> = times.into_iter().collect();
        if times.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(PricingError::invalid(
                "decision times must be finite and non-negative",
            ));
        }
        times.sort_by(|a, b| a.total_cmp(b));
        times.dedup();
        match times.last() {
            Some(last) if *last > 0.0 => Ok(Self { times }),
            _ => Err(PricingError::invalid(
                "a bermudan schedule needs a decision time after today",
            )),
        }
    }

    /// Decision times given as trading-day counts.
    pub fn from_trading_days(
        days: impl IntoIterator<Item = f64>,
        trading_days_per_year: f64,
    ) -> Result<Self, PricingError> {
        Self::new(days.into_iter().map(|d| d / trading_days_per_year))
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn horizon(&self) -> f64 {
        self.times.last().cloned().unwrap_or(0.0)
    }

    /// The schedule as seen `elapsed` years later: every date moves closer,
    /// dates already passed drop out.
    pub fn shifted(&self, elapsed: f64) -> Result<Self, PricingError> {
        Self::new(
            self.times
                .iter()
                .map(|t| t - elapsed)
                .filter(|t| *t >= 0.0),
        )
    }

    /// Lattice levels `0..=steps` on which exercise is allowed, with `dt` per level.
    fn decision_levels(&self, steps: usize, dt: f64) -> Vec<bool> {
        let mut flags = vec![false; steps + 1];
        for t in &self.times {
            let level = (t / dt).round() as usize;
            flags[level.min(steps)] = true;
        }
        flags
    }
}

/// When the holder may realize intrinsic value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExercisePolicy {
    /// only at expiry
    European,
    /// at every node
    American,
    /// only on the levels of the decision times
    Bermudan(ExerciseSchedule),
}

impl ExercisePolicy {
    /// One flag per lattice level `0..=steps`, `true` where early exercise is tested.
    ///
    /// The terminal level always holds the payoff, its flag is informational.
    pub fn exercise_flags(&self, steps: usize, dt: f64) -> Vec<bool> {
        match self {
            ExercisePolicy::European => {
                let mut flags = vec![false; steps + 1];
                flags[steps] = true;
                flags
            }
            ExercisePolicy::American => vec![true; steps + 1],
            ExercisePolicy::Bermudan(schedule) => schedule.decision_levels(steps, dt),
        }
    }

    /// Node value from the continuation value; ties stay with continuation.
    #[inline]
    pub fn settle(continuation: f64, intrinsic: impl FnOnce() -> f64, can_exercise: bool) -> f64 {
        if can_exercise {
            let intrinsic = intrinsic();
            if intrinsic > continuation {
                return intrinsic;
            }
        }
        continuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_sorted_and_deduplicated() {
        let schedule = ExerciseSchedule::new(vec![1.0, 0.25, 0.5, 0.25]).unwrap();
        assert_eq!(schedule.times(), &[0.25, 0.5, 1.0]);
        assert_eq!(schedule.horizon(), 1.0);
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn invalid_schedules() {
        assert!(ExerciseSchedule::new(Vec::<f64>::new()).is_err());
        assert!(ExerciseSchedule::new(vec![0.0]).is_err());
        assert!(ExerciseSchedule::new(vec![-0.5, 1.0]).is_err());
        assert!(ExerciseSchedule::new(vec![f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn shifting_drops_passed_dates() {
        let schedule = ExerciseSchedule::new(vec![0.0, 0.5, 1.0]).unwrap();
        let later = schedule.shifted(0.01).unwrap();
        assert_eq!(later.len(), 2);
        assert!((later.horizon() - 0.99).abs() < 1e-12);
        assert!(schedule.shifted(1.0).is_err());
    }

    #[test]
    fn trading_day_schedule() {
        let schedule =
            ExerciseSchedule::from_trading_days(vec![63.0, 126.0, 252.0], 252.0).unwrap();
        assert_eq!(schedule.times(), &[0.25, 0.5, 1.0]);
    }

    #[test]
    fn decision_levels_follow_the_schedule() {
        let schedule = ExerciseSchedule::new(vec![0.25, 0.5, 0.75, 1.0]).unwrap();
        let policy = ExercisePolicy::Bermudan(schedule);
        let flags = policy.exercise_flags(8, 0.125);
        assert_eq!(
            flags,
            vec![false, false, true, false, true, false, true, false, true]
        );

        let flags = ExercisePolicy::European.exercise_flags(3, 0.1);
        assert_eq!(flags, vec![false, false, false, true]);
        let flags = ExercisePolicy::American.exercise_flags(3, 0.1);
        assert_eq!(flags, vec![true; 4]);
    }

    #[test]
    fn ties_stay_with_continuation() {
        assert_eq!(ExercisePolicy::settle(1.0, || 1.0, true), 1.0);
        assert_eq!(ExercisePolicy::settle(1.0, || 2.0, true), 2.0);
        assert_eq!(ExercisePolicy::settle(1.0, || 2.0, false), 1.0);
    }
}

use crate::error::RiskError;
use std::ops::{Add, Div, Mul, Sub};

/// Mimic the key features of a field.
pub trait PseudoField:
    Sized + Copy + Add<Output = Self> + Div<Output = Self> + Mul<Output = Self> + Sub<Output = Self>
{
    fn is_divisible(&self, threshold: Option<Self>) -> bool;
}

#[macro_export]
macro_rules! impl_numeric {
    ($impl_type:ty) => {
        impl PseudoField for $impl_type {
            fn is_divisible(&self, tolerance: Option<Self>) -> bool {
                match tolerance {
                    Some(tol) => self.abs() >= tol,
                    None => self.abs() != 0.0,
                }
            }
        }
    };
}

impl_numeric! { f32 }
impl_numeric! { f64 }

/// `(bumped - base) / bump`, the first-order difference quotient.
/// Use the threshold for the division by the bump.
pub fn forward_difference<Numeric>(
    bumped: Numeric,
    base: Numeric,
    bump: Numeric,
    threshold: Option<Numeric>,
) -> Result<Numeric, RiskError>
where
    Numeric: PseudoField,
{
    if !(bump.is_divisible(threshold)) {
        return Err(RiskError::ZeroDivision);
    }
    Ok((bumped - base) / bump)
}

/// `(up - 2 base + down) / bump^2`, the central second difference.
pub fn central_second_difference<Numeric>(
    up: Numeric,
    base: Numeric,
    down: Numeric,
    bump: Numeric,
    threshold: Option<Numeric>,
) -> Result<Numeric, RiskError>
where
    Numeric: PseudoField,
{
    if !(bump.is_divisible(threshold)) {
        return Err(RiskError::ZeroDivision);
    }
    Ok(((up - base) - (base - down)) / (bump * bump))
}

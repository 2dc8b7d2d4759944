use num::Float;
use num::traits::NumAssign;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Floating point element type accepted by every kernel.
///
/// Implemented for `f32` and `f64`. The stabilizer sentinels are taken from
/// the concrete type, so a double precision run never scans with a
/// single precision bound.
pub trait Scalar:
    Float + NumAssign + Sum + Default + Debug + Display + Send + Sync + 'static
{
    const NAME: &'static str;

    /// Seed for a running maximum.
    #[inline(always)]
    fn stabilizer_max_seed() -> Self {
        -Self::max_value()
    }

    /// Seed for a running minimum.
    #[inline(always)]
    fn stabilizer_min_seed() -> Self {
        Self::max_value()
    }

    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        <Self as num::NumCast>::from(v).unwrap_or_else(Self::nan)
    }

    #[inline(always)]
    fn from_usize(v: usize) -> Self {
        <Self as num::NumCast>::from(v).unwrap_or_else(Self::infinity)
    }
}

impl Scalar for f32 {
    const NAME: &'static str = "f32";
}

impl Scalar for f64 {
    const NAME: &'static str = "f64";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_follow_precision() {
        assert_eq!(<f32 as Scalar>::stabilizer_min_seed(), f32::MAX);
        assert_eq!(<f64 as Scalar>::stabilizer_min_seed(), f64::MAX);
        assert_eq!(<f64 as Scalar>::stabilizer_max_seed(), -f64::MAX);
        // an f64 coordinate beyond f32 range still beats the f64 seed
        assert!(1e300_f64 > <f64 as Scalar>::stabilizer_max_seed());
    }
}

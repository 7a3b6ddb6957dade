//! Normal distribution utilities.

use contur_ad::scalar::Scalar;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Natural log of `sqrt(2π)`.
///
/// `ln(sqrt(2π)) = 0.5*ln(2π)` (precomputed to keep this crate const-friendly).
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// `log N(x | 0, 1) = -x²/2 - ln(sqrt(2π))`, generic over [`Scalar`].
#[inline]
pub fn standard_logpdf<T: Scalar>(x: T) -> T {
    T::from_f64(-0.5) * x * x - T::from_f64(LN_SQRT_2PI)
}

/// Draw `n` independent standard-normal values.
pub fn sample_standard<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| Distribution::<f64>::sample(&StandardNormal, &mut *rng)).collect()
}

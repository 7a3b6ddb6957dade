//! Forward-mode automatic differentiation via dual numbers.
//!
//! A dual number `a + b·ε` with `ε² = 0` carries a value and one directional
//! derivative through every arithmetic operation.

use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// An f64 dual number for forward-mode AD.
///
/// `val` holds the primal value, `dot` holds the derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    /// Primal (function) value.
    pub val: f64,
    /// Tangent (derivative) value.
    pub dot: f64,
}

impl Dual {
    /// Create a constant (derivative = 0).
    #[inline]
    pub fn constant(val: f64) -> Self {
        Self { val, dot: 0.0 }
    }

    /// Create an independent variable (derivative = 1).
    #[inline]
    pub fn var(val: f64) -> Self {
        Self { val, dot: 1.0 }
    }

    /// Natural logarithm: d/dx ln(x) = 1/x.
    #[inline]
    pub fn ln(self) -> Self {
        Self { val: self.val.ln(), dot: self.dot / self.val }
    }
}

impl Add for Dual {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { val: self.val + rhs.val, dot: self.dot + rhs.dot }
    }
}

impl Sub for Dual {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self { val: self.val - rhs.val, dot: self.dot - rhs.dot }
    }
}

impl Mul for Dual {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self { val: self.val * rhs.val, dot: self.dot * rhs.val + self.val * rhs.dot }
    }
}

impl Div for Dual {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self {
            val: self.val / rhs.val,
            dot: (self.dot * rhs.val - self.val * rhs.dot) / (rhs.val * rhs.val),
        }
    }
}

impl Neg for Dual {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self { val: -self.val, dot: -self.dot }
    }
}

impl Sum for Dual {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Dual::constant(0.0), |acc, x| acc + x)
    }
}

impl PartialOrd for Dual {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.val.partial_cmp(&other.val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_has_zero_derivative() {
        let c = Dual::constant(5.0);
        assert_eq!(c.val, 5.0);
        assert_eq!(c.dot, 0.0);
    }

    #[test]
    fn test_var_has_unit_derivative() {
        let x = Dual::var(3.0);
        assert_eq!(x.val, 3.0);
        assert_eq!(x.dot, 1.0);
    }

    #[test]
    fn test_ln_derivative() {
        let y = Dual::var(2.0).ln();
        assert_relative_eq!(y.val, 2.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(y.dot, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quotient_rule() {
        // d/dx (1 / x) = -1/x^2
        let x = Dual::var(2.0);
        let y = Dual::constant(1.0) / x;
        assert_relative_eq!(y.dot, -0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_product_with_constants() {
        // d/dx (3x + 2) = 3
        let y = Dual::var(1.5) * Dual::constant(3.0) + Dual::constant(2.0);
        assert_relative_eq!(y.val, 6.5, epsilon = 1e-12);
        assert_relative_eq!(y.dot, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_poisson_nll() {
        // f(lam) = lam - n*ln(lam), f'(lam) = 1 - n/lam
        let n = Dual::constant(10.0);
        let lam = Dual::var(12.0);
        let nll = lam - n * lam.ln();
        assert_relative_eq!(nll.dot, 1.0 - 10.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_accumulates_tangents() {
        let xs = [Dual::var(1.0), Dual::constant(2.0), Dual::var(3.0)];
        let s: Dual = xs.iter().copied().sum();
        assert_eq!(s.val, 6.0);
        assert_eq!(s.dot, 2.0);
    }
}

//! Forward-mode drivers.
//!
//! Each driver seeds one input at a time with a unit tangent and evaluates the
//! caller's function on [`Dual`] inputs. Cost is one evaluation per input,
//! results are exact to floating-point precision.

use crate::dual::Dual;
use contur_core::Result;

fn seeded(params: &[f64], active: Option<usize>) -> Vec<Dual> {
    params
        .iter()
        .enumerate()
        .map(|(j, &v)| if Some(j) == active { Dual::var(v) } else { Dual::constant(v) })
        .collect()
}

/// Value and gradient of a scalar function `f: R^n -> R`.
pub fn value_and_gradient<F>(params: &[f64], f: F) -> Result<(f64, Vec<f64>)>
where
    F: Fn(&[Dual]) -> Result<Dual>,
{
    if params.is_empty() {
        let out = f(&[])?;
        return Ok((out.val, Vec::new()));
    }

    let mut value = 0.0;
    let mut grad = vec![0.0; params.len()];
    for (i, g) in grad.iter_mut().enumerate() {
        let out = f(&seeded(params, Some(i)))?;
        value = out.val;
        *g = out.dot;
    }
    Ok((value, grad))
}

/// Jacobian of a vector function `f: R^n -> R^m`, as `m` rows of length `n`.
pub fn jacobian<F>(params: &[f64], f: F) -> Result<Vec<Vec<f64>>>
where
    F: Fn(&[Dual]) -> Result<Vec<Dual>>,
{
    let n = params.len();
    let m = f(&seeded(params, None))?.len();
    let mut jac = vec![vec![0.0; n]; m];

    for i in 0..n {
        let out = f(&seeded(params, Some(i)))?;
        for (row, o) in jac.iter_mut().zip(out.iter()) {
            row[i] = o.dot;
        }
    }
    Ok(jac)
}

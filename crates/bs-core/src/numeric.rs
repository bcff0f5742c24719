use crate::BsError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, BsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BsError::NonFinite { what, value: v })
    }
}

/// Check every sample of a series is finite.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), BsError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(BsError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// Arithmetic mean. Returns 0 for an empty slice.
pub fn mean(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<Real>() / values.len() as Real
}

/// Trapezoidal integral of `y` over `x`.
///
/// Returns 0 when fewer than two samples are available.
pub fn trapezoid(y: &[Real], x: &[Real]) -> Result<Real, BsError> {
    if y.len() != x.len() {
        return Err(BsError::LengthMismatch {
            what: "trapezoid abscissa",
            expected: y.len(),
            actual: x.len(),
        });
    }
    if x.len() < 2 {
        return Ok(0.0);
    }

    let area = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum();
    Ok(area)
}

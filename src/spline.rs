use crate::error::SplineError;

// ---------------------------------------------------------------------------
// Second-derivative solver seam
// ---------------------------------------------------------------------------

/// Fills `out` with the second derivatives of `y` against `x`, as needed by
/// a later cubic-spline interpolation. All three slices share one length.
pub trait Deriv2Solver {
    fn deriv2(&self, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<(), SplineError>;
}

impl<F> Deriv2Solver for F
where
    F: Fn(&[f64], &[f64], &mut [f64]) -> Result<(), SplineError>,
{
    fn deriv2(&self, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<(), SplineError> {
        self(x, y, out)
    }
}

/// Natural cubic spline: zero curvature at both end points.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalSpline;

impl Deriv2Solver for NaturalSpline {
    fn deriv2(&self, x: &[f64], y: &[f64], out: &mut [f64]) -> Result<(), SplineError> {
        let n = x.len();
        if y.len() != n || out.len() != n {
            return Err(SplineError::LengthMismatch {
                x: n,
                y: y.len(),
                out: out.len(),
            });
        }
        // NaN compares false, so it is rejected here too.
        if let Some(i) = (1..n).find(|&i| !(x[i] > x[i - 1])) {
            return Err(SplineError::NotIncreasing { index: i });
        }

        out.fill(0.0);
        if n < 3 {
            return Ok(());
        }

        // Forward elimination of the tridiagonal system, then back substitution.
        let mut u = vec![0.0; n];
        for i in 1..n - 1 {
            let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
            let p = sig * out[i - 1] + 2.0;
            out[i] = (sig - 1.0) / p;
            let right = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
            let left = (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
            let slope = right - left;
            u[i] = (6.0 * slope / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
        }
        out[n - 1] = 0.0;
        for k in (0..n - 1).rev() {
            out[k] = out[k] * out[k + 1] + u[k];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_three_point_peak() {
        let mut out = [9.0; 3];
        NaturalSpline.deriv2(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], &mut out).unwrap();
        assert_relative_eq!(out[0], 0.0);
        assert_relative_eq!(out[1], -3.0);
        assert_relative_eq!(out[2], 0.0);
    }

    #[test]
    fn test_linear_data_has_no_curvature() {
        let x = [1.0, 1.5, 3.0, 4.0, 7.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let mut out = [1.0; 5];
        NaturalSpline.deriv2(&x, &y, &mut out).unwrap();
        for v in out {
            assert_relative_eq!(v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_short_input_is_zero() {
        let mut out = [5.0, 5.0];
        NaturalSpline.deriv2(&[0.0, 1.0], &[3.0, 4.0], &mut out).unwrap();
        assert_eq!(out, [0.0, 0.0]);
    }

    #[test]
    fn test_rejects_unordered_abscissa() {
        let mut out = [0.0; 3];
        let err = NaturalSpline
            .deriv2(&[0.0, 2.0, 1.0], &[0.0; 3], &mut out)
            .unwrap_err();
        assert_eq!(err, SplineError::NotIncreasing { index: 2 });
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let mut out = [0.0; 2];
        let err = NaturalSpline.deriv2(&[0.0, 1.0, 2.0], &[0.0; 3], &mut out).unwrap_err();
        assert!(matches!(err, SplineError::LengthMismatch { .. }));
    }
}

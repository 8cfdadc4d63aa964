use crate::error::Result;
use crate::spline::Deriv2Solver;

use super::model::MatrixObject;

/// Fill the derivative buffer of every dependent column against the
/// reference column. Stops at the first solver failure.
///
/// Does nothing on an object allocated without derivatives.
pub fn compute_all(matrix: &mut MatrixObject, solver: &dyn Deriv2Solver) -> Result<()> {
    let rows = matrix.rows.count;
    let Some(buffers) = matrix.buffers.as_mut() else {
        return Ok(());
    };
    let Some(deriv2) = buffers.deriv2.as_mut() else {
        return Ok(());
    };

    let (reference, dependents) = buffers.data.split_at(rows);
    for (y, out) in dependents.chunks(rows).zip(deriv2.chunks_mut(rows)) {
        solver.deriv2(reference, y, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, SplineError};
    use crate::spline::NaturalSpline;

    fn parabola_table() -> MatrixObject {
        let mut m = MatrixObject::allocated(3, 3, 0, 0, true).unwrap();
        for (r, x) in [0.0, 1.0, 2.0].into_iter().enumerate() {
            let r = r as isize;
            m.set(0, r, x);
            m.set(1, r, x * x);
            m.set(2, r, -x);
        }
        m
    }

    #[test]
    fn test_every_dependent_column_is_solved() {
        let mut m = parabola_table();
        compute_all(&mut m, &NaturalSpline).unwrap();
        assert_eq!(m.derivative_column(1), Some(&[0.0, 3.0, 0.0][..]));
        assert_eq!(m.derivative_column(2), Some(&[0.0, 0.0, 0.0][..]));
        assert_eq!(m.derivative_column(0), None);
    }

    #[test]
    fn test_solver_sees_reference_as_abscissa() {
        let mut m = parabola_table();
        let solver = |x: &[f64], y: &[f64], out: &mut [f64]| -> Result<(), SplineError> {
            for ((o, a), b) in out.iter_mut().zip(x).zip(y) {
                *o = a + b;
            }
            Ok(())
        };
        compute_all(&mut m, &solver).unwrap();
        assert_eq!(m.derivative_column(1), Some(&[0.0, 2.0, 6.0][..]));
    }

    #[test]
    fn test_first_failure_is_returned() {
        let mut m = parabola_table();
        let calls = std::cell::Cell::new(0);
        let solver = |_: &[f64], _: &[f64], _: &mut [f64]| -> Result<(), SplineError> {
            calls.set(calls.get() + 1);
            Err(SplineError::NotIncreasing { index: 1 })
        };
        let err = compute_all(&mut m, &solver).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Spline);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_without_derivative_buffer_is_noop() {
        let mut m = MatrixObject::allocated(3, 2, 0, 0, false).unwrap();
        compute_all(&mut m, &NaturalSpline).unwrap();
        assert!(!m.has_derivatives());
    }
}

use crate::error::{MatrixError, Result};

use super::model::{Axis, Buffers, MatrixObject};

// ---------------------------------------------------------------------------
// Buffer allocation, release and copy
// ---------------------------------------------------------------------------

/// Obtain a zero-filled buffer of `len` values without aborting on OOM.
fn zeroed(len: usize, rows: usize, cols: usize) -> Result<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| MatrixError::Allocation { rows, cols })?;
    buf.resize(len, 0.0);
    Ok(buf)
}

impl MatrixObject {
    /// Allocate a `rows x cols` object addressed from `(row_base, col_base)`.
    pub fn allocated(
        rows: usize,
        cols: usize,
        row_base: isize,
        col_base: isize,
        with_derivatives: bool,
    ) -> Result<Self> {
        let mut m = MatrixObject::new();
        m.allocate(rows, cols, row_base, col_base, with_derivatives)?;
        Ok(m)
    }

    /// Release any previous content, then allocate fresh zeroed buffers.
    ///
    /// The derivative buffer covers columns `col_base + 1 ..` only. On
    /// failure the object is left empty.
    pub fn allocate(
        &mut self,
        rows: usize,
        cols: usize,
        row_base: isize,
        col_base: isize,
        with_derivatives: bool,
    ) -> Result<()> {
        self.release();

        if rows == 0 || cols == 0 {
            return Err(MatrixError::Allocation { rows, cols });
        }
        // Every external index `base + i` must fit in an isize.
        let addressable = |base: isize, count: usize| {
            isize::try_from(count).is_ok() && base.checked_add_unsigned(count).is_some()
        };
        if !addressable(row_base, rows) || !addressable(col_base, cols) {
            return Err(MatrixError::Allocation { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(MatrixError::Allocation { rows, cols })?;

        let data = zeroed(len, rows, cols)?;
        let deriv2 = if with_derivatives {
            Some(zeroed(len - rows, rows, cols)?)
        } else {
            None
        };

        self.rows = Axis::new(row_base, rows);
        self.cols = Axis::new(col_base, cols);
        self.buffers = Some(Buffers { data, deriv2 });
        Ok(())
    }

    /// Drop both buffers and reset the axes. Safe to call repeatedly.
    pub fn release(&mut self) {
        *self = MatrixObject::default();
    }

    /// Make `self` an independent copy of `source`, including its
    /// derivatives and base offsets.
    pub fn copy_from(&mut self, source: &MatrixObject) -> Result<()> {
        self.release();

        let Some(src) = source.buffers.as_ref() else {
            return Err(MatrixError::InvalidSource);
        };
        if source.rows.count == 0 || source.cols.count == 0 {
            return Err(MatrixError::InvalidSource);
        }

        self.allocate(
            source.rows.count,
            source.cols.count,
            source.rows.base,
            source.cols.base,
            src.deriv2.is_some(),
        )?;

        if let Some(dst) = self.buffers.as_mut() {
            dst.data.copy_from_slice(&src.data);
            if let (Some(d), Some(s)) = (dst.deriv2.as_mut(), src.deriv2.as_ref()) {
                d.copy_from_slice(s);
            }
        }
        Ok(())
    }

    /// Checked copy into a new object.
    pub fn try_copy(&self) -> Result<MatrixObject> {
        let mut target = MatrixObject::new();
        target.copy_from(self)?;
        Ok(target)
    }
}

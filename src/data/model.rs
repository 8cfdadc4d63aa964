use std::ops::Range;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Axis – (base, count) pair for one dimension
// ---------------------------------------------------------------------------

/// Index range of one matrix dimension: `count` slots starting at `base`.
///
/// External indices run over `base..base + count`; storage is zero-based
/// and every public accessor translates through [`Axis::offset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Axis {
    pub base: isize,
    pub count: usize,
}

impl Axis {
    pub fn new(base: isize, count: usize) -> Self {
        Axis { base, count }
    }

    /// External indices covered by this axis.
    pub fn indices(&self) -> Range<isize> {
        self.base..self.base.saturating_add_unsigned(self.count)
    }

    pub fn contains(&self, index: isize) -> bool {
        self.indices().contains(&index)
    }

    /// Zero-based storage offset of an external index.
    pub fn offset(&self, index: isize) -> Option<usize> {
        if self.contains(index) {
            Some((index - self.base) as usize)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Buffers – data plus its optional second derivatives, owned together
// ---------------------------------------------------------------------------

/// Column-major storage. `data` holds `cols * rows` values; `deriv2`, when
/// present, holds `(cols - 1) * rows` values for columns `1..cols`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Buffers {
    pub(crate) data: Vec<f64>,
    pub(crate) deriv2: Option<Vec<f64>>,
}

// ---------------------------------------------------------------------------
// MatrixObject – the loaded table
// ---------------------------------------------------------------------------

/// A table of `f64` samples addressed as `[column][row]`.
///
/// Column `cols.base` is the reference axis (usually wavelength); the other
/// columns are dependent series. An empty object has zero axes and no
/// buffers; see the `store` module for allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixObject {
    pub(crate) rows: Axis,
    pub(crate) cols: Axis,
    pub(crate) buffers: Option<Buffers>,
}

impl MatrixObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Axis {
        self.rows
    }

    pub fn cols(&self) -> Axis {
        self.cols
    }

    pub fn row_count(&self) -> usize {
        self.rows.count
    }

    pub fn col_count(&self) -> usize {
        self.cols.count
    }

    pub fn row_base(&self) -> isize {
        self.rows.base
    }

    pub fn col_base(&self) -> isize {
        self.cols.base
    }

    /// Whether the object holds no buffers.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_none()
    }

    pub fn has_derivatives(&self) -> bool {
        self.buffers
            .as_ref()
            .is_some_and(|b| b.deriv2.is_some())
    }

    /// One full column of data, or `None` outside the column range.
    pub fn column(&self, col: isize) -> Option<&[f64]> {
        let c = self.cols.offset(col)?;
        let rows = self.rows.count;
        self.buffers
            .as_ref()
            .map(|b| &b.data[c * rows..(c + 1) * rows])
    }

    pub fn column_mut(&mut self, col: isize) -> Option<&mut [f64]> {
        let c = self.cols.offset(col)?;
        let rows = self.rows.count;
        self.buffers
            .as_mut()
            .map(|b| &mut b.data[c * rows..(c + 1) * rows])
    }

    /// The reference column (first column).
    pub fn reference(&self) -> Option<&[f64]> {
        self.column(self.cols.base)
    }

    pub fn get(&self, col: isize, row: isize) -> Option<f64> {
        let r = self.rows.offset(row)?;
        self.column(col).map(|c| c[r])
    }

    /// Store a value; returns `false` if the indices are out of range.
    pub fn set(&mut self, col: isize, row: isize, value: f64) -> bool {
        let Some(r) = self.rows.offset(row) else {
            return false;
        };
        match self.column_mut(col) {
            Some(c) => {
                c[r] = value;
                true
            }
            None => false,
        }
    }

    /// Second derivatives of a dependent column. The reference column has
    /// none, so `col == col_base()` always yields `None`.
    pub fn derivative_column(&self, col: isize) -> Option<&[f64]> {
        let c = self.cols.offset(col)?.checked_sub(1)?;
        let rows = self.rows.count;
        self.buffers
            .as_ref()
            .and_then(|b| b.deriv2.as_ref())
            .map(|d| &d[c * rows..(c + 1) * rows])
    }

    pub fn derivative(&self, col: isize, row: isize) -> Option<f64> {
        let r = self.rows.offset(row)?;
        self.derivative_column(col).map(|d| d[r])
    }

    /// All values of one row, in column order.
    pub fn row(&self, row: isize) -> Option<Vec<f64>> {
        let r = self.rows.offset(row)?;
        let rows = self.rows.count;
        self.buffers
            .as_ref()
            .map(|b| b.data.chunks(rows).map(|c| c[r]).collect())
    }

    /// Flip the row order of every column in place.
    pub(crate) fn reverse_rows(&mut self) {
        let rows = self.rows.count;
        if let Some(b) = self.buffers.as_mut() {
            for column in b.data.chunks_mut(rows) {
                column.reverse();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MatrixExport – serializable snapshot
// ---------------------------------------------------------------------------

/// Owned, serializable view of a [`MatrixObject`] for export.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixExport {
    pub rows: Axis,
    pub cols: Axis,
    /// `columns[j]` is external column `cols.base + j`.
    pub columns: Vec<Vec<f64>>,
    /// `deriv2[j]` is external column `cols.base + 1 + j`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deriv2: Option<Vec<Vec<f64>>>,
}

impl From<&MatrixObject> for MatrixExport {
    fn from(m: &MatrixObject) -> Self {
        let columns = m
            .cols
            .indices()
            .filter_map(|c| m.column(c).map(<[f64]>::to_vec))
            .collect();
        let deriv2 = m.has_derivatives().then(|| {
            m.cols
                .indices()
                .skip(1)
                .filter_map(|c| m.derivative_column(c).map(<[f64]>::to_vec))
                .collect()
        });
        MatrixExport {
            rows: m.rows,
            cols: m.cols,
            columns,
            deriv2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_offsets() {
        let axis = Axis::new(-2, 3);
        assert_eq!(axis.offset(-3), None);
        assert_eq!(axis.offset(-2), Some(0));
        assert_eq!(axis.offset(0), Some(2));
        assert_eq!(axis.offset(1), None);
        assert_eq!(axis.indices().collect::<Vec<_>>(), vec![-2, -1, 0]);
    }

    #[test]
    fn test_empty_object_has_nothing() {
        let m = MatrixObject::new();
        assert!(m.is_empty());
        assert!(!m.has_derivatives());
        assert_eq!(m.column(0), None);
        assert_eq!(m.get(0, 0), None);
    }
}

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Range filter on the reference column
// ---------------------------------------------------------------------------

/// Inclusive interval a row's reference value must fall in to be kept.
///
/// A degenerate interval (`low == high`) means "no filter": every row is
/// accepted, including one whose value equals neither bound. Callers
/// wanting an exact-match filter must widen the interval themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct RangeFilter {
    low: f64,
    high: f64,
}

impl RangeFilter {
    /// Build a filter from two bounds given in either order.
    pub fn new(a: f64, b: f64) -> Self {
        RangeFilter {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// The filter that accepts everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn is_unbounded(&self) -> bool {
        self.low == self.high
    }

    pub fn accepts(&self, value: f64) -> bool {
        self.is_unbounded() || (value >= self.low && value <= self.high)
    }
}

impl From<(f64, f64)> for RangeFilter {
    fn from((a, b): (f64, f64)) -> Self {
        RangeFilter::new(a, b)
    }
}

impl From<RangeFilter> for (f64, f64) {
    fn from(f: RangeFilter) -> Self {
        (f.low, f.high)
    }
}

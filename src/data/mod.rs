/// Data layer: matrix storage, table parsing and derivative precomputation.
///
/// Architecture:
/// ```text
///   text table (.xs / .dat)
///        │
///        ▼
///   ┌──────────┐   scanner: comment/filler-aware line cursor
///   │  loader   │   pass 1 → dimensions, pass 2 → values
///   └──────────┘   filter:  range test on the reference column
///        │
///        ▼
///   ┌──────────────┐
///   │ MatrixObject  │  data[col][row] + optional deriv2, (base, count) axes
///   └──────────────┘  store: allocate / release / copy
///        │
///        ▼
///   ┌──────────┐
///   │  deriv2   │  spline second derivatives per dependent column
///   └──────────┘
/// ```

pub mod deriv2;
pub mod filter;
pub mod loader;
pub mod model;
mod scanner;
pub mod store;

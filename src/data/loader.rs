use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticSink, LoadEvent};
use crate::error::{MatrixError, Result};
use crate::resolve::{DirectResolver, PathResolver};
use crate::spline::{Deriv2Solver, NaturalSpline};

use super::deriv2;
use super::filter::RangeFilter;
use super::model::MatrixObject;
use super::scanner::TableCursor;

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// What to load and how.
///
/// `min_rows` and `min_cols` double as the dimension hint: when either is
/// zero the dimensions are scanned from the source and then checked against
/// both minimums; when both are set they are the exact dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub min_rows: usize,
    pub min_cols: usize,
    pub range: RangeFilter,
    /// Precompute spline second derivatives of the dependent columns.
    pub derivatives: bool,
    /// Flip the rows when the reference column is descending.
    pub reverse: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_rows(mut self, rows: usize) -> Self {
        self.min_rows = rows;
        self
    }

    pub fn min_cols(mut self, cols: usize) -> Self {
        self.min_cols = cols;
        self
    }

    pub fn range(mut self, low: f64, high: f64) -> Self {
        self.range = RangeFilter::new(low, high);
        self
    }

    pub fn derivatives(mut self, on: bool) -> Self {
        self.derivatives = on;
        self
    }

    pub fn reverse(mut self, on: bool) -> Self {
        self.reverse = on;
        self
    }

    fn infers_dimensions(&self) -> bool {
        self.min_rows == 0 || self.min_cols == 0
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a matrix from a file path with the default loader.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<MatrixObject> {
    let mut matrix = MatrixObject::new();
    MatrixLoader::new().load_path(path, &mut matrix, options)?;
    Ok(matrix)
}

/// Load a matrix from any rewindable text source.
pub fn load_reader<R: BufRead + Seek>(
    reader: R,
    origin: &str,
    options: &LoadOptions,
) -> Result<MatrixObject> {
    let mut matrix = MatrixObject::new();
    MatrixLoader::new().load_reader(reader, origin, &mut matrix, options)?;
    Ok(matrix)
}

// ---------------------------------------------------------------------------
// MatrixLoader
// ---------------------------------------------------------------------------

/// Loads text tables into [`MatrixObject`]s.
///
/// The collaborators are pluggable: a [`PathResolver`] turns source
/// identifiers into paths, a [`Deriv2Solver`] computes second derivatives,
/// and an optional [`DiagnosticSink`] observes each load.
pub struct MatrixLoader<'a> {
    resolver: Box<dyn PathResolver>,
    solver: Box<dyn Deriv2Solver>,
    sink: Option<&'a dyn DiagnosticSink>,
}

impl Default for MatrixLoader<'_> {
    fn default() -> Self {
        MatrixLoader {
            resolver: Box::new(DirectResolver),
            solver: Box::new(NaturalSpline),
            sink: None,
        }
    }
}

impl<'a> MatrixLoader<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_solver(mut self, solver: impl Deriv2Solver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Resolve `source_id`, open it and load it into `target`.
    ///
    /// `target` is released first and stays empty on any failure. The file
    /// is closed on every exit path.
    pub fn load(
        &self,
        source_id: &str,
        target: &mut MatrixObject,
        options: &LoadOptions,
    ) -> Result<()> {
        let path = self.resolver.resolve(source_id);
        self.load_path(&path, target, options)
    }

    /// Open an already resolved path and load it into `target`.
    ///
    /// Anything that is not a readable regular file is `SourceNotFound`.
    pub fn load_path(
        &self,
        path: &Path,
        target: &mut MatrixObject,
        options: &LoadOptions,
    ) -> Result<()> {
        target.release();

        let not_found = |source: io::Error| MatrixError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(not_found)?;
        let metadata = file.metadata().map_err(not_found)?;
        if !metadata.is_file() {
            return Err(not_found(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        self.load_reader(BufReader::new(file), &path.display().to_string(), target, options)
    }

    /// Load from an already open source. `origin` names it in errors.
    pub fn load_reader<R: BufRead + Seek>(
        &self,
        reader: R,
        origin: &str,
        target: &mut MatrixObject,
        options: &LoadOptions,
    ) -> Result<()> {
        target.release();
        self.emit(LoadEvent::Opened {
            origin: origin.to_string(),
        });

        let mut cursor = TableCursor::new(reader);
        let result = self.parse(&mut cursor, origin, target, options);
        if let Err(e) = &result {
            log::debug!("{origin}: load failed: {e}");
            target.release();
        }
        result
    }

    fn emit(&self, event: LoadEvent) {
        if let Some(sink) = self.sink {
            sink.record(&event);
        }
    }

    fn parse<R: BufRead + Seek>(
        &self,
        cursor: &mut TableCursor<R>,
        origin: &str,
        target: &mut MatrixObject,
        options: &LoadOptions,
    ) -> Result<()> {
        let read_failed = |source: io::Error| MatrixError::Io {
            origin: origin.to_string(),
            source,
        };
        let file_empty = || MatrixError::FileEmpty {
            origin: origin.to_string(),
        };

        if cursor.source_len().map_err(read_failed)? == 0 {
            return Err(file_empty());
        }

        // -- Pass 1: dimensions --

        let inferred = options.infers_dimensions();
        let (rows, cols) = if inferred {
            scan_dimensions(cursor, &options.range).map_err(read_failed)?
        } else {
            (options.min_rows, options.min_cols)
        };
        log::debug!("{origin}: {rows} x {cols} matrix (inferred: {inferred})");

        if rows == 0 || cols == 0 || rows < options.min_rows || cols < options.min_cols {
            return Err(file_empty());
        }
        self.emit(LoadEvent::Dimensions { rows, cols, inferred });

        // -- Pass 2: values --

        cursor.rewind().map_err(read_failed)?;
        target.allocate(rows, cols, 0, 0, options.derivatives)?;
        self.fill(cursor, origin, target, &options.range)?;

        let descending = target
            .reference()
            .is_some_and(|x| x.len() >= 2 && x[0] > x[1]);
        if options.reverse && descending {
            target.reverse_rows();
            self.emit(LoadEvent::Reversed);
        }

        if options.derivatives {
            deriv2::compute_all(target, &*self.solver)?;
        }

        self.emit(LoadEvent::Loaded {
            rows,
            cols,
            derivatives: options.derivatives,
        });
        Ok(())
    }

    /// Read `rows` accepted rows of exactly `cols` values into `target`.
    fn fill<R: BufRead + Seek>(
        &self,
        cursor: &mut TableCursor<R>,
        origin: &str,
        target: &mut MatrixObject,
        range: &RangeFilter,
    ) -> Result<()> {
        let rows = target.row_count();
        let cols = target.col_count();
        let Some(buffers) = target.buffers.as_mut() else {
            return Err(MatrixError::Allocation { rows, cols });
        };
        let data = &mut buffers.data;
        let bad_row = |line: usize| MatrixError::BadRowLength {
            origin: origin.to_string(),
            line,
        };

        let mut row = 0;
        while row < rows {
            let next = cursor.next_data_line().map_err(|source| MatrixError::Io {
                origin: origin.to_string(),
                source,
            })?;
            let Some(mut line) = next else {
                break;
            };
            let line_no = line.line_no();

            let x = line.first_value().ok_or_else(|| bad_row(line_no))?;
            if !range.accepts(x) {
                self.emit(LoadEvent::RowRejected { line: line_no, value: x });
                continue;
            }

            data[row] = x;
            for col in 1..cols {
                data[col * rows + row] = line.next_value().ok_or_else(|| bad_row(line_no))?;
            }
            if !line.at_end() {
                return Err(bad_row(line_no));
            }
            row += 1;
        }

        if row == 0 {
            return Err(MatrixError::RangeEmpty {
                origin: origin.to_string(),
                low: range.low(),
                high: range.high(),
            });
        }
        if row < rows {
            // Source ended before the pinned row count was reached.
            return Err(bad_row(cursor.line_no() + 1));
        }
        Ok(())
    }
}

/// First pass: column count from the first data line, row count from the
/// leading value of every data line that passes `range`. Counting stops at
/// the first line that does not start with a number.
fn scan_dimensions<R: BufRead + Seek>(
    cursor: &mut TableCursor<R>,
    range: &RangeFilter,
) -> io::Result<(usize, usize)> {
    let Some(mut line) = cursor.next_data_line()? else {
        return Ok((0, 0));
    };
    let Some(first) = line.first_value() else {
        return Ok((0, 0));
    };

    let mut rows = usize::from(range.accepts(first));
    let mut cols = 1;
    while line.next_value().is_some() {
        cols += 1;
    }

    while let Some(mut line) = cursor.next_data_line()? {
        match line.first_value() {
            Some(x) if range.accepts(x) => rows += 1,
            Some(_) => {}
            None => break,
        }
    }
    Ok((rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    fn load_str(text: &str, options: &LoadOptions) -> Result<MatrixObject> {
        load_reader(Cursor::new(text.as_bytes()), "test", options)
    }

    #[test]
    fn test_scan_dimensions_counts_in_range_rows() {
        let text = "# c\n1 10 100\n2 20 200\n; c\n3 30 300\n";
        let mut cursor = TableCursor::new(Cursor::new(text.as_bytes()));
        assert_eq!(scan_dimensions(&mut cursor, &RangeFilter::all()).unwrap(), (3, 3));
        cursor.rewind().unwrap();
        let range = RangeFilter::new(1.5, 9.0);
        assert_eq!(scan_dimensions(&mut cursor, &range).unwrap(), (2, 3));
    }

    #[test]
    fn test_scan_stops_at_text_line() {
        let text = "1 2\n2 3\nend of table\n3 4\n";
        let mut cursor = TableCursor::new(Cursor::new(text.as_bytes()));
        assert_eq!(scan_dimensions(&mut cursor, &RangeFilter::all()).unwrap(), (2, 2));
    }

    #[test]
    fn test_empty_source_is_file_empty() {
        let err = load_str("", &LoadOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileEmpty);
        let err = load_str("; only a comment\n", &LoadOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileEmpty);
    }

    #[test]
    fn test_out_of_range_line_is_discarded_whole() {
        let text = "1 5\n2 6\n3 7\n";
        let m = load_str(text, &LoadOptions::new().range(2.0, 3.0)).unwrap();
        assert_eq!(m.column(0), Some(&[2.0, 3.0][..]));
        assert_eq!(m.column(1), Some(&[6.0, 7.0][..]));
    }

    #[test]
    fn test_extra_value_is_bad_row_length() {
        let err = load_str("1 2\n3 4 5\n", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, MatrixError::BadRowLength { line: 2, .. }));
    }

    #[test]
    fn test_pinned_dimensions_past_end_of_source() {
        let err = load_str("1 2\n3 4\n", &LoadOptions::new().min_rows(3).min_cols(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRowLength);
    }

    #[test]
    fn test_single_row_is_never_reversed() {
        let m = load_str("5 1\n", &LoadOptions::new().reverse(true)).unwrap();
        assert_eq!(m.row(0), Some(vec![5.0, 1.0]));
    }

    #[test]
    fn test_sink_sees_the_load() {
        let sink = RecordingSink::default();
        let loader = MatrixLoader::new().with_sink(&sink);
        let mut m = MatrixObject::new();
        let options = LoadOptions::new().range(1.0, 2.0).reverse(true);
        loader
            .load_reader(Cursor::new(&b"3 0\n2 1\n1 2\n"[..]), "mem", &mut m, &options)
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![
                LoadEvent::Opened { origin: "mem".into() },
                LoadEvent::Dimensions { rows: 2, cols: 2, inferred: true },
                LoadEvent::RowRejected { line: 1, value: 3.0 },
                LoadEvent::Reversed,
                LoadEvent::Loaded { rows: 2, cols: 2, derivatives: false },
            ]
        );
    }

    #[test]
    fn test_options_from_json() {
        let options: LoadOptions =
            serde_json::from_str(r#"{ "range": [500.0, 300.0], "derivatives": true }"#).unwrap();
        assert_eq!(options, LoadOptions::new().range(300.0, 500.0).derivatives(true));
    }
}

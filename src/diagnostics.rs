use std::cell::RefCell;

// ---------------------------------------------------------------------------
// Load events and the sink that receives them
// ---------------------------------------------------------------------------

/// Progress of a single load, reported to an optional [`DiagnosticSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Opened { origin: String },
    /// Final dimensions; `inferred` is false when the caller pinned them.
    Dimensions { rows: usize, cols: usize, inferred: bool },
    /// A data line whose reference value fell outside the range.
    RowRejected { line: usize, value: f64 },
    Reversed,
    Loaded { rows: usize, cols: usize, derivatives: bool },
}

pub trait DiagnosticSink {
    fn record(&self, event: &LoadEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, event: &LoadEvent) {
        match event {
            LoadEvent::RowRejected { line, value } => {
                log::trace!("line {line}: {value} outside range")
            }
            LoadEvent::Loaded { rows, cols, derivatives } => {
                log::debug!("loaded {rows} x {cols} matrix (deriv2: {derivatives})")
            }
            other => log::debug!("{other:?}"),
        }
    }
}

/// Keeps every event, mostly for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<LoadEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<LoadEvent> {
        self.events.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &LoadEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

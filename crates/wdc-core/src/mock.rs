//! Recording host and sink implementations for tests.
//!
//! Available to downstream crates through the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! wdc-core = { version = "...", features = ["test-utils"] }
//! ```

use std::sync::Mutex;

use crate::host::{ConnectorHost, RowSink};
use crate::mapping::FlatRow;

/// A host that records every outbound call for later assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Messages passed to `log`.
    pub logs: Mutex<Vec<String>>,
    /// Messages passed to `report_progress`.
    pub progress: Mutex<Vec<String>>,
    /// Messages passed to `abort_with_error`.
    pub aborts: Mutex<Vec<String>>,
    /// Messages passed to `abort_for_auth`.
    pub auth_aborts: Mutex<Vec<String>>,
    /// Number of `submit` calls.
    pub submits: Mutex<usize>,
}

impl RecordingHost {
    /// Creates an empty recording host.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectorHost for RecordingHost {
    fn log(&self, message: &str) {
        self.logs.lock().expect("host lock").push(message.to_owned());
    }

    fn report_progress(&self, message: &str) {
        self.progress
            .lock()
            .expect("host lock")
            .push(message.to_owned());
    }

    fn abort_with_error(&self, message: &str) {
        self.aborts
            .lock()
            .expect("host lock")
            .push(message.to_owned());
    }

    fn abort_for_auth(&self, message: &str) {
        self.auth_aborts
            .lock()
            .expect("host lock")
            .push(message.to_owned());
    }

    fn submit(&self) {
        *self.submits.lock().expect("host lock") += 1;
    }
}

/// A sink that keeps every delivered batch.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Batches in delivery order.
    pub batches: Vec<Vec<FlatRow>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows across batches, flattened in delivery order.
    pub fn rows(&self) -> Vec<&FlatRow> {
        self.batches.iter().flatten().collect()
    }
}

impl RowSink for RecordingSink {
    fn append_rows(&mut self, rows: Vec<FlatRow>) {
        self.batches.push(rows);
    }
}

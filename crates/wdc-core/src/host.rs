//! The host plugin contract as injectable traits.
//!
//! The hosting runtime (Tableau or a simulator) owns the real implementations
//! of these callbacks. The connector core only ever talks to the host through
//! these traits, which is the seam that keeps the mapping and fetch logic
//! testable without a browser runtime.

use crate::mapping::FlatRow;

/// Outbound calls the host exposes to the connector.
pub trait ConnectorHost: Send + Sync {
    /// Writes a developer-facing log line to the host.
    fn log(&self, message: &str);

    /// Reports human-readable gather progress. Advisory only.
    fn report_progress(&self, message: &str);

    /// Aborts the current phase with a user-facing error message.
    fn abort_with_error(&self, message: &str);

    /// Aborts the current phase asking the host to re-run authentication.
    fn abort_for_auth(&self, message: &str);

    /// Signals the host that the current phase is complete.
    fn submit(&self);
}

/// Receives flattened row batches during a table gather.
///
/// Batches arrive in retrieval order and are never redelivered; callers must
/// not retain them beyond the call.
pub trait RowSink: Send {
    /// Appends one batch of rows for the current table.
    fn append_rows(&mut self, rows: Vec<FlatRow>);
}

impl<F> RowSink for F
where
    F: FnMut(Vec<FlatRow>) + Send,
{
    fn append_rows(&mut self, rows: Vec<FlatRow>) {
        self(rows);
    }
}

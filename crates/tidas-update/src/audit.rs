//! Audit trail of assumptions made while updating datasets.
//!
//! Notes are meant for a human reviewer: placeholders inserted, values replaced,
//! invalid data removed. They carry no level; diagnostic logging goes through
//! `tracing` instead.

use tracing::debug;

/// Append-only sink for audit notes.
pub trait AuditSink {
    fn record(&mut self, message: String);
}

impl AuditSink for Vec<String> {
    fn record(&mut self, message: String) {
        self.push(message);
    }
}

/// Records a note and mirrors it to the diagnostic log.
pub(crate) fn note(sink: &mut dyn AuditSink, message: String) {
    debug!(target: "tidas_update::audit", "{message}");
    sink.record(message);
}

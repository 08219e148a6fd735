//! Audit trail for mutating operations.

use std::sync::Mutex;

use tracing::info;

/// Actor category attached to every audit entry written by this service.
pub const AUDIT_CATEGORY: &str = "administrator";

/// Sink accepting one free-text message per successful mutation.
pub trait AuditLog: Send + Sync {
    fn record(&self, message: &str);
}

/// Writes audit entries as tracing events on the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, message: &str) {
        info!(target: "audit", category = AUDIT_CATEGORY, "{}", message);
    }
}

/// Keeps entries in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct RecordingAuditLog {
    entries: Mutex<Vec<String>>,
}

impl RecordingAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl AuditLog for RecordingAuditLog {
    fn record(&self, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(message.to_owned());
        }
    }
}

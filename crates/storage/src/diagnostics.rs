/// Receives anomalies the store recovers from instead of failing.
pub trait Diagnostics: Send + Sync {
    fn discarded_slot(&self, key: &str, reason: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn discarded_slot(&self, key: &str, reason: &str) {
        tracing::warn!(slot = key, reason, "discarding unreadable persisted records");
    }
}

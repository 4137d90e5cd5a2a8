use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::types::RawObservation;

/// Default bound on a single scan invocation
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ScanError {
    /// No scanning tool or no wireless interface on this machine
    #[error("wireless scanning unavailable: {0}")]
    Unavailable(String),

    #[error("scan did not finish within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("`{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("unreadable scan output: {0}")]
    InvalidOutput(String),
}

/// Capability that produces one snapshot of nearby networks per call.
///
/// An empty vector means "nothing seen"; errors mean the snapshot could not
/// be taken at all.
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Backend identifier for logging
    fn name(&self) -> &'static str;

    /// Take one snapshot, giving up after `timeout`
    async fn scan(&self, timeout: Duration) -> Result<Vec<RawObservation>, ScanError>;
}

//! Diagnostic channel for load failures.

use std::io::{self, Write};
use std::path::Path;

/// Receives a best-effort notice of the failing physical path before a
/// load failure propagates. Not part of the functional contract.
///
/// Implementations must not panic; a diagnostic that fails is dropped.
pub trait DiagSink: Send + Sync {
    fn load_failure(&self, path: &Path, message: &str);
}

/// Default sink: one line to stderr, write errors ignored.
pub struct StderrSink;

impl DiagSink for StderrSink {
    fn load_failure(&self, path: &Path, message: &str) {
        let stderr = io::stderr();
        let _ = writeln!(
            stderr.lock(),
            "sable: failed to load module from {}: {}",
            path.display(),
            message
        );
    }
}

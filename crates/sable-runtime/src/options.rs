//! Runtime configuration.

use std::path::PathBuf;

/// Options controlling module resolution.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Directory qualified names resolve under.
    pub root: PathBuf,

    /// Probe `.sbo`/`.sbc` compiled-unit candidates in addition to
    /// plain source.
    pub probe_compiled: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            probe_compiled: true,
        }
    }
}

impl RuntimeOptions {
    /// Options resolving under `root`, everything else defaulted.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

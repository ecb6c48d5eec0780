//! Module resolution.
//!
//! Handles deciding whether a qualified name can be supplied from the
//! filesystem. Resolution is the claim/pass half of the two-operation
//! resolver contract; the load half lives in [`crate::loader`].

use std::path::PathBuf;
use std::sync::Arc;

use sable_engine::Module;

use crate::error::LoadError;
use crate::name::ModuleName;
use crate::runtime::Runtime;

/// Plain-source extension.
pub const SOURCE_EXT: &str = "sb";
/// Pre-compiled unit extension.
pub const COMPILED_EXT: &str = "sbc";
/// Pre-compiled, optimized unit extension.
pub const OPTIMIZED_EXT: &str = "sbo";
/// Initializer file probed inside a package directory.
pub const PACKAGE_INIT: &str = "index.sb";

/// Loader tag recorded on modules produced by [`PathResolver`].
pub const PATH_LOADER: &str = "sable.path";

/// Outcome of asking a resolver about a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// This resolver will load the name
    Claimed,
    /// Defer to the next resolver in the chain
    Pass,
}

/// The two-operation resolver/loader contract.
///
/// There is exactly one production implementation ([`PathResolver`]),
/// but the seam stays swappable so alternate resolvers can be chained
/// in tests or by embedders.
pub trait Resolver: Send + Sync {
    /// Decide whether this resolver can supply `name`. No side effects;
    /// absence of a module is never an error here.
    fn find(&self, name: &ModuleName) -> Claim;

    /// Produce the module for a name this resolver claimed.
    fn load(&self, name: &ModuleName, rt: &Runtime) -> Result<Arc<Module>, LoadError>;
}

/// Path-based resolver.
///
/// Maps a qualified name to `<root>/<a>/<b>/<c>` and claims it when that
/// path is a package directory or carries one of the known extensions.
/// All path handling goes through [`PathBuf`], so roots containing
/// characters outside any legacy narrow encoding resolve like any other.
#[derive(Debug, Clone)]
pub struct PathResolver {
    pub(crate) root: PathBuf,
    pub(crate) probe_compiled: bool,
}

impl PathResolver {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            probe_compiled: true,
        }
    }

    /// Control whether `.sbo`/`.sbc` candidates are probed.
    pub fn with_compiled_probes(mut self, probe: bool) -> Self {
        self.probe_compiled = probe;
        self
    }

    /// The extensionless candidate path for a name.
    pub(crate) fn base_path(&self, name: &ModuleName) -> PathBuf {
        self.root.join(name.to_rel_path())
    }

    /// Extension candidates in claim-priority order.
    pub(crate) fn extensions(&self) -> &'static [&'static str] {
        if self.probe_compiled {
            &[OPTIMIZED_EXT, COMPILED_EXT, SOURCE_EXT]
        } else {
            &[SOURCE_EXT]
        }
    }
}

impl Resolver for PathResolver {
    fn find(&self, name: &ModuleName) -> Claim {
        let base = self.base_path(name);
        // Directory candidate first, then extensions in priority order
        if base.is_dir() {
            return Claim::Claimed;
        }
        for ext in self.extensions() {
            if base.with_extension(ext).is_file() {
                return Claim::Claimed;
            }
        }
        Claim::Pass
    }

    fn load(&self, name: &ModuleName, rt: &Runtime) -> Result<Arc<Module>, LoadError> {
        crate::loader::load(self, name, rt)
    }
}

//! Sable runtime: path-safe module resolution and loading.
//!
//! Qualified names (`pkg.sub`) are resolved to files and directories
//! under a configured root using text-safe [`std::path::PathBuf`]
//! handling throughout, so a host installed under a path that cannot be
//! represented in a legacy narrow encoding starts like any other. The
//! [`Runtime`] owns the module registry (cache and recursion guard) and
//! a chain of [`Resolver`]s; [`install`] wires one runtime into
//! process-wide state at startup.
//!
//! # Example
//!
//! ```rust,ignore
//! use sable_runtime::{Runtime, RuntimeOptions};
//!
//! let rt = Runtime::new(RuntimeOptions::with_root("/opt/app/scripts"));
//! let module = rt.import("pkg.sub")?;
//! ```

use once_cell::sync::OnceCell;

mod bundle;
mod diag;
mod error;
mod loader;
mod name;
mod options;
mod registry;
mod resolver;
mod runtime;

pub use bundle::{file_is_bundled, is_bundled, TRAILER_MAGIC};
pub use diag::{DiagSink, StderrSink};
pub use error::{LoadCause, LoadError};
pub use name::{InvalidName, ModuleName};
pub use options::RuntimeOptions;
pub use registry::ModuleRegistry;
pub use resolver::{
    Claim, PathResolver, Resolver, COMPILED_EXT, OPTIMIZED_EXT, PACKAGE_INIT, PATH_LOADER,
    SOURCE_EXT,
};
pub use runtime::Runtime;

// The engine types that appear in this crate's API
pub use sable_engine::{Module, Namespace, Value};

static GLOBAL: OnceCell<Runtime> = OnceCell::new();

/// Install the path-safe resolver chain process-wide.
///
/// One-time and irreversible: the first call constructs the runtime and
/// every later call returns that same instance, ignoring its options.
/// There is no uninstall. Returns `None` without installing anything
/// when the process runs from a pre-bundled executable, which has all
/// module paths embedded at bundle time and standard resolution already
/// works.
///
/// Must run before the first application-level import.
pub fn install(options: RuntimeOptions) -> Option<&'static Runtime> {
    if bundle::is_bundled() {
        return None;
    }
    Some(GLOBAL.get_or_init(|| Runtime::new(options)))
}

/// The installed runtime, if [`install`] has run.
pub fn global() -> Option<&'static Runtime> {
    GLOBAL.get()
}

//! The module object.
//!
//! A module is a shared namespace with identity attributes: its qualified
//! name, a synthetic file path, a search path (packages only), and a tag
//! naming the loader that produced it. The loader registers modules
//! *before* executing their bodies, so a module participating in an
//! import cycle is observed partially initialized but identity-stable;
//! every accessor takes `&self` and no lock is held across a re-entrant
//! import.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// A module namespace: name → value.
pub type Namespace = FxHashMap<String, Value>;

/// A loaded (or loading) module.
pub struct Module {
    name: String,
    file: RwLock<Option<PathBuf>>,
    search_path: RwLock<Vec<PathBuf>>,
    loaded_by: RwLock<Option<&'static str>>,
    namespace: RwLock<Namespace>,
}

impl Module {
    /// Create an empty module with the given qualified name.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            file: RwLock::new(None),
            search_path: RwLock::new(Vec::new()),
            loaded_by: RwLock::new(None),
            namespace: RwLock::new(Namespace::default()),
        })
    }

    /// The qualified name this module was loaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The synthetic file path: the source file for file modules, the
    /// directory for packages. `None` until the loader populates it.
    pub fn file(&self) -> Option<PathBuf> {
        self.file.read().clone()
    }

    pub fn set_file(&self, path: impl Into<PathBuf>) {
        *self.file.write() = Some(path.into());
    }

    /// Search path for resolving the package's own children. Empty for
    /// file modules, a one-element list for packages.
    pub fn search_path(&self) -> Vec<PathBuf> {
        self.search_path.read().clone()
    }

    pub fn set_search_path(&self, dirs: Vec<PathBuf>) {
        *self.search_path.write() = dirs;
    }

    /// Tag of the loader that produced this module.
    pub fn loaded_by(&self) -> Option<&'static str> {
        *self.loaded_by.read()
    }

    pub fn set_loaded_by(&self, tag: &'static str) {
        *self.loaded_by.write() = Some(tag);
    }

    /// Look up a name in the namespace.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.namespace.read().get(name).cloned()
    }

    /// Bind a name in the namespace.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.namespace.write().insert(name.into(), value);
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.namespace.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespace.read().is_empty()
    }

    /// Snapshot of the bound names, sorted.
    pub fn attr_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespace.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("file", &*self.file.read())
            .field("bindings", &self.namespace.read().len())
            .finish()
    }
}

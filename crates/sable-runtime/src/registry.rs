//! The module registry.
//!
//! Process-wide name → module cache, and the loader's recursion guard:
//! placeholders are registered *before* a module body runs, so cyclic
//! imports observe an identity-stable, partially-initialized module
//! instead of recursing. The registry is an owned service object:
//! tests construct isolated instances; the process-wide one is owned by
//! the [`crate::Runtime`] built at installation.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use sable_engine::Module;

use crate::name::ModuleName;

/// Name → module cache with atomic check-and-insert.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Mutex<FxHashMap<ModuleName, Arc<Module>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a registered module.
    pub fn get(&self, name: &ModuleName) -> Option<Arc<Module>> {
        self.modules.lock().get(name).cloned()
    }

    /// Return the module registered under `name`, inserting an empty
    /// placeholder if absent. The check and the insert happen under one
    /// lock, so a second thread requesting an in-flight name receives
    /// the same placeholder rather than starting a duplicate load.
    ///
    /// The boolean is `true` when this call inserted the placeholder.
    pub fn get_or_insert(&self, name: &ModuleName) -> (Arc<Module>, bool) {
        let mut modules = self.modules.lock();
        match modules.entry(name.clone()) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                let module = Module::new(name.as_dotted());
                entry.insert(module.clone());
                (module, true)
            }
        }
    }

    /// Remove a registered module. Used to evict the speculative
    /// placeholder when a load fails.
    pub fn remove(&self, name: &ModuleName) -> Option<Arc<Module>> {
        self.modules.lock().remove(name)
    }

    pub fn contains(&self, name: &ModuleName) -> bool {
        self.modules.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.lock().is_empty()
    }

    /// Snapshot of the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.lock().keys().map(|n| n.as_dotted()).collect();
        names.sort();
        names
    }
}

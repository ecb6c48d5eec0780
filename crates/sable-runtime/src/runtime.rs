//! The runtime: resolver chain, registry, and import semantics.

use std::sync::Arc;

use sable_engine::{ImportHook, ImportHookError, Module, Value};

use crate::diag::{DiagSink, StderrSink};
use crate::error::LoadError;
use crate::name::ModuleName;
use crate::options::RuntimeOptions;
use crate::registry::ModuleRegistry;
use crate::resolver::{Claim, PathResolver, Resolver};

/// Owns the module registry and the resolver chain, and implements the
/// engine's [`ImportHook`] so module bodies re-enter the loader.
///
/// The chain starts with a single [`PathResolver`] built from the
/// options; further resolvers can be chained behind it with
/// [`Runtime::push_resolver`].
pub struct Runtime {
    registry: ModuleRegistry,
    chain: Vec<Box<dyn Resolver>>,
    diag: Box<dyn DiagSink>,
    options: RuntimeOptions,
}

impl Runtime {
    /// Build a runtime resolving under `options.root`.
    pub fn new(options: RuntimeOptions) -> Self {
        let resolver =
            PathResolver::new(options.root.clone()).with_compiled_probes(options.probe_compiled);
        Self {
            registry: ModuleRegistry::new(),
            chain: vec![Box::new(resolver)],
            diag: Box::new(StderrSink),
            options,
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_diag_sink(mut self, sink: Box<dyn DiagSink>) -> Self {
        self.diag = sink;
        self
    }

    /// Chain a resolver behind the existing ones. It is consulted only
    /// for names every earlier resolver passed on.
    pub fn push_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.chain.push(resolver);
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub(crate) fn diag(&self) -> &dyn DiagSink {
        self.diag.as_ref()
    }

    /// Ask the chain whether any resolver can supply `name`.
    pub fn find(&self, name: &ModuleName) -> Claim {
        for resolver in &self.chain {
            if resolver.find(name) == Claim::Claimed {
                return Claim::Claimed;
            }
        }
        Claim::Pass
    }

    /// Load a single qualified name through the chain.
    ///
    /// Dispatches to the first resolver that claims the name; no claim
    /// means [`LoadError::NotFound`]. Parents of a dotted name are not
    /// loaded; that is [`Runtime::import`]'s job.
    pub fn load(&self, name: &ModuleName) -> Result<Arc<Module>, LoadError> {
        for resolver in &self.chain {
            if resolver.find(name) == Claim::Claimed {
                return resolver.load(name, self);
            }
        }
        Err(LoadError::NotFound(name.clone()))
    }

    /// Import-statement semantics for a dotted name: load each prefix
    /// in order, bind every child module as an attribute of its parent,
    /// and return the head module (the object an `import a.b.c`
    /// statement binds under `a`).
    pub fn import(&self, target: &str) -> Result<Arc<Module>, LoadError> {
        let name = ModuleName::parse(target)?;
        let mut head: Option<Arc<Module>> = None;
        let mut parent: Option<Arc<Module>> = None;

        for prefix in name.prefixes() {
            let module = self.load(&prefix)?;
            if let Some(parent) = &parent {
                parent.set(prefix.last(), Value::Module(module.clone()));
            }
            if head.is_none() {
                head = Some(module.clone());
            }
            parent = Some(module);
        }

        // A parsed name always has at least one prefix
        head.ok_or(LoadError::InvalidName(crate::name::InvalidName(
            target.to_string(),
        )))
    }
}

impl ImportHook for Runtime {
    fn import(&self, target: &str) -> Result<Arc<Module>, ImportHookError> {
        Runtime::import(self, target).map_err(|e| Box::new(e) as ImportHookError)
    }
}

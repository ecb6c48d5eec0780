//! Module loading.
//!
//! Produces the module object for a name the path resolver claimed:
//! registry short-circuit, speculative registration, then the candidate
//! cases in load order: plain source file, package directory, compiled
//! units. Any failure past resolution is wrapped uniformly and the
//! speculative placeholder is evicted so a later attempt can retry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sable_engine::{codec, compile_source, Interp, Module};

use crate::error::{LoadCause, LoadError};
use crate::name::ModuleName;
use crate::resolver::{
    PathResolver, COMPILED_EXT, OPTIMIZED_EXT, PACKAGE_INIT, PATH_LOADER, SOURCE_EXT,
};
use crate::runtime::Runtime;

/// Load `name` through `resolver`, registering the result with the
/// runtime's registry.
pub(crate) fn load(
    resolver: &PathResolver,
    name: &ModuleName,
    rt: &Runtime,
) -> Result<Arc<Module>, LoadError> {
    // Already loaded (or loading, for cyclic imports): return the
    // registered object unchanged. Idempotent, no re-execution.
    if let Some(existing) = rt.registry().get(name) {
        return Ok(existing);
    }

    // Speculative registration before any source executes. A module
    // that imports itself through a cycle observes this placeholder
    // instead of recursing without bound.
    let (module, _inserted) = rt.registry().get_or_insert(name);

    let base = resolver.base_path(name);
    match load_candidates(resolver, &module, &base, rt) {
        Ok(true) => Ok(module),
        Ok(false) => {
            // Claimed earlier but gone from disk by load time
            rt.registry().remove(name);
            Err(LoadError::NotFound(name.clone()))
        }
        Err((path, cause)) => {
            rt.diag().load_failure(&path, &cause.to_string());
            // Evict the placeholder: a failed load must not leave a
            // half-initialized module behind for later lookups.
            rt.registry().remove(name);
            Err(LoadError::LoadFailed {
                name: name.clone(),
                path,
                source: cause,
            })
        }
    }
}

/// Try the candidate locations in load order. Returns `Ok(false)` when
/// none exists; failures carry the failing physical path.
fn load_candidates(
    resolver: &PathResolver,
    module: &Arc<Module>,
    base: &Path,
    rt: &Runtime,
) -> Result<bool, (PathBuf, LoadCause)> {
    // Plain source is checked first, mirroring the claim the resolver
    // made for it.
    let source_file = base.with_extension(SOURCE_EXT);
    if source_file.is_file() {
        exec_source_file(&source_file, module, rt).map_err(|cause| (source_file, cause))?;
        return Ok(true);
    }

    if base.is_dir() {
        // Package: the directory is the synthetic file path, and the
        // module resolves its own children through a one-element
        // search path.
        module.set_file(base);
        module.set_search_path(vec![base.to_path_buf()]);
        module.set_loaded_by(PATH_LOADER);

        let init = base.join(PACKAGE_INIT);
        if init.is_file() {
            exec_source_file(&init, module, rt).map_err(|cause| (init, cause))?;
            module.set_file(base);
        }
        // No initializer: a valid, namespace-only package
        return Ok(true);
    }

    if resolver.probe_compiled {
        for ext in [OPTIMIZED_EXT, COMPILED_EXT] {
            let candidate = base.with_extension(ext);
            if candidate.is_file() {
                exec_compiled_file(&candidate, module, rt).map_err(|cause| (candidate, cause))?;
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Read, compile, and execute a source file against the module namespace.
fn exec_source_file(path: &Path, module: &Arc<Module>, rt: &Runtime) -> Result<(), LoadCause> {
    let text = read_source(path)?;
    let program = compile_source(&text)?;
    module.set_file(path);
    module.set_loaded_by(PATH_LOADER);
    Interp::new(rt).run(&program, module)?;
    Ok(())
}

/// Decode and execute a compiled unit against the module namespace.
fn exec_compiled_file(path: &Path, module: &Arc<Module>, rt: &Runtime) -> Result<(), LoadCause> {
    let bytes = fs::read(path)?;
    let program = codec::decode(&bytes)?;
    module.set_file(path);
    module.set_loaded_by(PATH_LOADER);
    Interp::new(rt).run(&program, module)?;
    Ok(())
}

/// Read source text with platform line endings normalized to `\n`.
fn read_source(path: &Path) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    if !text.contains('\r') {
        return Ok(text);
    }
    Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
}

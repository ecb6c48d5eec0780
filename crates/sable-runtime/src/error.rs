//! Loader error types.
//!
//! A name that matches nothing is [`LoadError::NotFound`]; any failure
//! after resolution succeeds is wrapped uniformly as
//! [`LoadError::LoadFailed`] with the original cause nested, so chained
//! load failures remain traceable to their innermost origin via
//! [`std::error::Error::source`].

use std::path::PathBuf;

use thiserror::Error;

use sable_engine::{CompileError, DecodeError, ExecError};

use crate::name::{InvalidName, ModuleName};

/// Errors surfaced by `load`.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The name matches neither a package directory nor any extension
    #[error("no such module: {0}")]
    NotFound(ModuleName),

    /// The dotted name itself is malformed
    #[error(transparent)]
    InvalidName(#[from] InvalidName),

    /// Resolution succeeded but loading did not
    #[error("failed to load `{name}` from `{}`: {source}", .path.display())]
    LoadFailed {
        name: ModuleName,
        /// The failing physical path
        path: PathBuf,
        #[source]
        source: LoadCause,
    },
}

/// What went wrong inside a failed load.
#[derive(Debug, Error)]
pub enum LoadCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl LoadError {
    /// The failing physical path, when the failure has one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            LoadError::LoadFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}

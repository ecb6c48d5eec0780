//! Engine error types.

use thiserror::Error;

/// Errors produced while turning source text into a [`crate::Program`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    /// Lexer error with source position
    #[error("lex error at {line}:{col}: {message}")]
    Lex {
        line: usize,
        col: usize,
        message: String,
    },

    /// Parse error with source position
    #[error("parse error at {line}:{col}: {message}")]
    Parse {
        line: usize,
        col: usize,
        message: String,
    },
}

/// Errors produced while executing a program against a module namespace.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Name is not bound in the module namespace
    #[error("undefined name `{0}`")]
    Undefined(String),

    /// Operator applied to operands it does not support
    #[error("type mismatch: cannot apply `{op}` to {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Unary operator applied to an operand it does not support
    #[error("unsupported operand type {type_name} for unary `{op}`")]
    UnsupportedOperand {
        op: &'static str,
        type_name: &'static str,
    },

    /// Integer division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Attribute lookup on a module that does not define it
    #[error("module `{module}` has no attribute `{attr}`")]
    NoAttribute { module: String, attr: String },

    /// Attribute lookup on a non-module value
    #[error("cannot read attribute `{attr}` of {type_name} value")]
    AttrOnNonModule {
        attr: String,
        type_name: &'static str,
    },

    /// An `import` statement failed; the original failure is preserved
    /// as the source so nested load errors stay diagnosable.
    #[error("import of `{name}` failed: {source}")]
    Import {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors produced while decoding a compiled unit.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Leading magic bytes do not match
    #[error("bad magic: not a compiled sable unit")]
    BadMagic,

    /// Input shorter than the fixed header
    #[error("truncated compiled unit")]
    Truncated,

    /// Payload checksum mismatch
    #[error("checksum mismatch (expected {expected:08x}, found {found:08x})")]
    Checksum { expected: u32, found: u32 },

    /// Payload did not deserialize to a program
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

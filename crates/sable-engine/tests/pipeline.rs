//! End-to-end engine tests: compile, encode, decode, execute.

use std::sync::Arc;

use sable_engine::{codec, compile_source, ImportHook, ImportHookError, Interp, Module, Value};

/// Hook for programs that perform no imports.
struct NoImports;

impl ImportHook for NoImports {
    fn import(&self, target: &str) -> Result<Arc<Module>, ImportHookError> {
        Err(format!("no such module: {target}").into())
    }
}

#[test]
fn test_compiled_roundtrip_executes_identically() {
    let source = "BASE = 40\nVALUE = BASE + 2\nNAME = \"sable\" + \"-engine\"";
    let program = compile_source(source).unwrap();

    let direct = Module::new("direct");
    Interp::new(&NoImports).run(&program, &direct).unwrap();

    let bytes = codec::encode(&program).unwrap();
    let decoded = codec::decode(&bytes).unwrap();
    let roundtripped = Module::new("roundtripped");
    Interp::new(&NoImports).run(&decoded, &roundtripped).unwrap();

    assert_eq!(direct.get("VALUE"), Some(Value::Int(42)));
    assert_eq!(roundtripped.get("VALUE"), Some(Value::Int(42)));
    assert_eq!(
        roundtripped.get("NAME"),
        Some(Value::Str("sable-engine".to_string()))
    );
    assert_eq!(direct.attr_names(), roundtripped.attr_names());
}

#[test]
fn test_compile_error_positions_survive_real_sources() {
    let source = "# configuration module\nLIMIT = 10\nBROKEN = * 2\n";
    let err = compile_source(source).unwrap_err();
    assert!(err.to_string().contains("parse error at 3:10"));
}

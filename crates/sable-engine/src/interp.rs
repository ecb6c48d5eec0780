//! Tree-walking interpreter.
//!
//! A program executes with one module's namespace as both its global and
//! local scope. `import` statements are delegated to an [`ImportHook`];
//! the engine knows nothing about how modules are found or loaded.

use std::sync::Arc;

use crate::ast::{BinOp, Expr, Program, Stmt, UnaryOp};
use crate::error::ExecError;
use crate::module::Module;
use crate::value::Value;

/// Error type returned by import hooks.
///
/// Boxed so the engine stays independent of the loader's error taxonomy;
/// the original error is preserved as the `source` of
/// [`ExecError::Import`].
pub type ImportHookError = Box<dyn std::error::Error + Send + Sync>;

/// The seam between the engine and the module loader.
pub trait ImportHook {
    /// Load the dotted `target` and return the module object to bind
    /// under the target's first segment in the importing namespace.
    fn import(&self, target: &str) -> Result<Arc<Module>, ImportHookError>;
}

/// Executes programs against module namespaces.
pub struct Interp<'h> {
    hook: &'h dyn ImportHook,
}

impl<'h> Interp<'h> {
    pub fn new(hook: &'h dyn ImportHook) -> Self {
        Self { hook }
    }

    /// Execute `program` with `module`'s namespace as its scope.
    ///
    /// Statements run in order; the first failure aborts execution and
    /// leaves earlier bindings in place.
    pub fn run(&self, program: &Program, module: &Arc<Module>) -> Result<(), ExecError> {
        for stmt in &program.stmts {
            self.exec_stmt(stmt, module)?;
        }
        Ok(())
    }

    fn exec_stmt(&self, stmt: &Stmt, module: &Arc<Module>) -> Result<(), ExecError> {
        match stmt {
            Stmt::Assign { name, value } => {
                let value = self.eval(value, module)?;
                module.set(name.clone(), value);
            }
            Stmt::Import { target } => {
                let imported = self.hook.import(target).map_err(|source| ExecError::Import {
                    name: target.clone(),
                    source,
                })?;
                let head = target.split('.').next().unwrap_or(target);
                module.set(head, Value::Module(imported));
            }
            Stmt::Expr(expr) => {
                self.eval(expr, module)?;
            }
        }
        Ok(())
    }

    fn eval(&self, expr: &Expr, module: &Arc<Module>) -> Result<Value, ExecError> {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Float(v) => Ok(Value::Float(*v)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::None => Ok(Value::None),
            Expr::Name(name) => module
                .get(name)
                .ok_or_else(|| ExecError::Undefined(name.clone())),
            Expr::Attr { base, attr } => {
                let base = self.eval(base, module)?;
                match base {
                    Value::Module(m) => m.get(attr).ok_or_else(|| ExecError::NoAttribute {
                        module: m.name().to_string(),
                        attr: attr.clone(),
                    }),
                    other => Err(ExecError::AttrOnNonModule {
                        attr: attr.clone(),
                        type_name: other.type_name(),
                    }),
                }
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand, module)?;
                unary(*op, operand)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs, module)?;
                let rhs = self.eval(rhs, module)?;
                binary(*op, lhs, rhs)
            }
        }
    }
}

fn unary(op: UnaryOp, operand: Value) -> Result<Value, ExecError> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(v)) => Ok(Value::Int(v.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
        (UnaryOp::Neg, other) => Err(ExecError::UnsupportedOperand {
            op: "-",
            type_name: other.type_name(),
        }),
    }
}

fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ExecError> {
    match op {
        BinOp::Eq => return Ok(Value::Bool(lhs == rhs)),
        BinOp::Ne => return Ok(Value::Bool(lhs != rhs)),
        _ => {}
    }

    if let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) {
        return int_arith(op, *a, *b);
    }
    if let (BinOp::Add, Value::Str(a), Value::Str(b)) = (op, &lhs, &rhs) {
        let mut out = a.clone();
        out.push_str(b);
        return Ok(Value::Str(out));
    }
    if let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) {
        return Ok(Value::Float(float_arith(op, a, b)));
    }

    Err(ExecError::TypeMismatch {
        op: op.symbol(),
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    })
}

fn int_arith(op: BinOp, a: i64, b: i64) -> Result<Value, ExecError> {
    let v = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(ExecError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        BinOp::Rem => {
            if b == 0 {
                return Err(ExecError::DivisionByZero);
            }
            a.wrapping_rem(b)
        }
        // Eq and Ne are handled before dispatch
        BinOp::Eq | BinOp::Ne => a,
    };
    Ok(Value::Int(v))
}

fn float_arith(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Rem => a % b,
        BinOp::Eq | BinOp::Ne => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::compile_source;
    use rustc_hash::FxHashMap;

    /// Hook that refuses every import.
    struct NoImports;

    impl ImportHook for NoImports {
        fn import(&self, target: &str) -> Result<Arc<Module>, ImportHookError> {
            Err(format!("no such module: {target}").into())
        }
    }

    /// Hook serving a fixed set of preloaded modules.
    struct FixedModules(FxHashMap<String, Arc<Module>>);

    impl ImportHook for FixedModules {
        fn import(&self, target: &str) -> Result<Arc<Module>, ImportHookError> {
            self.0
                .get(target)
                .cloned()
                .ok_or_else(|| format!("no such module: {target}").into())
        }
    }

    fn run(source: &str) -> Arc<Module> {
        let program = compile_source(source).unwrap();
        let module = Module::new("test");
        Interp::new(&NoImports).run(&program, &module).unwrap();
        module
    }

    #[test]
    fn test_assignment_and_arithmetic() {
        let module = run("x = 1 + 2 * 3\ny = x - 10\nz = -y");
        assert_eq!(module.get("x"), Some(Value::Int(7)));
        assert_eq!(module.get("y"), Some(Value::Int(-3)));
        assert_eq!(module.get("z"), Some(Value::Int(3)));
    }

    #[test]
    fn test_mixed_numeric_arithmetic() {
        let module = run("x = 1 + 0.5");
        assert_eq!(module.get("x"), Some(Value::Float(1.5)));
    }

    #[test]
    fn test_string_concat() {
        let module = run("s = \"foo\" + \"bar\"");
        assert_eq!(module.get("s"), Some(Value::Str("foobar".to_string())));
    }

    #[test]
    fn test_equality() {
        let module = run("a = 1 == 1\nb = 1 != 1\nc = 1 == 1.0");
        assert_eq!(module.get("a"), Some(Value::Bool(true)));
        assert_eq!(module.get("b"), Some(Value::Bool(false)));
        assert_eq!(module.get("c"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_division_by_zero() {
        let program = compile_source("x = 1 / 0").unwrap();
        let module = Module::new("test");
        let err = Interp::new(&NoImports).run(&program, &module).unwrap_err();
        assert!(matches!(err, ExecError::DivisionByZero));
    }

    #[test]
    fn test_undefined_name() {
        let program = compile_source("x = missing").unwrap();
        let module = Module::new("test");
        let err = Interp::new(&NoImports).run(&program, &module).unwrap_err();
        assert!(matches!(err, ExecError::Undefined(name) if name == "missing"));
    }

    #[test]
    fn test_import_binds_head_segment() {
        let pkg = Module::new("pkg");
        pkg.set("VALUE", Value::Int(42));

        let mut modules = FxHashMap::default();
        // The hook returns the module to bind under the head segment
        modules.insert("pkg.sub".to_string(), pkg.clone());

        let program = compile_source("import pkg.sub").unwrap();
        let module = Module::new("test");
        Interp::new(&FixedModules(modules))
            .run(&program, &module)
            .unwrap();

        let bound = module.get("pkg").and_then(|v| v.as_module().cloned());
        assert!(bound.is_some_and(|m| Arc::ptr_eq(&m, &pkg)));
    }

    #[test]
    fn test_attribute_access_on_module() {
        let dep = Module::new("dep");
        dep.set("VALUE", Value::Int(42));

        let mut modules = FxHashMap::default();
        modules.insert("dep".to_string(), dep);

        let program = compile_source("import dep\nx = dep.VALUE + 1").unwrap();
        let module = Module::new("test");
        Interp::new(&FixedModules(modules))
            .run(&program, &module)
            .unwrap();
        assert_eq!(module.get("x"), Some(Value::Int(43)));
    }

    #[test]
    fn test_missing_attribute() {
        let dep = Module::new("dep");
        let mut modules = FxHashMap::default();
        modules.insert("dep".to_string(), dep);

        let program = compile_source("import dep\nx = dep.missing").unwrap();
        let module = Module::new("test");
        let err = Interp::new(&FixedModules(modules))
            .run(&program, &module)
            .unwrap_err();
        assert!(matches!(err, ExecError::NoAttribute { .. }));
    }

    #[test]
    fn test_failed_import_preserves_cause() {
        let program = compile_source("import ghost").unwrap();
        let module = Module::new("test");
        let err = Interp::new(&NoImports).run(&program, &module).unwrap_err();
        match err {
            ExecError::Import { name, source } => {
                assert_eq!(name, "ghost");
                assert!(source.to_string().contains("ghost"));
            }
            other => panic!("expected import error, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_keeps_earlier_bindings() {
        let program = compile_source("a = 1\nb = missing\nc = 3").unwrap();
        let module = Module::new("test");
        assert!(Interp::new(&NoImports).run(&program, &module).is_err());
        assert_eq!(module.get("a"), Some(Value::Int(1)));
        assert_eq!(module.get("c"), None);
    }
}

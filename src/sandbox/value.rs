//! Runtime values for the sandbox evaluator.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::ast::FunctionLiteral;
use super::error::{RenderError, RenderResult};
use super::eval::ScopeRef;
use super::node::UiNode;

/// Host-side hook that lets native capabilities call back into snippet
/// functions (e.g. `useMemo(factory)` invoking `factory`). The evaluator
/// implements this.
pub trait Invoker {
    fn invoke(&mut self, callee: &Value, args: &[Value]) -> RenderResult<Value>;
}

type NativeFn = Rc<dyn Fn(&mut dyn Invoker, &[Value]) -> RenderResult<Value>>;

/// A host-provided function exposed to sandboxed code.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut dyn Invoker, &[Value]) -> RenderResult<Value> + 'static,
    {
        Self {
            name: Rc::from(name.into()),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, invoker: &mut dyn Invoker, args: &[Value]) -> RenderResult<Value> {
        (self.func)(invoker, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// A snippet-defined function plus its captured environment.
pub struct Closure {
    pub function: Rc<FunctionLiteral>,
    pub env: ScopeRef,
}

/// The environment is omitted: scope chains reference the closures they
/// contain, and a derived Debug would recurse through that cycle.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.function.name)
            .finish()
    }
}

/// A sandbox runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<BTreeMap<String, Value>>>),
    Closure(Rc<Closure>),
    Native(NativeFunction),
    Node(UiNode),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(entries: BTreeMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(entries)))
    }

    pub fn native<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut dyn Invoker, &[Value]) -> RenderResult<Value> + 'static,
    {
        Value::Native(NativeFunction::new(name, func))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Closure(_) | Value::Native(_) => "function",
            Value::Node(_) => "node",
        }
    }

    /// JavaScript-flavoured truthiness.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Native(_))
    }

    /// Strict (`===`) equality.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Node(a), Value::Node(b)) => a == b,
            _ => false,
        }
    }

    /// Loose (`==`) equality: strict equality plus the `null == undefined`
    /// and number/string coercion cases generated code actually relies on.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Number(n), Value::Str(s)) | (Value::Str(s), Value::Number(n)) => {
                s.trim().parse::<f64>().is_ok_and(|parsed| parsed == *n)
            }
            (Value::Bool(b), other) | (other, Value::Bool(b)) => {
                Value::Number(if *b { 1.0 } else { 0.0 }).loose_eq(other)
            }
            _ => self.strict_eq(other),
        }
    }

    pub fn as_number(&self, operation: &'static str) -> RenderResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(RenderError::type_error("number", other.type_name(), operation)),
        }
    }
}

/// Structural equality, used by node/prop comparisons in tests and hosts.
/// Reference types compare by contents except functions, which compare by
/// identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            _ => self.strict_eq(other),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

/// Stringification for template interpolation, text coercion and the
/// diagnostic placeholder.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write_number(f, *n),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                let items = items.borrow();
                let mut first = true;
                for item in items.iter() {
                    if !first {
                        write!(f, ",")?;
                    }
                    first = false;
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Closure(closure) => match &closure.function.name {
                Some(name) => write!(f, "[function {name}]"),
                None => write!(f, "[function]"),
            },
            Value::Native(native) => write!(f, "[function {}]", native.name()),
            Value::Node(node) => write!(f, "{node}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_javascript() {
        assert!(!Value::Undefined.truthy());
        assert!(!Value::Null.truthy());
        assert!(!Value::Number(0.0).truthy());
        assert!(!Value::string("").truthy());
        assert!(Value::string("x").truthy());
        assert!(Value::Number(2.0).truthy());
        assert!(Value::array(vec![]).truthy());
    }

    #[test]
    fn loose_eq_coerces_null_and_numbers() {
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(Value::Number(3.0).loose_eq(&Value::string("3")));
        assert!(!Value::Number(3.0).strict_eq(&Value::string("3")));
    }

    #[test]
    fn display_formats_integral_numbers_without_decimals() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(3.5).to_string(), "3.5");
        assert_eq!(
            Value::array(vec![Value::Number(1.0), Value::Number(2.0)]).to_string(),
            "1,2"
        );
    }
}

//! Tree-walking evaluator with a closed scope chain and bounded execution.
//!
//! Name resolution bottoms out at the root scope, which is seeded from the
//! capability map; there is no ambient global object, so sandboxed code can
//! only reach what the host handed in. Every evaluation step burns fuel and
//! every call pushes depth, so runaway loops and recursion end in an error
//! instead of a hang.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::CapabilityMap;
use super::RendererOptions;
use super::ast::{
    ArrayElement, AssignOp, BinaryOp, Expr, FunctionBody, JsxAttr, JsxChild, JsxElement, JsxName,
    LogicalOp, ObjectProp, Pattern, Stmt, TemplatePart, UnaryOp,
};
use super::error::{RenderError, RenderResult};
use super::node::UiNode;
use super::value::{Closure, Invoker, Value};

/// A lexical scope in the chain rooted at the capability bindings.
pub struct Scope {
    vars: HashMap<String, Value>,
    parent: Option<ScopeRef>,
}

pub type ScopeRef = Rc<RefCell<Scope>>;

impl Scope {
    pub fn root(library: &CapabilityMap) -> ScopeRef {
        let vars = library
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Rc::new(RefCell::new(Scope { vars, parent: None }))
    }

    fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            vars: HashMap::new(),
            parent: Some(parent.clone()),
        }))
    }

    fn lookup(scope: &ScopeRef, name: &str) -> Option<Value> {
        let mut current = scope.clone();
        loop {
            if let Some(value) = current.borrow().vars.get(name) {
                return Some(value.clone());
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    fn declare(scope: &ScopeRef, name: &str, value: Value) {
        scope.borrow_mut().vars.insert(name.to_string(), value);
    }

    fn assign(scope: &ScopeRef, name: &str, value: Value) -> bool {
        let mut current = scope.clone();
        loop {
            if let Some(slot) = current.borrow_mut().vars.get_mut(name) {
                *slot = value.clone();
                return true;
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

/// Statement outcome: fall through or unwind with a return value.
enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter<'a> {
    options: &'a RendererOptions,
    fuel: u64,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(options: &'a RendererOptions) -> Self {
        Self {
            options,
            fuel: options.fuel,
            depth: 0,
        }
    }

    /// Run a transformed snippet body. The body's `return` value is the
    /// result of evaluation; a body that never returns yields `undefined`.
    pub fn run(&mut self, program: &[Stmt], library: &CapabilityMap) -> RenderResult<Value> {
        let root = Scope::root(library);
        match self.exec_block(program, &root)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Undefined),
        }
    }

    /// Final result interpretation: a node renders as-is, a callable is
    /// treated as a component and invoked with empty props, anything else
    /// becomes a stringified placeholder so the host still has something to
    /// show.
    pub fn interpret_result(&mut self, value: Value) -> RenderResult<UiNode> {
        match value {
            Value::Node(node) => Ok(node),
            callable if callable.is_callable() => {
                let props = Value::object(BTreeMap::new());
                match self.call_value(&callable, &[props])? {
                    Value::Node(node) => Ok(node),
                    other => Ok(UiNode::Text(other.to_string())),
                }
            }
            other => Ok(UiNode::Text(other.to_string())),
        }
    }

    fn step(&mut self) -> RenderResult<()> {
        if self.fuel == 0 {
            return Err(RenderError::budget_exhausted(self.options.fuel));
        }
        self.fuel -= 1;
        Ok(())
    }

    // ========== Statements ==========

    fn exec_block(&mut self, stmts: &[Stmt], scope: &ScopeRef) -> RenderResult<Flow> {
        // Function declarations are hoisted so components can call helpers
        // declared later in the snippet.
        for stmt in stmts {
            if let Stmt::Function { name, function } = stmt {
                let closure = Value::Closure(Rc::new(Closure {
                    function: function.clone(),
                    env: scope.clone(),
                }));
                Scope::declare(scope, name, closure);
            }
        }
        for stmt in stmts {
            if matches!(stmt, Stmt::Function { .. }) {
                continue;
            }
            if let Flow::Return(value) = self.exec_stmt(stmt, scope)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, scope: &ScopeRef) -> RenderResult<Flow> {
        self.step()?;
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(expr, scope)?;
                Ok(Flow::Normal)
            }
            Stmt::Declaration { pattern, init, .. } => {
                let value = match init {
                    Some(init) => self.eval(init, scope)?,
                    None => Value::Undefined,
                };
                self.bind_pattern(pattern, value, scope)?;
                Ok(Flow::Normal)
            }
            Stmt::Function { .. } => Ok(Flow::Normal),
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition, scope)?.truthy() {
                    self.exec_block(then_branch, &Scope::child(scope))
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch, &Scope::child(scope))
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While { condition, body } => {
                while self.eval(condition, scope)?.truthy() {
                    self.step()?;
                    if let Flow::Return(value) = self.exec_block(body, &Scope::child(scope))? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Block(stmts) => self.exec_block(stmts, &Scope::child(scope)),
        }
    }

    fn bind_pattern(
        &mut self,
        pattern: &Pattern,
        value: Value,
        scope: &ScopeRef,
    ) -> RenderResult<()> {
        match pattern {
            Pattern::Ident(name) => {
                Scope::declare(scope, name, value);
                Ok(())
            }
            Pattern::Array(patterns) => {
                let items = match &value {
                    Value::Array(items) => items.borrow().clone(),
                    other => {
                        return Err(RenderError::execution(format!(
                            "cannot destructure {} as an array",
                            other.type_name()
                        )));
                    }
                };
                for (i, pattern) in patterns.iter().enumerate() {
                    let item = items.get(i).cloned().unwrap_or(Value::Undefined);
                    self.bind_pattern(pattern, item, scope)?;
                }
                Ok(())
            }
            Pattern::Object(props) => {
                let entries = match &value {
                    Value::Object(map) => map.borrow().clone(),
                    other => {
                        return Err(RenderError::execution(format!(
                            "cannot destructure {} as an object",
                            other.type_name()
                        )));
                    }
                };
                for prop in props {
                    let mut bound = entries.get(&prop.key).cloned().unwrap_or(Value::Undefined);
                    if matches!(bound, Value::Undefined) {
                        if let Some(default) = &prop.default {
                            bound = self.eval(default, scope)?;
                        }
                    }
                    Scope::declare(scope, &prop.binding, bound);
                }
                Ok(())
            }
        }
    }

    // ========== Expressions ==========

    fn eval(&mut self, expr: &Expr, scope: &ScopeRef) -> RenderResult<Value> {
        self.step()?;
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::string(s)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Undefined => Ok(Value::Undefined),
            Expr::Template(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Str(s) => out.push_str(s),
                        TemplatePart::Expr(expr) => {
                            out.push_str(&self.eval(expr, scope)?.to_string());
                        }
                    }
                }
                Ok(Value::string(out))
            }
            Expr::Ident(name) => {
                Scope::lookup(scope, name).ok_or_else(|| RenderError::capability_missing(name))
            }
            Expr::Array(elements) => {
                let mut items = Vec::new();
                for element in elements {
                    match element {
                        ArrayElement::Item(expr) => items.push(self.eval(expr, scope)?),
                        ArrayElement::Spread(expr) => match self.eval(expr, scope)? {
                            Value::Array(spread) => items.extend(spread.borrow().iter().cloned()),
                            other => {
                                return Err(RenderError::type_error(
                                    "array",
                                    other.type_name(),
                                    "spread",
                                ));
                            }
                        },
                    }
                }
                Ok(Value::array(items))
            }
            Expr::Object(props) => {
                let mut entries = BTreeMap::new();
                for prop in props {
                    match prop {
                        ObjectProp::Entry { key, value } => {
                            entries.insert(key.clone(), self.eval(value, scope)?);
                        }
                        ObjectProp::Shorthand(name) => {
                            let value = Scope::lookup(scope, name)
                                .ok_or_else(|| RenderError::capability_missing(name))?;
                            entries.insert(name.clone(), value);
                        }
                        ObjectProp::Spread(expr) => match self.eval(expr, scope)? {
                            Value::Object(spread) => {
                                for (key, value) in spread.borrow().iter() {
                                    entries.insert(key.clone(), value.clone());
                                }
                            }
                            Value::Undefined | Value::Null => {}
                            other => {
                                return Err(RenderError::type_error(
                                    "object",
                                    other.type_name(),
                                    "spread",
                                ));
                            }
                        },
                    }
                }
                Ok(Value::object(entries))
            }
            Expr::Function(function) => Ok(Value::Closure(Rc::new(Closure {
                function: function.clone(),
                env: scope.clone(),
            }))),
            Expr::Unary { op, expr } => {
                let value = self.eval(expr, scope)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
                    UnaryOp::Neg => Ok(Value::Number(-value.as_number("unary '-'")?)),
                    UnaryOp::Typeof => Ok(Value::string(match value {
                        Value::Null => "object",
                        Value::Node(_) => "object",
                        Value::Array(_) => "object",
                        other => other.type_name(),
                    })),
                }
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                binary_op(*op, &left, &right)
            }
            Expr::Logical { op, left, right } => {
                let left = self.eval(left, scope)?;
                let take_right = match op {
                    LogicalOp::And => left.truthy(),
                    LogicalOp::Or => !left.truthy(),
                    LogicalOp::Nullish => matches!(left, Value::Undefined | Value::Null),
                };
                if take_right {
                    self.eval(right, scope)
                } else {
                    Ok(left)
                }
            }
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.eval(condition, scope)?.truthy() {
                    self.eval(then_expr, scope)
                } else {
                    self.eval(else_expr, scope)
                }
            }
            Expr::Assign { op, target, value } => self.eval_assign(*op, target, value, scope),
            Expr::Call { callee, args } => self.eval_call(callee, args, scope),
            Expr::Member {
                object,
                property,
                optional,
            } => {
                let object = self.eval(object, scope)?;
                if *optional && matches!(object, Value::Undefined | Value::Null) {
                    return Ok(Value::Undefined);
                }
                get_member(&object, property)
            }
            Expr::Index { object, index } => {
                let object = self.eval(object, scope)?;
                let index = self.eval(index, scope)?;
                Ok(get_index(&object, &index))
            }
            Expr::Jsx(element) => self.eval_jsx(element, scope),
        }
    }

    fn eval_assign(
        &mut self,
        op: AssignOp,
        target: &Expr,
        value: &Expr,
        scope: &ScopeRef,
    ) -> RenderResult<Value> {
        let rhs = self.eval(value, scope)?;
        let combine = |current: Value, rhs: Value| -> RenderResult<Value> {
            match op {
                AssignOp::Assign => Ok(rhs),
                AssignOp::AddAssign => binary_op(BinaryOp::Add, &current, &rhs),
                AssignOp::SubAssign => binary_op(BinaryOp::Sub, &current, &rhs),
            }
        };
        match target {
            Expr::Ident(name) => {
                let current = match op {
                    AssignOp::Assign => Value::Undefined,
                    _ => Scope::lookup(scope, name)
                        .ok_or_else(|| RenderError::capability_missing(name))?,
                };
                let next = combine(current, rhs)?;
                if Scope::assign(scope, name, next.clone()) {
                    Ok(next)
                } else {
                    Err(RenderError::execution(format!(
                        "assignment to undeclared variable '{name}'"
                    )))
                }
            }
            Expr::Member {
                object, property, ..
            } => {
                let object = self.eval(object, scope)?;
                let current = match op {
                    AssignOp::Assign => Value::Undefined,
                    _ => get_member(&object, property)?,
                };
                let next = combine(current, rhs)?;
                set_member(&object, property, next.clone())?;
                Ok(next)
            }
            Expr::Index { object, index } => {
                let object = self.eval(object, scope)?;
                let index = self.eval(index, scope)?;
                let current = match op {
                    AssignOp::Assign => Value::Undefined,
                    _ => get_index(&object, &index),
                };
                let next = combine(current, rhs)?;
                set_index(&object, &index, next.clone())?;
                Ok(next)
            }
            _ => Err(RenderError::execution("invalid assignment target")),
        }
    }

    fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        scope: &ScopeRef,
    ) -> RenderResult<Value> {
        // Method calls dispatch to built-ins on arrays/strings/numbers first
        // so `items.map(...)` and friends work without host capabilities.
        if let Expr::Member {
            object,
            property,
            optional,
        } = callee
        {
            let object = self.eval(object, scope)?;
            if *optional && matches!(object, Value::Undefined | Value::Null) {
                return Ok(Value::Undefined);
            }
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                evaluated.push(self.eval(arg, scope)?);
            }
            if let Some(result) = self.call_builtin_method(&object, property, &evaluated)? {
                return Ok(result);
            }
            let method = get_member(&object, property)?;
            return self.call_value(&method, &evaluated);
        }
        let callee = self.eval(callee, scope)?;
        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.eval(arg, scope)?);
        }
        self.call_value(&callee, &evaluated)
    }

    pub fn call_value(&mut self, callee: &Value, args: &[Value]) -> RenderResult<Value> {
        match callee {
            Value::Closure(closure) => self.call_closure(closure, args),
            Value::Native(native) => native.call(self, args),
            other => Err(RenderError::not_callable(other.type_name())),
        }
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, args: &[Value]) -> RenderResult<Value> {
        if self.depth >= self.options.max_depth {
            return Err(RenderError::depth_exceeded(self.options.max_depth));
        }
        self.depth += 1;
        let result = self.call_closure_inner(closure, args);
        self.depth -= 1;
        result
    }

    fn call_closure_inner(&mut self, closure: &Rc<Closure>, args: &[Value]) -> RenderResult<Value> {
        self.step()?;
        let scope = Scope::child(&closure.env);
        if let Some(name) = &closure.function.name {
            Scope::declare(&scope, name, Value::Closure(closure.clone()));
        }
        for (i, param) in closure.function.params.iter().enumerate() {
            let mut value = args.get(i).cloned().unwrap_or(Value::Undefined);
            if matches!(value, Value::Undefined) {
                if let Some(default) = &param.default {
                    value = self.eval(default, &scope)?;
                }
            }
            self.bind_pattern(&param.pattern, value, &scope)?;
        }
        match &closure.function.body {
            FunctionBody::Expr(expr) => self.eval(expr, &scope),
            FunctionBody::Block(stmts) => match self.exec_block(stmts, &scope)? {
                Flow::Return(value) => Ok(value),
                Flow::Normal => Ok(Value::Undefined),
            },
        }
    }

    // ========== JSX ==========

    fn eval_jsx(&mut self, element: &JsxElement, scope: &ScopeRef) -> RenderResult<Value> {
        self.step()?;
        let mut props = BTreeMap::new();
        for attr in &element.attrs {
            match attr {
                JsxAttr::Named { name, value } => {
                    props.insert(name.clone(), self.eval(value, scope)?);
                }
                JsxAttr::Spread(expr) => match self.eval(expr, scope)? {
                    Value::Object(spread) => {
                        for (key, value) in spread.borrow().iter() {
                            props.insert(key.clone(), value.clone());
                        }
                    }
                    Value::Undefined | Value::Null => {}
                    other => {
                        return Err(RenderError::type_error(
                            "object",
                            other.type_name(),
                            "JSX spread",
                        ));
                    }
                },
            }
        }
        let mut children = Vec::new();
        for child in &element.children {
            match child {
                JsxChild::Text(text) => children.push(UiNode::Text(text.clone())),
                JsxChild::Expr(expr) => {
                    let value = self.eval(expr, scope)?;
                    append_child_nodes(&value, &mut children);
                }
                JsxChild::Element(inner) => {
                    let value = self.eval_jsx(inner, scope)?;
                    append_child_nodes(&value, &mut children);
                }
            }
        }
        match &element.name {
            JsxName::Fragment => Ok(Value::Node(UiNode::Fragment(children))),
            JsxName::Tag(tag) if element.name.is_component() => {
                let component = Scope::lookup(scope, tag)
                    .ok_or_else(|| RenderError::capability_missing(tag))?;
                if !children.is_empty() {
                    let child_value = if children.len() == 1 {
                        Value::Node(children.remove(0))
                    } else {
                        Value::array(children.into_iter().map(Value::Node).collect())
                    };
                    props.insert("children".to_string(), child_value);
                }
                let result = self.call_value(&component, &[Value::object(props)])?;
                let mut nodes = Vec::new();
                append_child_nodes(&result, &mut nodes);
                Ok(Value::Node(match nodes.len() {
                    1 => nodes.remove(0),
                    _ => UiNode::Fragment(nodes),
                }))
            }
            JsxName::Tag(tag) => Ok(Value::Node(UiNode::element(tag.clone(), props, children))),
        }
    }

    // ========== Built-in methods ==========

    fn call_builtin_method(
        &mut self,
        object: &Value,
        method: &str,
        args: &[Value],
    ) -> RenderResult<Option<Value>> {
        match object {
            Value::Array(items) => self.array_method(items, method, args),
            Value::Str(s) => Ok(string_method(s, method, args)),
            Value::Number(n) => Ok(number_method(*n, method, args)),
            _ => Ok(None),
        }
    }

    fn array_method(
        &mut self,
        items: &Rc<RefCell<Vec<Value>>>,
        method: &str,
        args: &[Value],
    ) -> RenderResult<Option<Value>> {
        // Snapshot before invoking callbacks so mutation inside a callback
        // cannot alias the borrow.
        let snapshot = items.borrow().clone();
        let callback = args.first().cloned().unwrap_or(Value::Undefined);
        let result = match method {
            "map" => {
                let mut out = Vec::with_capacity(snapshot.len());
                for (i, item) in snapshot.into_iter().enumerate() {
                    out.push(self.call_value(&callback, &[item, Value::Number(i as f64)])?);
                }
                Value::array(out)
            }
            "filter" => {
                let mut out = Vec::new();
                for (i, item) in snapshot.into_iter().enumerate() {
                    if self
                        .call_value(&callback, &[item.clone(), Value::Number(i as f64)])?
                        .truthy()
                    {
                        out.push(item);
                    }
                }
                Value::array(out)
            }
            "forEach" => {
                for (i, item) in snapshot.into_iter().enumerate() {
                    self.call_value(&callback, &[item, Value::Number(i as f64)])?;
                }
                Value::Undefined
            }
            "join" => {
                let sep = match args.first() {
                    Some(Value::Str(s)) => s.to_string(),
                    _ => ",".to_string(),
                };
                let parts: Vec<String> = snapshot
                    .iter()
                    .map(|item| match item {
                        Value::Undefined | Value::Null => String::new(),
                        other => other.to_string(),
                    })
                    .collect();
                Value::string(parts.join(&sep))
            }
            "includes" => {
                let needle = args.first().cloned().unwrap_or(Value::Undefined);
                Value::Bool(snapshot.iter().any(|item| item.strict_eq(&needle)))
            }
            "indexOf" => {
                let needle = args.first().cloned().unwrap_or(Value::Undefined);
                Value::Number(
                    snapshot
                        .iter()
                        .position(|item| item.strict_eq(&needle))
                        .map_or(-1.0, |i| i as f64),
                )
            }
            "slice" => {
                let len = snapshot.len();
                let start = slice_bound(args.first(), 0, len);
                let end = slice_bound(args.get(1), len, len);
                Value::array(snapshot[start.min(end)..end].to_vec())
            }
            "concat" => {
                let mut out = snapshot;
                for arg in args {
                    match arg {
                        Value::Array(other) => out.extend(other.borrow().iter().cloned()),
                        other => out.push(other.clone()),
                    }
                }
                Value::array(out)
            }
            "push" => {
                let mut borrowed = items.borrow_mut();
                borrowed.extend(args.iter().cloned());
                Value::Number(borrowed.len() as f64)
            }
            _ => return Ok(None),
        };
        Ok(Some(result))
    }
}

impl Invoker for Interpreter<'_> {
    fn invoke(&mut self, callee: &Value, args: &[Value]) -> RenderResult<Value> {
        self.call_value(callee, args)
    }
}

/// Coerce a value into child nodes, React-style: nodes pass through, strings
/// and numbers become text, booleans and null/undefined vanish, arrays
/// flatten; anything else degrades to placeholder text.
pub(crate) fn append_child_nodes(value: &Value, out: &mut Vec<UiNode>) {
    match value {
        Value::Node(node) => out.push(node.clone()),
        Value::Str(s) => out.push(UiNode::Text(s.to_string())),
        Value::Number(n) => out.push(UiNode::Text(Value::Number(*n).to_string())),
        Value::Bool(_) | Value::Null | Value::Undefined => {}
        Value::Array(items) => {
            for item in items.borrow().iter() {
                append_child_nodes(item, out);
            }
        }
        other => out.push(UiNode::Text(other.to_string())),
    }
}

fn binary_op(op: BinaryOp, left: &Value, right: &Value) -> RenderResult<Value> {
    match op {
        BinaryOp::Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(_), _) | (_, Value::Str(_)) => {
                Ok(Value::string(format!("{left}{right}")))
            }
            _ => Err(RenderError::type_error(
                "number or string",
                left.type_name(),
                "'+'",
            )),
        },
        BinaryOp::Sub => Ok(Value::Number(
            left.as_number("'-'")? - right.as_number("'-'")?,
        )),
        BinaryOp::Mul => Ok(Value::Number(
            left.as_number("'*'")? * right.as_number("'*'")?,
        )),
        BinaryOp::Div => Ok(Value::Number(
            left.as_number("'/'")? / right.as_number("'/'")?,
        )),
        BinaryOp::Rem => Ok(Value::Number(
            left.as_number("'%'")? % right.as_number("'%'")?,
        )),
        BinaryOp::Eq => Ok(Value::Bool(left.loose_eq(right))),
        BinaryOp::Ne => Ok(Value::Bool(!left.loose_eq(right))),
        BinaryOp::StrictEq => Ok(Value::Bool(left.strict_eq(right))),
        BinaryOp::StrictNe => Ok(Value::Bool(!left.strict_eq(right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = match (left, right) {
                (Value::Str(a), Value::Str(b)) => a.cmp(b),
                _ => {
                    let a = left.as_number("comparison")?;
                    let b = right.as_number("comparison")?;
                    return Ok(Value::Bool(match op {
                        BinaryOp::Lt => a < b,
                        BinaryOp::Le => a <= b,
                        BinaryOp::Gt => a > b,
                        _ => a >= b,
                    }));
                }
            };
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
    }
}

fn get_member(object: &Value, property: &str) -> RenderResult<Value> {
    match object {
        Value::Undefined | Value::Null => Err(RenderError::execution(format!(
            "Cannot read properties of {} (reading '{}')",
            object.type_name(),
            property
        ))),
        Value::Object(map) => Ok(map.borrow().get(property).cloned().unwrap_or(Value::Undefined)),
        Value::Array(items) if property == "length" => {
            Ok(Value::Number(items.borrow().len() as f64))
        }
        Value::Str(s) if property == "length" => Ok(Value::Number(s.chars().count() as f64)),
        _ => Ok(Value::Undefined),
    }
}

fn set_member(object: &Value, property: &str, value: Value) -> RenderResult<()> {
    match object {
        Value::Object(map) => {
            map.borrow_mut().insert(property.to_string(), value);
            Ok(())
        }
        other => Err(RenderError::execution(format!(
            "cannot set property '{}' on {}",
            property,
            other.type_name()
        ))),
    }
}

fn get_index(object: &Value, index: &Value) -> Value {
    match (object, index) {
        (Value::Array(items), Value::Number(n)) => {
            let items = items.borrow();
            if *n >= 0.0 {
                items.get(*n as usize).cloned().unwrap_or(Value::Undefined)
            } else {
                Value::Undefined
            }
        }
        (Value::Object(map), key) => map
            .borrow()
            .get(&key.to_string())
            .cloned()
            .unwrap_or(Value::Undefined),
        (Value::Str(s), Value::Number(n)) if *n >= 0.0 => s
            .chars()
            .nth(*n as usize)
            .map_or(Value::Undefined, |c| Value::string(c.to_string())),
        _ => Value::Undefined,
    }
}

fn set_index(object: &Value, index: &Value, value: Value) -> RenderResult<()> {
    match (object, index) {
        (Value::Array(items), Value::Number(n)) if *n >= 0.0 => {
            let mut items = items.borrow_mut();
            let i = *n as usize;
            if i >= items.len() {
                items.resize(i + 1, Value::Undefined);
            }
            items[i] = value;
            Ok(())
        }
        (Value::Object(map), key) => {
            map.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }
        (other, _) => Err(RenderError::execution(format!(
            "cannot assign into {}",
            other.type_name()
        ))),
    }
}

fn slice_bound(arg: Option<&Value>, default: usize, len: usize) -> usize {
    match arg {
        Some(Value::Number(n)) => {
            if *n < 0.0 {
                len.saturating_sub((-*n) as usize)
            } else {
                (*n as usize).min(len)
            }
        }
        _ => default,
    }
}

fn string_method(s: &Rc<str>, method: &str, args: &[Value]) -> Option<Value> {
    let arg_str = |i: usize| -> Option<String> {
        match args.get(i) {
            Some(Value::Str(s)) => Some(s.to_string()),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    };
    let result = match method {
        "toUpperCase" => Value::string(s.to_uppercase()),
        "toLowerCase" => Value::string(s.to_lowercase()),
        "trim" => Value::string(s.trim()),
        "includes" => Value::Bool(arg_str(0).is_some_and(|needle| s.contains(&needle))),
        "startsWith" => Value::Bool(arg_str(0).is_some_and(|needle| s.starts_with(&needle))),
        "endsWith" => Value::Bool(arg_str(0).is_some_and(|needle| s.ends_with(&needle))),
        "split" => {
            let parts: Vec<Value> = match arg_str(0) {
                Some(sep) if !sep.is_empty() => s.split(&sep).map(Value::string).collect(),
                Some(_) => s.chars().map(|c| Value::string(c.to_string())).collect(),
                None => vec![Value::string(s.to_string())],
            };
            Value::array(parts)
        }
        "slice" => {
            let chars: Vec<char> = s.chars().collect();
            let start = slice_bound(args.first(), 0, chars.len());
            let end = slice_bound(args.get(1), chars.len(), chars.len());
            Value::string(chars[start.min(end)..end].iter().collect::<String>())
        }
        "charAt" => {
            let i = match args.first() {
                Some(Value::Number(n)) if *n >= 0.0 => *n as usize,
                _ => 0,
            };
            Value::string(s.chars().nth(i).map(String::from).unwrap_or_default())
        }
        "replace" => match (arg_str(0), arg_str(1)) {
            (Some(from), Some(to)) => Value::string(s.replacen(&from, &to, 1)),
            _ => Value::string(s.to_string()),
        },
        _ => return None,
    };
    Some(result)
}

fn number_method(n: f64, method: &str, args: &[Value]) -> Option<Value> {
    match method {
        "toFixed" => {
            let digits = match args.first() {
                Some(Value::Number(d)) if *d >= 0.0 => *d as usize,
                _ => 0,
            };
            Some(Value::string(format!("{n:.digits$}")))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser;
    use super::*;

    fn run_source(source: &str) -> RenderResult<Value> {
        run_with(source, &CapabilityMap::new())
    }

    fn run_with(source: &str, library: &CapabilityMap) -> RenderResult<Value> {
        let program = parser::parse(source).expect("test source parses");
        let options = RendererOptions::default();
        let mut interpreter = Interpreter::new(&options);
        interpreter.run(&program, library)
    }

    fn number(value: &Value) -> f64 {
        match value {
            Value::Number(n) => *n,
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_and_string_concat() {
        assert_eq!(number(&run_source("return 2 + 3 * 4").unwrap()), 14.0);
        let value = run_source("return 'n=' + 2").unwrap();
        assert_eq!(value.to_string(), "n=2");
    }

    #[test]
    fn destructuring_and_defaults() {
        let value = run_source(
            "const { a, b = 10 } = { a: 1 }\nconst [x, y] = [a, b]\nreturn x + y",
        )
        .unwrap();
        assert_eq!(number(&value), 11.0);
    }

    #[test]
    fn closures_capture_their_environment() {
        let value = run_source(
            "const make = (start) => (n) => start + n\nconst add5 = make(5)\nreturn add5(3)",
        )
        .unwrap();
        assert_eq!(number(&value), 8.0);
    }

    #[test]
    fn function_declarations_are_hoisted() {
        let value = run_source("return helper()\nfunction helper() { return 7 }").unwrap();
        assert_eq!(number(&value), 7.0);
    }

    #[test]
    fn array_map_and_filter() {
        let value = run_source(
            "const xs = [1, 2, 3, 4]\nreturn xs.filter(x => x % 2 === 0).map(x => x * 10).join('-')",
        )
        .unwrap();
        assert_eq!(value.to_string(), "20-40");
    }

    #[test]
    fn template_literals_interpolate() {
        let value = run_source("const name = 'world'\nreturn `hello ${name}!`").unwrap();
        assert_eq!(value.to_string(), "hello world!");
    }

    #[test]
    fn undefined_identifier_is_a_capability_error() {
        let err = run_source("return missingThing").unwrap_err();
        assert!(err.to_string().contains("'missingThing'"));
    }

    #[test]
    fn infinite_loop_exhausts_the_budget() {
        let program = parser::parse("while (true) { }").unwrap();
        let options = RendererOptions {
            fuel: 1_000,
            ..RendererOptions::default()
        };
        let mut interpreter = Interpreter::new(&options);
        let err = interpreter.run(&program, &CapabilityMap::new()).unwrap_err();
        assert!(err.to_string().contains("budget"));
    }

    #[test]
    fn runaway_recursion_hits_the_depth_limit() {
        let err = run_source("function f() { return f() }\nreturn f()").unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("depth") || message.contains("budget"),
            "{message}"
        );
    }

    #[test]
    fn jsx_intrinsic_builds_an_element() {
        let value = run_source("return <div className=\"row\">hi</div>").unwrap();
        let Value::Node(node) = value else {
            panic!("expected node");
        };
        assert_eq!(node.to_string(), "<div className=\"row\">hi</div>");
    }

    #[test]
    fn jsx_component_requires_a_capability() {
        let err = run_source("return <Button>Hi</Button>").unwrap_err();
        assert!(err.to_string().contains("'Button'"));
    }

    #[test]
    fn jsx_conditional_children_disappear_when_falsy() {
        let value = run_source("const show = false\nreturn <div>{show && <span>x</span>}always</div>")
            .unwrap();
        let Value::Node(node) = value else {
            panic!("expected node");
        };
        assert_eq!(node.to_string(), "<div>always</div>");
    }

    #[test]
    fn jsx_list_rendering_flattens_arrays() {
        let value =
            run_source("const xs = ['a', 'b']\nreturn <ul>{xs.map(x => <li>{x}</li>)}</ul>")
                .unwrap();
        let Value::Node(node) = value else {
            panic!("expected node");
        };
        assert_eq!(node.to_string(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn snippet_components_render_through_scope() {
        let value = run_source(
            "function Badge({ label }) { return <span className=\"badge\">{label}</span> }\nreturn <div><Badge label=\"new\" /></div>",
        )
        .unwrap();
        let Value::Node(node) = value else {
            panic!("expected node");
        };
        assert_eq!(
            node.to_string(),
            "<div><span className=\"badge\">new</span></div>"
        );
    }

    #[test]
    fn interpret_result_invokes_callables_with_empty_props() {
        let program = parser::parse("return function App() { return <p>ok</p> }").unwrap();
        let options = RendererOptions::default();
        let mut interpreter = Interpreter::new(&options);
        let value = interpreter.run(&program, &CapabilityMap::new()).unwrap();
        let node = interpreter.interpret_result(value).unwrap();
        assert_eq!(node.to_string(), "<p>ok</p>");
    }

    #[test]
    fn interpret_result_stringifies_non_nodes() {
        let program = parser::parse("return 42").unwrap();
        let options = RendererOptions::default();
        let mut interpreter = Interpreter::new(&options);
        let value = interpreter.run(&program, &CapabilityMap::new()).unwrap();
        let node = interpreter.interpret_result(value).unwrap();
        assert_eq!(node, UiNode::Text("42".into()));
    }
}

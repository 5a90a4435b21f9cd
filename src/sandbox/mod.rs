//! Sandboxed rendering of generated component source.
//!
//! A snippet goes through a deterministic textual transform (imports
//! stripped, default export rewritten into a `return`), is parsed into a
//! small JavaScript/JSX subset, and is evaluated inside a closed scope chain
//! seeded from a caller-supplied capability map. The only names sandboxed
//! code can reach are the ones in that map; there is no module resolution,
//! no host I/O and no ambient global state. Execution is bounded by a step
//! budget and a call-depth limit, so hostile input degenerates into a
//! `Failure`, never a hang or a panic.

mod ast;
mod error;
mod eval;
pub mod library;
mod node;
mod parser;
mod token;
pub mod transform;
mod value;

use std::collections::BTreeMap;

use log::debug;

pub use error::{RenderError, RenderErrorKind};
pub use node::{ElementNode, UiNode};
pub use value::{Closure, Invoker, NativeFunction, Value};

/// The names a snippet may reference, mapped to host-provided capabilities.
pub type CapabilityMap = BTreeMap<String, Value>;

/// Execution bounds for a render call.
#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Evaluation steps before the render is aborted
    pub fuel: u64,
    /// Maximum call depth
    pub max_depth: usize,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            fuel: 1_000_000,
            max_depth: 200,
        }
    }
}

/// Outcome of a render call: a UI tree or a diagnostic message.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Success(UiNode),
    Failure { message: String },
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RenderOutcome::Success(_))
    }

    pub fn node(&self) -> Option<&UiNode> {
        match self {
            RenderOutcome::Success(node) => Some(node),
            RenderOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            RenderOutcome::Success(_) => None,
            RenderOutcome::Failure { message } => Some(message),
        }
    }
}

/// Renders generated component source against a capability map.
///
/// Stateless across calls: rendering the same source with an equivalent map
/// yields an equivalent outcome.
#[derive(Debug, Default)]
pub struct Renderer {
    options: RendererOptions,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            options: RendererOptions::default(),
        }
    }

    pub fn with_options(options: RendererOptions) -> Self {
        Self { options }
    }

    /// Render `source` using `library` as the complete set of reachable
    /// names. Never panics and never returns `Err`: every transform, parse
    /// and execution failure becomes `RenderOutcome::Failure`.
    #[tracing::instrument(skip_all)]
    pub fn render(&self, source: &str, library: &CapabilityMap) -> RenderOutcome {
        match self.try_render(source, library) {
            Ok(node) => RenderOutcome::Success(node),
            Err(err) => {
                debug!("render failed: {err}");
                RenderOutcome::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    fn try_render(&self, source: &str, library: &CapabilityMap) -> Result<UiNode, RenderError> {
        let body = transform::transform(source);
        let program =
            parser::parse(&body).map_err(|err| RenderError::compile(err.to_string()))?;
        let mut interpreter = eval::Interpreter::new(&self.options);
        let value = interpreter.run(&program, library)?;
        interpreter.interpret_result(value)
    }
}

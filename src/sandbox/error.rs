//! Failure kinds for the sandbox transform and evaluator.

use std::fmt;

/// An error raised while transforming, parsing or executing a snippet.
///
/// These never escape [`super::Renderer::render`]; they are folded into the
/// `Failure` variant of the render outcome at the API boundary.
#[derive(Debug, Clone)]
pub struct RenderError {
    /// The kind of error
    pub kind: RenderErrorKind,
}

impl RenderError {
    /// Create a new render error
    pub fn new(kind: RenderErrorKind) -> Self {
        Self { kind }
    }

    pub fn compile(message: impl Into<String>) -> Self {
        Self::new(RenderErrorKind::Compile {
            message: message.into(),
        })
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(RenderErrorKind::Execution {
            message: message.into(),
        })
    }

    pub fn capability_missing(name: impl Into<String>) -> Self {
        Self::new(RenderErrorKind::CapabilityMissing { name: name.into() })
    }

    pub fn not_callable(type_name: &'static str) -> Self {
        Self::new(RenderErrorKind::NotCallable { type_name })
    }

    pub fn type_error(expected: &'static str, got: &'static str, operation: &'static str) -> Self {
        Self::new(RenderErrorKind::TypeError {
            expected,
            got,
            operation,
        })
    }

    pub fn budget_exhausted(budget: u64) -> Self {
        Self::new(RenderErrorKind::BudgetExhausted { budget })
    }

    pub fn depth_exceeded(limit: usize) -> Self {
        Self::new(RenderErrorKind::DepthExceeded { limit })
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for RenderError {}

/// The kind of render error
#[derive(Debug, Clone)]
pub enum RenderErrorKind {
    /// The snippet could not be rewritten/parsed into an executable body
    Compile { message: String },

    /// The snippet threw while executing
    Execution { message: String },

    /// The snippet referenced a name that is neither in scope nor in the
    /// capability map
    CapabilityMissing { name: String },

    /// A non-function value was called
    NotCallable { type_name: &'static str },

    /// Type mismatch in an operation
    TypeError {
        expected: &'static str,
        got: &'static str,
        operation: &'static str,
    },

    /// The evaluation step budget ran out (runaway loop or recursion)
    BudgetExhausted { budget: u64 },

    /// The call stack grew past the configured limit
    DepthExceeded { limit: usize },
}

impl fmt::Display for RenderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderErrorKind::Compile { message } => write!(f, "compile error: {message}"),
            RenderErrorKind::Execution { message } => write!(f, "{message}"),
            RenderErrorKind::CapabilityMissing { name } => {
                write!(
                    f,
                    "'{name}' is not defined; add it to the capability map or declare it in the snippet"
                )
            }
            RenderErrorKind::NotCallable { type_name } => {
                write!(f, "{type_name} is not callable")
            }
            RenderErrorKind::TypeError {
                expected,
                got,
                operation,
            } => {
                write!(f, "type error: {operation} expected {expected}, got {got}")
            }
            RenderErrorKind::BudgetExhausted { budget } => {
                write!(f, "evaluation budget of {budget} steps exhausted")
            }
            RenderErrorKind::DepthExceeded { limit } => {
                write!(f, "call depth limit of {limit} exceeded")
            }
        }
    }
}

/// Result type for sandbox evaluation
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_missing_names_the_identifier() {
        let err = RenderError::capability_missing("Chart");
        assert!(err.to_string().contains("'Chart'"));
        assert!(err.to_string().contains("capability map"));
    }

    #[test]
    fn budget_message_mentions_the_budget() {
        let err = RenderError::budget_exhausted(500);
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("budget"));
    }
}

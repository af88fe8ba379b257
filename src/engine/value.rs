use crate::engine::UnresolvedSource;
use crate::ir::Literal;

/// What an argument denotes once wrapping has been peeled off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Produced by a recognized cryptographically secure randomness accessor.
    SecureSource,
    Constant(Literal),
    /// Produced by some other call; only the callee identity is known.
    CallResult { callee: String },
    Unresolved(UnresolvedSource),
}

impl Resolved {
    pub fn is_secure_source(&self) -> bool {
        matches!(self, Resolved::SecureSource)
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolved::Unresolved(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Resolved::Constant(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        self.as_literal().and_then(Literal::as_int)
    }

    pub fn is_nil(&self) -> bool {
        self.as_literal().is_some_and(Literal::is_nil)
    }

    pub fn callee(&self) -> Option<&str> {
        match self {
            Resolved::CallResult { callee } => Some(callee),
            _ => None,
        }
    }

    /// Short description used in trace output.
    pub fn describe(&self) -> String {
        match self {
            Resolved::SecureSource => "secure_source".to_string(),
            Resolved::Constant(literal) => format!("constant({literal})"),
            Resolved::CallResult { callee } => format!("call_result({callee})"),
            Resolved::Unresolved(source) => format!("unresolved({source})"),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ir::Position;

/// A finding at one call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub position: Position,
    pub message: String,
    /// Stable code of the check that produced the finding.
    pub rule: String,
    pub callee: String,
}

impl Diagnostic {
    pub fn new(
        position: Position,
        rule: impl Into<String>,
        callee: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            position,
            message: message.into(),
            rule: rule.into(),
            callee: callee.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

/// A function whose analysis was abandoned because its IR was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub function: String,
    pub error: String,
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(
                f,
                "{}: analysis of {} failed: {}",
                source, self.function, self.error
            ),
            None => write!(f, "analysis of {} failed: {}", self.function, self.error),
        }
    }
}

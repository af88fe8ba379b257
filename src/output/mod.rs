mod diagnostic;
mod formatter;

pub use diagnostic::{AnalysisFailure, Diagnostic};
pub use formatter::{JsonOutput, OutputFormatter};

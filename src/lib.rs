/// rsalint
///
/// Flags insecure usage of the `crypto/rsa` API in a normalized program IR.
/// A front end lowers source code to functions, basic blocks and call
/// instructions; this crate resolves call arguments to constants or known
/// randomness sources and applies a static rule table to every matching call.
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod ir;
pub mod logging;
pub mod output;
pub mod rules;

pub use analyzer::{AnalysisReport, Analyzer};
pub use config::AnalyzerConfig;
pub use engine::{Resolved, Resolver, UnresolvedSource};
pub use ir::{ArgValue, BasicBlock, CallInst, Function, Instruction, Literal, Position, Program};
pub use output::{AnalysisFailure, Diagnostic};
pub use rules::{Check, RuleEntry, TargetOperation};

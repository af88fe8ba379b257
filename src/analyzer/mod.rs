use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::AnalyzerConfig;
use crate::engine::Resolver;
use crate::error::IrError;
use crate::ir::{CallInst, Function, Program};
use crate::output::{AnalysisFailure, Diagnostic};
use crate::rules::{self, CheckContext, RuleEntry};

pub const NAME: &str = "rsalint";
pub const DOC: &str = "report insecure usage of the \"crypto/rsa\" package";

/// Diagnostics and failures for one or more programs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<AnalysisFailure>,
    pub functions_analyzed: usize,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_findings(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn merge(&mut self, other: AnalysisReport) {
        self.diagnostics.extend(other.diagnostics);
        self.failures.extend(other.failures);
        self.functions_analyzed += other.functions_analyzed;
    }
}

/// Walks the IR and applies the rule table to every matching call.
pub struct Analyzer {
    config: AnalyzerConfig,
    resolver: Resolver,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let resolver = Resolver::from_config(&config);
        Self { config, resolver }
    }

    pub fn with_resolver(config: AnalyzerConfig, resolver: Resolver) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, program: &Program) -> AnalysisReport {
        let source = program.source.as_deref();
        debug!(
            source = source.unwrap_or("<memory>"),
            functions = program.functions.len(),
            parallel = self.config.parallel,
            "analyzing program"
        );

        // Indexed collect keeps function order, so parallel output matches
        // sequential output.
        let outcomes: Vec<Result<Vec<Diagnostic>, IrError>> =
            if self.config.parallel && program.functions.len() > 1 {
                program
                    .functions
                    .par_iter()
                    .map(|function| self.analyze_function(function))
                    .collect()
            } else {
                program
                    .functions
                    .iter()
                    .map(|function| self.analyze_function(function))
                    .collect()
            };

        let mut report = AnalysisReport::new();
        for (function, outcome) in program.functions.iter().zip(outcomes) {
            report.functions_analyzed += 1;
            match outcome {
                Ok(diagnostics) => report.diagnostics.extend(diagnostics),
                Err(err) => {
                    warn!(function = %function.name, error = %err, "abandoning function analysis");
                    report.failures.push(AnalysisFailure {
                        source: source.map(String::from),
                        function: function.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        debug!(
            diagnostics = report.diagnostics.len(),
            failures = report.failures.len(),
            "program analyzed"
        );
        report
    }

    pub fn analyze_programs(&self, programs: &[Program]) -> AnalysisReport {
        programs
            .iter()
            .fold(AnalysisReport::new(), |mut report, program| {
                report.merge(self.analyze(program));
                report
            })
    }

    /// Analyzes one function. Malformed IR abandons the whole function.
    pub fn analyze_function(&self, function: &Function) -> Result<Vec<Diagnostic>, IrError> {
        trace!(function = %function.name, "analyzing function");
        let mut diagnostics = Vec::new();

        for call in function.calls() {
            let Some(rule) = rules::lookup(&call.callee) else {
                continue;
            };
            diagnostics.extend(self.check_call(call, rule)?);
        }

        Ok(diagnostics)
    }

    /// Runs one rule entry against a matching call, in declared check order,
    /// with the unconditional diagnostic last.
    pub fn check_call(&self, call: &CallInst, rule: &RuleEntry) -> Result<Vec<Diagnostic>, IrError> {
        if !call.position.is_valid() {
            return Err(IrError::invalid_position(&call.callee, call.position.clone()));
        }
        if call.args.len() < rule.arity() {
            return Err(IrError::missing_argument(
                &call.callee,
                call.args.len(),
                call.position.clone(),
            ));
        }

        trace!(callee = %call.callee, position = %call.position, "matched call");
        let ctx = CheckContext {
            resolver: &self.resolver,
            config: &self.config,
        };

        let mut diagnostics = Vec::new();
        for check in rule.checks {
            if let Some(diagnostic) = check.evaluate(call, &ctx)? {
                diagnostics.push(diagnostic);
            }
        }

        if let Some(unconditional) = rule.unconditional {
            diagnostics.push(Diagnostic::new(
                call.position.clone(),
                unconditional.code,
                &call.callee,
                unconditional.message,
            ));
        }

        Ok(diagnostics)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

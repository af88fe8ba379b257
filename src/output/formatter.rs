use anyhow::Result;
use serde::Serialize;

use crate::analyzer::{AnalysisReport, NAME};
use crate::cli::OutputFormat;

use super::{AnalysisFailure, Diagnostic};

#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub tool: &'static str,
    pub programs_analyzed: usize,
    pub functions_analyzed: usize,
    pub total_diagnostics: usize,
    pub total_failures: usize,
    pub diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "no_failures")]
    pub failures: &'a [AnalysisFailure],
}

fn no_failures(failures: &&[AnalysisFailure]) -> bool {
    failures.is_empty()
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format(
        report: &AnalysisReport,
        programs_analyzed: usize,
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(Self::format_text(&report.diagnostics)),
            OutputFormat::Json => {
                let output = Self::build_output(report, programs_analyzed);
                Ok(serde_json::to_string_pretty(&output)?)
            }
        }
    }

    /// One `<file>:<line>:<column>: <message>` line per diagnostic.
    pub fn format_text(diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|diagnostic| format!("{diagnostic}\n"))
            .collect()
    }

    pub fn build_output(report: &AnalysisReport, programs_analyzed: usize) -> JsonOutput<'_> {
        JsonOutput {
            tool: NAME,
            programs_analyzed,
            functions_analyzed: report.functions_analyzed,
            total_diagnostics: report.diagnostics.len(),
            total_failures: report.failures.len(),
            diagnostics: &report.diagnostics,
            failures: &report.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Position;

    fn report() -> AnalysisReport {
        AnalysisReport {
            diagnostics: vec![
                Diagnostic::new(
                    Position::new("main.go", 18, 20),
                    "weak-entropy",
                    "crypto/rsa.GenerateKey",
                    "use the crypto/rand.Reader instead for a cryptographically secure random number generator",
                ),
                Diagnostic::new(
                    Position::new("main.go", 18, 20),
                    "weak-bit-size",
                    "crypto/rsa.GenerateKey",
                    "always use 2048 bits or greater",
                ),
            ],
            failures: vec![],
            functions_analyzed: 1,
        }
    }

    #[test]
    fn test_text_format() {
        let text = OutputFormatter::format(&report(), 1, OutputFormat::Text).unwrap();
        assert_eq!(
            text,
            "main.go:18:20: use the crypto/rand.Reader instead for a cryptographically secure random number generator\n\
             main.go:18:20: always use 2048 bits or greater\n"
        );
    }

    #[test]
    fn test_text_format_empty() {
        let text = OutputFormatter::format(&AnalysisReport::new(), 0, OutputFormat::Text).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_json_format() {
        let json = OutputFormatter::format(&report(), 1, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tool"], "rsalint");
        assert_eq!(value["total_diagnostics"], 2);
        assert_eq!(value["diagnostics"][1]["rule"], "weak-bit-size");
        assert_eq!(value["diagnostics"][0]["position"]["line"], 18);
        assert!(value.get("failures").is_none());
    }
}

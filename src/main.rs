use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use rsalint::analyzer::{Analyzer, DOC, NAME};
use rsalint::cli;
use rsalint::config::AnalyzerConfig;
use rsalint::error::IoError;
use rsalint::ir::{self, Program};
use rsalint::logging::{self, Verbosity};
use rsalint::output::OutputFormatter;
use rsalint::rules;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> Result<ExitCode> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    if args.list_rules {
        print_rules();
        return Ok(ExitCode::SUCCESS);
    }

    args.validate().context("Invalid arguments")?;
    let path = args
        .path
        .as_deref()
        .context("--path is required unless --list-rules is given")?;

    let config = match args.config {
        Some(ref config_path) => AnalyzerConfig::load(config_path)
            .with_context(|| format!("Failed to load config: {}", config_path.display()))?,
        None => AnalyzerConfig::default(),
    }
    .with_parallel(args.parallel);
    debug!(?config, "analyzer config");

    let files = ir::discover_ir_files(path)
        .with_context(|| format!("Failed to discover IR files under {}", path.display()))?;
    info!(count = files.len(), path = %path.display(), "discovered IR documents");

    let mut load_failures = 0usize;
    let programs: Vec<Program> = files
        .iter()
        .filter_map(|file| match ir::load_program(file) {
            Ok(program) => Some(program),
            Err(err) => {
                error!(file = %file.display(), error = %err, "failed to load IR document");
                load_failures += 1;
                None
            }
        })
        .collect();

    let analyzer = Analyzer::new(config);
    let report = analyzer.analyze_programs(&programs);
    for failure in &report.failures {
        error!("{failure}");
    }
    info!(
        programs = programs.len(),
        functions = report.functions_analyzed,
        diagnostics = report.diagnostics.len(),
        "{NAME} finished"
    );

    let mut rendered = OutputFormatter::format(&report, programs.len(), args.format)?;
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    match args.output_file {
        Some(ref output_path) => write_output(output_path, &rendered)?,
        None => print!("{rendered}"),
    }

    if load_failures > 0 || report.has_failures() {
        return Ok(ExitCode::from(2));
    }
    if args.fail_on_findings && report.has_findings() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn write_output(path: &Path, rendered: &str) -> Result<()> {
    std::fs::write(path, rendered).map_err(|source| IoError::write_error(path, source))?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

fn print_rules() {
    println!("{NAME}: {DOC}");
    for rule in rules::rules() {
        println!("{}", rule.symbol());
        for check in rule.checks {
            println!("  {:<20} {}", check.code(), check.describe());
        }
        if let Some(unconditional) = rule.unconditional {
            println!("  {:<20} {}", unconditional.code, unconditional.message);
        }
    }
}

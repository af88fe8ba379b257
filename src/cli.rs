use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "rsalint")]
#[command(about = "Report insecure usage of the crypto/rsa package in program IR", long_about = None)]
pub struct Args {
    /// IR document or directory of IR documents (.json, .yaml, .yml)
    #[arg(long, value_name = "PATH", required_unless_present = "list_rules")]
    pub path: Option<PathBuf>,

    /// Analyzer config file overriding thresholds (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'O', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: OutputFormat,

    /// Analyze functions in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Exit with status 1 when any diagnostic is reported
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Print the rule table and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.path {
            validate_path(path)?;
        }
        if let Some(ref config_path) = self.config {
            if !config_path.exists() {
                anyhow::bail!("Config file does not exist: {}", config_path.display());
            }
        }
        Ok(())
    }
}

pub fn validate_path(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    } else if path.is_dir() {
        std::fs::metadata(path)
            .with_context(|| format!("Cannot read directory: {}", path.display()))?;
    } else {
        anyhow::bail!("Path is neither a file nor a directory: {}", path.display());
    }

    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(path: Option<PathBuf>) -> Args {
        Args {
            path,
            config: None,
            output_file: None,
            format: OutputFormat::Text,
            parallel: false,
            fail_on_findings: false,
            list_rules: false,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_output_format_as_str() {
        assert_eq!(OutputFormat::Text.as_str(), "text");
        assert_eq!(OutputFormat::Json.as_str(), "json");
    }

    #[test]
    fn test_validate_path_file_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("main.json");
        fs::write(&file_path, "{}").unwrap();

        assert!(validate_path(&file_path).is_ok());
    }

    #[test]
    fn test_validate_path_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_path(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_validate_path_not_exists() {
        let path = Path::new("/nonexistent/path/that/does/not/exist");
        assert!(validate_path(path).is_err());
    }

    #[test]
    fn test_args_validate_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = args(Some(temp_dir.path().to_path_buf()));
        args.config = Some(temp_dir.path().join("missing.yaml"));

        assert!(args.validate().is_err());
    }

    #[test]
    fn test_args_validate_without_path() {
        let mut args = args(None);
        args.list_rules = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "rsalint",
            "--path",
            "ir",
            "-f",
            "json",
            "--parallel",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.path, Some(PathBuf::from("ir")));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.parallel);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_path_required_without_list_rules() {
        assert!(Args::try_parse_from(["rsalint"]).is_err());
        assert!(Args::try_parse_from(["rsalint", "--list-rules"]).is_ok());
    }
}

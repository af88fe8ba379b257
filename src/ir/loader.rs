use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::Program;
use crate::error::{IoError, IrError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrFormat {
    Json,
    Yaml,
}

impl IrFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str().and_then(|ext| match ext {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Deserializes one IR document. `label` names the document in errors and
/// becomes the program's source when the document does not carry one.
pub fn parse_program(content: &str, format: IrFormat, label: &str) -> Result<Program, IrError> {
    let mut program: Program = match format {
        IrFormat::Json => serde_json::from_str(content)
            .map_err(|e| IrError::parse_error(label, e.to_string()))?,
        IrFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| IrError::parse_error(label, e.to_string()))?,
    };

    if program.source.is_none() {
        program.source = Some(label.to_string());
    }

    debug!(
        source = label,
        format = format.as_str(),
        functions = program.functions.len(),
        calls = program.call_count(),
        "parsed IR document"
    );
    Ok(program)
}

pub fn load_program(path: &Path) -> crate::error::Result<Program> {
    trace!(path = %path.display(), "loading IR document");

    if !path.exists() {
        return Err(IoError::file_not_found(path).into());
    }

    let format = match IrFormat::from_path(path) {
        Some(format) => format,
        None => {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            return Err(IrError::unsupported_format(extension).into());
        }
    };

    let content = fs::read_to_string(path).map_err(|e| IoError::read_error(path, e))?;
    let label = path.display().to_string();
    Ok(parse_program(&content, format, &label)?)
}

/// Collects IR documents under `root`, skipping hidden directories and files.
/// A file path is returned as-is regardless of its extension.
pub fn discover_ir_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        if !root.exists() {
            return Err(IoError::file_not_found(root));
        }
        return Err(IoError::invalid_path(root));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry.map_err(|e| IoError::DirectoryScanError {
            path: root.to_path_buf(),
            source: e,
        })?;

        if entry.file_type().is_file() && IrFormat::from_path(entry.path()).is_some() {
            files.push(entry.path().to_path_buf());
        }
    }

    debug!(root = %root.display(), count = files.len(), "discovered IR documents");
    Ok(files)
}

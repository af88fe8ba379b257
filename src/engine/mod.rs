pub mod sources;
pub mod value;

pub use sources::UnresolvedSource;
pub use value::Resolved;

use std::collections::BTreeSet;
use tracing::trace;

use crate::config::{AnalyzerConfig, SECURE_RANDOM_SOURCE};
use crate::ir::ArgValue;

/// Wrapping layers unwrapped before giving up.
const DEFAULT_MAX_DEPTH: usize = 1;

/// Resolves argument values to something the checks can judge.
///
/// Resolution is a pure query over the IR: it unwraps interface boxing up to
/// `max_depth` layers, recognizes secure randomness accessors by callee
/// symbol, and passes constants through. It never follows data flow beyond
/// what the front end already folded into the argument.
#[derive(Debug, Clone)]
pub struct Resolver {
    secure_sources: BTreeSet<String>,
    max_depth: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        config
            .secure_source_symbols
            .iter()
            .fold(Self::builder().without_defaults(), |builder, symbol| {
                builder.with_secure_source(symbol.clone())
            })
            .build()
    }

    pub fn resolve(&self, value: &ArgValue) -> Resolved {
        let resolved = self.resolve_with_depth(value, 0);
        trace!(resolved = %resolved.describe(), "resolved argument");
        resolved
    }

    fn resolve_with_depth(&self, value: &ArgValue, depth: usize) -> Resolved {
        match value {
            ArgValue::Wrapped { inner } => {
                if depth >= self.max_depth {
                    return Resolved::Unresolved(UnresolvedSource::DepthExceeded);
                }
                self.resolve_with_depth(inner, depth + 1)
            }
            ArgValue::CallResult { callee } if self.secure_sources.contains(callee) => {
                Resolved::SecureSource
            }
            ArgValue::CallResult { callee } => Resolved::CallResult {
                callee: callee.clone(),
            },
            ArgValue::Constant { value } => Resolved::Constant(value.clone()),
            ArgValue::Unresolved { .. } => Resolved::Unresolved(UnresolvedSource::ExternalInput),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn secure_sources(&self) -> impl Iterator<Item = &str> {
        self.secure_sources.iter().map(String::as_str)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ResolverBuilder {
    secure_sources: BTreeSet<String>,
    max_depth: usize,
    include_defaults: bool,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            secure_sources: BTreeSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            include_defaults: true,
        }
    }

    pub fn with_secure_source(mut self, symbol: impl Into<String>) -> Self {
        self.secure_sources.insert(symbol.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn without_defaults(mut self) -> Self {
        self.include_defaults = false;
        self
    }

    pub fn build(mut self) -> Resolver {
        if self.include_defaults {
            self.secure_sources.insert(SECURE_RANDOM_SOURCE.to_string());
        }

        Resolver {
            secure_sources: self.secure_sources,
            max_depth: self.max_depth,
        }
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

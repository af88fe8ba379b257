/// Why an argument could not be resolved to something a check can judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnresolvedSource {
    /// The front end marked the value as an opaque external input.
    ExternalInput,
    /// More wrapping layers than the resolution budget allows.
    DepthExceeded,
}

impl UnresolvedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExternalInput => "external_input",
            Self::DepthExceeded => "depth_exceeded",
        }
    }
}

impl std::fmt::Display for UnresolvedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<UnresolvedSource> for String {
    fn from(source: UnresolvedSource) -> Self {
        source.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_as_str() {
        assert_eq!(UnresolvedSource::ExternalInput.as_str(), "external_input");
        assert_eq!(UnresolvedSource::DepthExceeded.as_str(), "depth_exceeded");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(
            format!("{}", UnresolvedSource::DepthExceeded),
            "depth_exceeded"
        );
    }
}

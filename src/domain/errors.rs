use crate::domain::chart::SeriesKind;

/// Chart error taxonomy.
///
/// Capability and style-source failures are absorbed where they happen and
/// only reach the log; `Mount` and `Config` are the variants a caller sees.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    CapabilityUnavailable { kind: SeriesKind, strategy: &'static str },
    StyleSourceUnavailable(String),
    Mount(String),
    Config(String),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::CapabilityUnavailable { kind, strategy } => {
                write!(f, "Capability Unavailable: {} series via {}", kind, strategy)
            }
            ChartError::StyleSourceUnavailable(name) => {
                write!(f, "Style Source Unavailable: {}", name)
            }
            ChartError::Mount(msg) => write!(f, "Mount Error: {}", msg),
            ChartError::Config(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Config(err.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;

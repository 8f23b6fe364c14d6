use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputUnreadable,
    MalformedGraph,
    NodeOutOfRange,
    GraphTooLarge,
    NegativeCycle,
    ConfigParseError,
    OutputWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputUnreadable => "E1001",
            Self::MalformedGraph => "E1002",
            Self::NodeOutOfRange => "E1003",
            Self::GraphTooLarge => "E1004",
            Self::NegativeCycle => "E2001",
            Self::ConfigParseError => "E3001",
            Self::OutputWriteFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputUnreadable => "Input file not found or unreadable",
            Self::MalformedGraph => "Malformed graph description",
            Self::NodeOutOfRange => "Edge references an unknown node",
            Self::GraphTooLarge => "Graph too large for all-pairs tables",
            Self::NegativeCycle => "Graph has a negative weight cycle",
            Self::ConfigParseError => "Config file parse error",
            Self::OutputWriteFailed => "Output file write failed",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputUnreadable => Some("Check the input path and its read permissions."),
            Self::MalformedGraph => {
                Some("Expected a `N M` header followed by M lines of `u v weight`.")
            }
            Self::NodeOutOfRange => Some("Node ids are 1-based and must not exceed N."),
            Self::GraphTooLarge => {
                Some("Check the node count in the header; N² pairs are stored.")
            }
            Self::NegativeCycle => {
                Some("Shortest paths are undefined; remove or reweight the cycle's edges.")
            }
            Self::ConfigParseError => Some("Fix syntax in between.toml and retry."),
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while reading or building a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The input source could not be opened or read.
    #[error("cannot read graph from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A header or edge line could not be parsed.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The header announced more edges than the input contains.
    #[error("expected {expected} edges, found {found}")]
    MissingEdges { expected: usize, found: usize },

    /// An edge endpoint is outside `[0, node_count)`.
    #[error("node {node} out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    /// `node_count²` per-pair entries cannot be addressed.
    #[error("{node_count} nodes is too many: all-pairs tables would not fit in memory")]
    TooManyNodes { node_count: usize },
}

impl GraphError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::InputUnreadable,
            Self::Parse { .. } | Self::MissingEdges { .. } => ErrorCode::MalformedGraph,
            Self::NodeOutOfRange { .. } => ErrorCode::NodeOutOfRange,
            Self::TooManyNodes { .. } => ErrorCode::GraphTooLarge,
        }
    }
}

/// Errors raised by the shortest-path engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// At least one node lies on a cycle of negative total weight.
    ///
    /// `nodes` holds the 0-based indices detected on or behind the cycle.
    #[error("negative weight cycle through {} node(s)", nodes.len())]
    NegativeCycle { nodes: Vec<usize> },
}

impl EngineError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NegativeCycle { .. } => ErrorCode::NegativeCycle,
        }
    }
}

/// Top-level error for the read → compute → write pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CentralityError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The result file could not be written.
    #[error("cannot write results to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CentralityError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Graph(err) => err.code(),
            Self::Engine(err) => err.code(),
            Self::Write { .. } => ErrorCode::OutputWriteFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::InputUnreadable,
            ErrorCode::MalformedGraph,
            ErrorCode::NodeOutOfRange,
            ErrorCode::GraphTooLarge,
            ErrorCode::NegativeCycle,
            ErrorCode::ConfigParseError,
            ErrorCode::OutputWriteFailed,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::NegativeCycle.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn pipeline_error_keeps_engine_code() {
        let err = CentralityError::from(EngineError::NegativeCycle { nodes: vec![0, 2] });
        assert_eq!(err.code(), ErrorCode::NegativeCycle);
        assert_eq!(err.to_string(), "negative weight cycle through 2 node(s)");
    }
}

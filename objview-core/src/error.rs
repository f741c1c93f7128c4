//! Error types for model loading and view manipulation

use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ObjviewError>;

/// Errors raised while reading OBJ text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("malformed vertex on line {line}: {content:?}")]
    MalformedVertex { line: usize, content: String },

    #[error("malformed face on line {line}: {content:?}")]
    MalformedFace { line: usize, content: String },

    #[error("face on line {line} references vertex {index} but only {vertex_count} are defined")]
    FaceIndexOutOfRange {
        line: usize,
        index: usize,
        vertex_count: usize,
    },
}

impl ParseError {
    /// 1-based line number the error was raised on
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedVertex { line, .. }
            | ParseError::MalformedFace { line, .. }
            | ParseError::FaceIndexOutOfRange { line, .. } => *line,
        }
    }
}

/// Errors raised by view state setters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("scale must be finite and positive, got {0}")]
    InvalidScale(f64),
}

/// Errors raised while reading a viewer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Any error the core can produce
#[derive(Error, Debug)]
pub enum ObjviewError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

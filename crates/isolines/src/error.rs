//! Error types for isoline extraction.

use thiserror::Error;

/// Errors that can occur while building isolines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IsolineError {
    /// The edge resolver was handed a cell whose corner values do not
    /// bracket the level being traced.
    #[error("level {level} lies outside the cell value range [{min}, {max}]")]
    LevelOutsideCell { level: f64, min: f64, max: f64 },

    /// Saddle-cell subdivision did not reach an exit edge within its budget.
    #[error("ambiguous cell unresolved after {iterations} iterations; grid too coarse for the field")]
    SaddleUnresolved { iterations: usize },

    /// Edge interpolation produced a ratio outside `[0, 1]`.
    #[error("edge interpolation ratio {ratio} outside [0, 1]")]
    InterpolationOutOfRange { ratio: f64 },

    /// A sub-cell produced no exit for the edge it was entered through.
    #[error("inconsistent cell: {0}")]
    InconsistentCell(String),

    /// A build was requested before a data source was attached.
    #[error("no data source attached to the isoline builder")]
    MissingDataSource,

    /// The scalar field is malformed.
    #[error("invalid scalar field: {0}")]
    InvalidField(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Tracing a specific level failed.
    #[error("failed to trace level {level}: {source}")]
    LevelFailed {
        level: f64,
        #[source]
        source: Box<IsolineError>,
    },
}

impl IsolineError {
    /// Create an InvalidField error.
    pub fn invalid_field(msg: impl Into<String>) -> Self {
        Self::InvalidField(msg.into())
    }

    /// Create an InconsistentCell error.
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::InconsistentCell(msg.into())
    }

    /// Attach the level being traced to an error.
    pub fn at_level(self, level: f64) -> Self {
        match self {
            already @ Self::LevelFailed { .. } => already,
            other => Self::LevelFailed {
                level,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping level context.
    pub fn root_cause(&self) -> &IsolineError {
        match self {
            Self::LevelFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for isoline operations.
pub type Result<T> = std::result::Result<T, IsolineError>;

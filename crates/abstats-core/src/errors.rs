use thiserror::Error;

/// Errors that can occur during statistical computations
#[derive(Error, Debug)]
pub enum StatsError {
    // Input validation errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    #[error("Column '{column}' is not a {expected} column")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("Could not parse '{value}' as {target}")]
    ValueParse { value: String, target: &'static str },

    // Numerical errors
    #[error("Reference distribution error: {0}")]
    Distribution(String),

    #[error("Date arithmetic out of range: {0}")]
    DateRange(String),
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

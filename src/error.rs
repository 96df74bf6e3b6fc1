use thiserror::Error;

/// Errors surfaced to the user by a session command.
///
/// Validation failures carry enough context for the status bar; loader and
/// exporter failures wrap the `anyhow` chain built by the plumbing code.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No dataset loaded – upload a CSV or Excel file first")]
    NoDataset,

    #[error("Unsupported file extension: .{0} (expected .csv or .xlsx)")]
    UnsupportedFormat(String),

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("No numeric feature columns remain besides target '{target}'")]
    NoFeatures { target: String },

    #[error("Insufficient data: {rows} rows (need at least {needed})")]
    InsufficientData { rows: usize, needed: usize },

    #[error("Column '{0}' contains missing values – run Clean first")]
    MissingValues(String),

    #[error("ANOVA needs at least 2 groups, found {0}")]
    TooFewGroups(usize),

    #[error("Group '{0}' has no numeric values")]
    EmptyGroup(String),

    #[error("Column '{0}' has no values to plot")]
    EmptySample(String),

    #[error("All groups are constant with equal means; F is undefined")]
    DegenerateInput,

    #[error("Numerical failure: {0}")]
    Numerical(String),

    #[error("Load failed: {0:#}")]
    Load(anyhow::Error),

    #[error("Export failed: {0:#}")]
    Export(anyhow::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

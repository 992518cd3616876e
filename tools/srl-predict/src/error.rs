use thiserror::Error;

/// Errors raised while loading an archive or running predictions.
#[derive(Error, Debug)]
pub enum SrlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive {0} has no config.json")]
    MissingConfig(String),

    #[error("the given model is not for srl (model type: {0})")]
    WrongModelType(String),

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("predictor command is empty")]
    EmptyCommand,

    #[error("predictor failed ({status}): {stderr}")]
    PredictorFailed { status: String, stderr: String },

    #[error("predictor returned {got} predictions for {expected} inputs")]
    PredictionCount { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, SrlError>;

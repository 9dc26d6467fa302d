#[derive(Debug, thiserror::Error)]
pub enum BackorderError {
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("failed to read input: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

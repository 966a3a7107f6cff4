use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(String),

    /// The source answered but returned no rows.
    #[error("empty: {0}")]
    EmptyData(String),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("all candidates failed: {last}")]
    AllCandidatesFailed { candidates: Vec<String>, last: String },

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("deadline of {0}s exceeded")]
    Timeout(u64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for the judging client.

use thiserror::Error;

use tally_core::Category;

/// Result type alias for API client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from talking to the judging API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBase(String),

    #[error("connect to {authority} failed: {source}")]
    Connect {
        authority: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http error: {0}")]
    Http(String),

    /// The server answered with an error body.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Result type alias for scoring session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors from the scoring session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no judge selected")]
    NoJudgeSelected,

    #[error("saved scores not loaded")]
    SheetNotLoaded,

    #[error("judge name required")]
    BlankJudgeName,

    #[error("judge already exists")]
    DuplicateJudge,

    #[error("unknown judge: {0}")]
    UnknownJudge(String),

    #[error("unknown contestant: {0}")]
    UnknownContestant(i64),

    #[error("unknown {category} criterion: {name}")]
    UnknownCriterion { category: Category, name: String },

    #[error("score {score} out of range for {criteria} (max {max})")]
    ScoreOutOfRange {
        criteria: String,
        score: f64,
        max: u8,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FiretruckError {
    #[error("Could not find {kind} with id: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Contract with id {id} is not in an initial state ({event_count} events applied)")]
    NotInitialState { id: String, event_count: i64 },

    #[error(
        "Error when applying event {index} ({applied} applied before it):\n{event}\nResponse was:\n{response}"
    )]
    Apply {
        index: usize,
        applied: usize,
        event: String,
        response: String,
    },

    #[error("Bad response from server: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Api(String),
}

impl FiretruckError {
    pub fn contract_not_found(id: impl Into<String>) -> Self {
        FiretruckError::NotFound {
            kind: "contract",
            id: id.into(),
        }
    }

    pub fn declaration_not_found(id: impl Into<String>) -> Self {
        FiretruckError::NotFound {
            kind: "declaration",
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FiretruckError>;

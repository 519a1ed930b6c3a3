use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaffError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StaffError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StaffError::NotFound { entity, id: id.into() }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        StaffError::InvalidInput(msg.into())
    }
}

pub type StaffResult<T> = Result<T, StaffError>;

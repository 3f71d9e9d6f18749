use thiserror::Error;

use crate::domain::SessionStatus;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Session {0} is not owned by the caller")]
    Forbidden(i32),
    #[error("Invalid transition: session {id} is {status}")]
    InvalidTransition { id: i32, status: SessionStatus },
}

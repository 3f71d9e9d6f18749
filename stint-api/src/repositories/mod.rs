mod repo_error;
mod session_repo;
mod user_repo;

pub use repo_error::RepositoryError;
pub use session_repo::{SessionRepository, SessionRepositoryImpl};
pub use user_repo::{NewUser, UserRepository, UserRepositoryImpl};

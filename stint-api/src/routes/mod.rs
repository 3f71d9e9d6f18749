pub mod error;
pub mod github;
pub mod sessions;

pub use error::ApiError;

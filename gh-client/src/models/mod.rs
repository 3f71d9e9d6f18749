mod author;
mod comment;
mod issue;
mod organization;
mod repository;

pub use author::Author;
pub use comment::IssueComment;
pub use issue::Issue;
pub use organization::Organization;
pub use repository::Repository;

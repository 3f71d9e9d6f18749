mod session;
mod user;

pub use session::{NewWorkSession, SessionStatus, WorkSession};
pub use user::User;

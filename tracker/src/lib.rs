mod format;
mod gateway;
mod issue;
mod persist;
mod store;
mod ticker;

pub use format::{comment_body, format_hms, format_hours, format_summary};
pub use gateway::ApiCommentGateway;
pub use issue::TrackedIssue;
pub use persist::{load_snapshot, save_snapshot, snapshot_path, Snapshot};
pub use store::{CommentError, CommentGateway, NewIssue, TrackerStore};
pub use ticker::Ticker;

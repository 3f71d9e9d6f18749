use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: i64,
    pub login: String,
    pub avatar_url: Option<String>,
}

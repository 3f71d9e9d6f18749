use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub id: i64,
    pub login: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
}

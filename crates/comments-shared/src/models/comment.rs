use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a comment body, in characters.
pub const MAX_CONTENT_LEN: usize = 1000;

/// Maximum length of an author's display name, in characters.
pub const MAX_USER_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

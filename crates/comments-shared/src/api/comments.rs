use serde::{Deserialize, Serialize};

use crate::models::Comment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub task_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
}

/// Body of `PUT /comments/:id`. The backend treats task, author and
/// display name as write-once, so only the content travels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

impl From<&Comment> for UpdateCommentRequest {
    fn from(comment: &Comment) -> Self {
        Self {
            content: comment.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub total_records: u64,
}

/// Response of `GET /comments/all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPage {
    pub data: Vec<Comment>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Some endpoints answer with `{ "data": ... }`, others with the bare value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

use comments_shared::{
    api::{CommentFilters, CommentPage, CreateCommentRequest, Envelope, UpdateCommentRequest},
    Comment,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Which call failed; decides the message shown when the server gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchList,
    FetchOne,
    Create,
    Update,
    Delete,
    Health,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::FetchList => "Failed to fetch comments",
            Operation::FetchOne => "Failed to fetch comment",
            Operation::Create => "Failed to create comment",
            Operation::Update => "Failed to update comment",
            Operation::Delete => "Failed to delete comment",
            Operation::Health => "Health check failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    #[error("{message}")]
    Network {
        message: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    fn network(op: Operation) -> impl FnOnce(reqwest::Error) -> ApiError {
        move |source| ApiError::Network {
            message: op.fallback_message(),
            source,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Validation(_) | ApiError::Network { .. } => None,
        }
    }
}

/// Error body the backend sends alongside non-2xx statuses.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|msg| !msg.trim().is_empty())
}

/// HTTP client for the comments backend. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build URL for endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handle a response carrying a JSON body
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        op: Operation,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(ApiError::network(op));
        }

        Err(Self::error_from(response, op).await)
    }

    /// Handle a response whose body is ignored
    async fn handle_empty_response(
        &self,
        response: reqwest::Response,
        op: Operation,
    ) -> Result<(), ApiError> {
        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::error_from(response, op).await)
    }

    async fn error_from(response: reqwest::Response, op: Operation) -> ApiError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = server_message(&text).unwrap_or_else(|| op.fallback_message().to_string());

        tracing::warn!(%status, %message, ?op, "request failed");

        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(message)
            }
            _ => ApiError::Server { status, message },
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, op: Operation) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::network(op))?;
        self.handle_response(response, op).await
    }

    // ============ Comments ============

    /// `GET /comments/all` with the full filter set. Empty filters are sent
    /// as empty values; the backend reads them as "no filter".
    pub async fn list_comments(&self, filters: &CommentFilters) -> Result<CommentPage, ApiError> {
        let url = format!("{}?{}", self.url("/comments/all"), query_string(filters));
        self.get(&url, Operation::FetchList).await
    }

    pub async fn list_all_comments(&self) -> Result<Vec<Comment>, ApiError> {
        let envelope: Envelope<Vec<Comment>> =
            self.get(&self.url("/comments"), Operation::FetchList).await?;
        Ok(envelope.into_inner())
    }

    pub async fn list_task_comments(&self, task_id: &str) -> Result<Vec<Comment>, ApiError> {
        let url = self.url(&format!("/comments/task/{}", urlencoding::encode(task_id)));
        let envelope: Envelope<Vec<Comment>> = self.get(&url, Operation::FetchList).await?;
        Ok(envelope.into_inner())
    }

    pub async fn get_comment(&self, id: &str) -> Result<Comment, ApiError> {
        let url = self.url(&format!("/comments/{}", urlencoding::encode(id)));
        let envelope: Envelope<Comment> = self.get(&url, Operation::FetchOne).await?;
        Ok(envelope.into_inner())
    }

    pub async fn create_comment(&self, req: &CreateCommentRequest) -> Result<Comment, ApiError> {
        let url = self.url("/comments");
        tracing::debug!(%url, task_id = %req.task_id, "POST");

        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(ApiError::network(Operation::Create))?;
        let envelope: Envelope<Comment> = self.handle_response(response, Operation::Create).await?;
        Ok(envelope.into_inner())
    }

    /// `PUT /comments/:id`. Only the content is transmitted.
    pub async fn update_comment(
        &self,
        id: &str,
        req: &UpdateCommentRequest,
    ) -> Result<Comment, ApiError> {
        let url = self.url(&format!("/comments/{}", urlencoding::encode(id)));
        tracing::debug!(%url, "PUT");

        let response = self
            .client
            .put(&url)
            .json(req)
            .send()
            .await
            .map_err(ApiError::network(Operation::Update))?;
        let envelope: Envelope<Comment> = self.handle_response(response, Operation::Update).await?;
        Ok(envelope.into_inner())
    }

    pub async fn delete_comment(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/comments/{}", urlencoding::encode(id)));
        tracing::debug!(%url, "DELETE");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(ApiError::network(Operation::Delete))?;
        self.handle_empty_response(response, Operation::Delete).await
    }

    // ============ Health ============

    pub async fn health_check(&self) -> Result<(), ApiError> {
        let url = self.url("/health");
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::network(Operation::Health))?;
        self.handle_empty_response(response, Operation::Health).await
    }
}

/// Query string for `GET /comments/all`, in the order the backend documents.
pub fn query_string(filters: &CommentFilters) -> String {
    let query_parts = [
        format!("search={}", urlencoding::encode(&filters.search)),
        format!("taskId={}", urlencoding::encode(&filters.task_id)),
        format!("sortBy={}", filters.sort_by.as_str()),
        format!("sortOrder={}", filters.sort_order.as_str()),
        format!("page={}", filters.page),
        format!("limit={}", filters.limit),
    ];
    query_parts.join("&")
}

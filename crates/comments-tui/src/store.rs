//! Client-side copy of the comment collection.
//!
//! [`CommentStore`] owns the fetched page, the active filters and the
//! loading/error flags. Every mutation goes through the API and is followed
//! by a full re-fetch with the current filters rather than a local patch, so
//! the page always reflects server-side sort, filter and pagination.
//!
//! List requests are numbered. A response is applied only if no newer list
//! request has been issued since, so a slow request issued before a fast one
//! can never overwrite fresher results.

use comments_shared::{
    api::{CommentFilters, CommentPage, CreateCommentRequest, FilterPatch, Pagination, UpdateCommentRequest},
    Comment,
};

use crate::api::{ApiClient, ApiError};

/// One in-flight list request: its sequence number and the filters it was
/// issued with. The filters become the store's filters if it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub filters: CommentFilters,
}

#[derive(Debug, Default)]
pub struct CommentStore {
    pub comments: Vec<Comment>,
    pub pagination: Pagination,
    pub filters: CommentFilters,
    pub loading: bool,
    pub error: Option<String>,
    issued_seq: u64,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filters without fetching.
    pub fn set_filters(&mut self, filters: CommentFilters) {
        self.filters = filters;
    }

    /// Start a list request for the current filters overlaid with `patch`.
    pub fn begin_fetch(&mut self, patch: &FilterPatch) -> FetchTicket {
        self.issued_seq += 1;
        self.loading = true;
        self.error = None;
        tracing::debug!(seq = self.issued_seq, refresh = patch.is_empty(), "issuing comments request");

        FetchTicket {
            seq: self.issued_seq,
            filters: self.filters.merge(patch),
        }
    }

    /// Apply the outcome of a list request. Returns false when the response
    /// was discarded because a newer request has been issued since.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<CommentPage, ApiError>,
    ) -> bool {
        if ticket.seq != self.issued_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued_seq,
                "discarding superseded comments response"
            );
            return false;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                tracing::debug!(
                    seq = ticket.seq,
                    count = page.data.len(),
                    total = page.pagination.total_records,
                    "comments loaded"
                );
                self.comments = page.data;
                self.pagination = page.pagination;
                self.filters = ticket.filters;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, error = %e, "failed to fetch comments");
                self.error = Some(e.to_string());
            }
        }

        true
    }

    /// Fetch the list with `patch` overlaid on the current filters and wait
    /// for the result.
    pub async fn fetch_comments(&mut self, api: &ApiClient, patch: &FilterPatch) {
        let ticket = self.begin_fetch(patch);
        let result = api.list_comments(&ticket.filters).await;
        self.finish_fetch(ticket, result);
    }

    pub async fn refresh(&mut self, api: &ApiClient) {
        self.fetch_comments(api, &FilterPatch::default()).await;
    }

    pub async fn create_comment(
        &mut self,
        api: &ApiClient,
        req: &CreateCommentRequest,
    ) -> Result<Comment, ApiError> {
        let created = api.create_comment(req).await?;
        tracing::info!(id = %created.id, task_id = %created.task_id, "comment created");
        self.refresh(api).await;
        Ok(created)
    }

    pub async fn update_comment(
        &mut self,
        api: &ApiClient,
        id: &str,
        req: &UpdateCommentRequest,
    ) -> Result<Comment, ApiError> {
        let updated = api.update_comment(id, req).await?;
        tracing::info!(%id, "comment updated");
        self.refresh(api).await;
        Ok(updated)
    }

    pub async fn delete_comment(&mut self, api: &ApiClient, id: &str) -> Result<(), ApiError> {
        api.delete_comment(id).await?;
        tracing::info!(%id, "comment deleted");
        self.refresh(api).await;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Comment> {
        self.comments.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

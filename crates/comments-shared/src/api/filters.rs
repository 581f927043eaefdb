use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unsupported page size: {0}")]
    PageSize(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    UserName,
    TaskId,
}

impl SortBy {
    /// Query-string value understood by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "createdAt",
            SortBy::UserName => "userName",
            SortBy::TaskId => "taskId",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "Date Created",
            SortBy::UserName => "User Name",
            SortBy::TaskId => "Task ID",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortBy::CreatedAt => SortBy::UserName,
            SortBy::UserName => SortBy::TaskId,
            SortBy::TaskId => SortBy::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Asc => "Ascending",
            SortOrder::Desc => "Descending",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Results per page. The backend only ever sees one of these values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [PageSize::Five, PageSize::Ten, PageSize::Twenty, PageSize::Fifty];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PageSize::Five => PageSize::Ten,
            PageSize::Ten => PageSize::Twenty,
            PageSize::Twenty => PageSize::Fifty,
            PageSize::Fifty => PageSize::Five,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = FilterError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(FilterError::PageSize(value))
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Parameters of `GET /comments/all`.
///
/// Every setter except [`CommentFilters::with_page`] resets `page` to 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFilters {
    pub page: u32,
    pub limit: PageSize,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub search: String,
    pub task_id: String,
}

impl Default for CommentFilters {
    fn default() -> Self {
        Self {
            page: 1,
            limit: PageSize::Ten,
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Desc,
            search: String::new(),
            task_id: String::new(),
        }
    }
}

impl CommentFilters {
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    pub fn with_limit(&self, limit: PageSize) -> Self {
        Self {
            limit,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_sort_by(&self, sort_by: SortBy) -> Self {
        Self {
            sort_by,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_sort_order(&self, sort_order: SortOrder) -> Self {
        Self {
            sort_order,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_task_id(&self, task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            page: 1,
            ..self.clone()
        }
    }

    /// Overlay the fields set in `patch` onto a copy of these filters.
    pub fn merge(&self, patch: &FilterPatch) -> Self {
        Self {
            page: patch.page.unwrap_or(self.page),
            limit: patch.limit.unwrap_or(self.limit),
            sort_by: patch.sort_by.unwrap_or(self.sort_by),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
            search: patch.search.clone().unwrap_or_else(|| self.search.clone()),
            task_id: patch.task_id.clone().unwrap_or_else(|| self.task_id.clone()),
        }
    }
}

/// Partial override of [`CommentFilters`]; unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub page: Option<u32>,
    pub limit: Option<PageSize>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
    pub task_id: Option<String>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        *self == FilterPatch::default()
    }
}

impl From<CommentFilters> for FilterPatch {
    fn from(filters: CommentFilters) -> Self {
        Self {
            page: Some(filters.page),
            limit: Some(filters.limit),
            sort_by: Some(filters.sort_by),
            sort_order: Some(filters.sort_order),
            search: Some(filters.search),
            task_id: Some(filters.task_id),
        }
    }
}

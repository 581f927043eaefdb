//! Page-number navigation derived from the server's pagination snapshot.

use std::ops::RangeInclusive;

use comments_shared::api::Pagination;

/// Most page numbers shown at once.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Page numbers to display: up to [`MAX_VISIBLE_PAGES`] centered on
/// `current`, shifted to stay inside `1..=total`.
pub fn page_window(current: u32, total: u32) -> RangeInclusive<u32> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total);

    if end - start + 1 < MAX_VISIBLE_PAGES {
        start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
    }

    start..=end
}

/// Targets of the First/Previous/Next/Last controls, `None` when disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub current: u32,
    pub total: u32,
    pub total_records: u64,
    pub first: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: Option<u32>,
    pub window: Vec<u32>,
}

impl PageControls {
    /// Controls for a snapshot, or `None` when there is a single page or
    /// nothing at all to navigate.
    pub fn from_pagination(pagination: &Pagination) -> Option<Self> {
        if pagination.total_pages <= 1 {
            return None;
        }

        let total = pagination.total_pages;
        let current = pagination.current_page.clamp(1, total);
        let prev_enabled = pagination.has_prev_page;
        let next_enabled = pagination.has_next_page;

        Some(Self {
            current,
            total,
            total_records: pagination.total_records,
            first: prev_enabled.then_some(1),
            prev: prev_enabled.then(|| current - 1).filter(|p| *p >= 1),
            next: next_enabled.then(|| current + 1).filter(|p| *p <= total),
            last: next_enabled.then_some(total),
            window: page_window(current, total).collect(),
        })
    }

    /// The `n`-th (1-based) page number in the visible window.
    pub fn window_page(&self, n: usize) -> Option<u32> {
        n.checked_sub(1).and_then(|i| self.window.get(i).copied())
    }

    /// Whether `page` is a valid navigation target.
    pub fn accepts(&self, page: u32) -> bool {
        (1..=self.total).contains(&page)
    }
}

use std::time::Instant;

use anyhow::Result;
use comments_shared::{
    api::{CommentFilters, CommentPage, FilterPatch},
    Comment,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError};
use crate::editor::launch_external_editor;
use crate::form::{CommentForm, FormField, Submission};
use crate::input::InputGate;
use crate::pagination::PageControls;
use crate::store::{CommentStore, FetchTicket};
use crate::toast::Toasts;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    CommentsLoaded {
        ticket: FetchTicket,
        result: Result<CommentPage, ApiError>,
    },
}

/// Where typed characters go when no form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    TaskFilter,
}

/// The form region: hidden, creating a comment, or editing one.
#[derive(Debug)]
pub enum FormState {
    Hidden,
    Create(CommentForm),
    Edit { comment: Comment, form: CommentForm },
}

impl FormState {
    pub fn form(&self) -> Option<&CommentForm> {
        match self {
            FormState::Hidden => None,
            FormState::Create(form) | FormState::Edit { form, .. } => Some(form),
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut CommentForm> {
        match self {
            FormState::Hidden => None,
            FormState::Create(form) | FormState::Edit { form, .. } => Some(form),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Hidden)
    }

    pub fn editing(&self) -> Option<&Comment> {
        match self {
            FormState::Edit { comment, .. } => Some(comment),
            _ => None,
        }
    }
}

pub struct App {
    pub api: ApiClient,
    pub store: CommentStore,

    // Form region
    pub form: FormState,
    pub form_loading: bool,
    pub form_error: Option<String>,

    // List state
    pub focus: Focus,
    pub selected: usize,
    /// The comment awaiting a yes/no; kept whole so a reload cannot swap it.
    pub confirming_delete: Option<Comment>,

    pub toasts: Toasts,
    pub needs_terminal_clear: bool,
    /// Shared with the input task; closed while `$EDITOR` owns the terminal.
    pub input_gate: InputGate,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            store: CommentStore::new(),
            form: FormState::Hidden,
            form_loading: false,
            form_error: None,
            focus: Focus::List,
            selected: 0,
            confirming_delete: None,
            toasts: Toasts::default(),
            needs_terminal_clear: false,
            input_gate: InputGate::default(),
        }
    }

    /// First load with the default filters.
    pub fn start(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.spawn_fetch(FilterPatch::default(), tx);
    }

    /// Issue a list request in the background; the result comes back as
    /// [`AppEvent::CommentsLoaded`].
    fn spawn_fetch(&mut self, patch: FilterPatch, tx: mpsc::Sender<AppEvent>) {
        let ticket = self.store.begin_fetch(&patch);
        let api = self.api.clone();

        tokio::spawn(async move {
            let result = api.list_comments(&ticket.filters).await;
            let _ = tx.send(AppEvent::CommentsLoaded { ticket, result }).await;
        });
    }

    pub fn on_comments_loaded(&mut self, ticket: FetchTicket, result: Result<CommentPage, ApiError>) {
        if self.store.finish_fetch(ticket, result) {
            self.selected = self.selected.min(self.store.comments.len().saturating_sub(1));
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.toasts.prune(now);
    }

    // ============ Filters & pages ============

    /// Commit `filters` and fetch with exactly those values.
    pub fn apply_filters(&mut self, filters: CommentFilters, tx: mpsc::Sender<AppEvent>) {
        self.store.set_filters(filters.clone());
        self.selected = 0;
        self.spawn_fetch(FilterPatch::from(filters), tx);
    }

    pub fn change_page(&mut self, page: u32, tx: mpsc::Sender<AppEvent>) {
        let Some(controls) = self.page_controls() else {
            return;
        };
        if !controls.accepts(page) || page == controls.current {
            return;
        }

        let filters = self.store.filters.with_page(page);
        self.apply_filters(filters, tx);
    }

    pub fn reset_filters(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.apply_filters(CommentFilters::default(), tx);
        self.toasts.info("Filters reset to default");
    }

    pub fn refresh(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.spawn_fetch(FilterPatch::default(), tx);
    }

    // ============ Form ============

    pub fn open_create_form(&mut self) {
        self.form = FormState::Create(CommentForm::create());
        self.form_error = None;
    }

    pub fn open_edit_form(&mut self) {
        let Some(comment) = self.selected_comment().cloned() else {
            return;
        };
        self.form = FormState::Edit {
            form: CommentForm::edit(&comment),
            comment,
        };
        self.form_error = None;
    }

    pub fn cancel_form(&mut self) {
        self.form = FormState::Hidden;
        self.form_error = None;
        self.toasts.info("Operation cancelled");
    }

    /// Validate the open form and send it. Invalid forms never reach the
    /// network; failed requests keep the form open with the error shown.
    pub async fn submit_form(&mut self) {
        let Some(form) = self.form.form_mut() else {
            return;
        };
        let submission = match form.submit() {
            Ok(submission) => submission,
            Err(errors) => {
                for error in errors.iter() {
                    self.toasts.validation_error(format!("{}!", error));
                }
                return;
            }
        };

        let editing_id = self.form.editing().map(|c| c.id.clone());

        self.form_loading = true;
        self.form_error = None;

        let (action, result) = match (submission, editing_id) {
            (Submission::Create(req), _) => (
                "create",
                self.store.create_comment(&self.api, &req).await.map(drop),
            ),
            (Submission::Update(req), Some(id)) => (
                "update",
                self.store.update_comment(&self.api, &id, &req).await.map(drop),
            ),
            (Submission::Update(_), None) => {
                self.form_loading = false;
                return;
            }
        };

        self.form_loading = false;

        match result {
            Ok(()) => {
                self.form = FormState::Hidden;
                self.toasts.success(format!("Comment {}d successfully!", action));
            }
            Err(e) => {
                self.form_error = Some(e.to_string());
                self.toasts.error(format!("Failed to {} comment: {}", action, e));
            }
        }
    }

    fn edit_content_externally(&mut self) {
        self.edit_content_with(launch_external_editor);
    }

    /// Run `launch` on the form content with terminal input paused.
    fn edit_content_with(&mut self, launch: impl FnOnce(&str) -> Result<String>) {
        let Some(form) = self.form.form_mut() else {
            return;
        };

        let paused = self.input_gate.pause();
        let launched = launch(form.content().as_str());
        drop(paused);

        match launched {
            Ok(content) => form.set_content(&content),
            Err(e) => self.toasts.error(format!("Editor failed: {}", e)),
        }
        self.needs_terminal_clear = true;
    }

    // ============ Delete ============

    pub fn request_delete(&mut self) {
        if let Some(comment) = self.selected_comment() {
            self.confirming_delete = Some(comment.clone());
        }
    }

    pub fn cancel_delete(&mut self) {
        if self.confirming_delete.take().is_some() {
            self.toasts.info("Delete cancelled");
        }
    }

    /// The pending confirmation is consumed before the request goes out, so
    /// a repeated confirm is a no-op.
    pub async fn confirm_delete(&mut self) {
        let Some(comment) = self.confirming_delete.take() else {
            return;
        };

        match self.store.delete_comment(&self.api, &comment.id).await {
            Ok(()) => self.toasts.success("Comment deleted successfully!"),
            Err(e) => self.toasts.error(format!("Failed to delete comment: {}", e)),
        }
    }

    // ============ Queries for the view ============

    pub fn selected_comment(&self) -> Option<&Comment> {
        self.store.get(self.selected)
    }

    pub fn page_controls(&self) -> Option<PageControls> {
        PageControls::from_pagination(&self.store.pagination)
    }

    /// Page controls under a settled, non-empty list. Hidden while loading
    /// and while the error panel is up.
    pub fn visible_page_controls(&self) -> Option<PageControls> {
        if self.store.loading || self.store.error.is_some() || self.store.is_empty() {
            return None;
        }
        self.page_controls()
    }

    /// "Showing N of T comments ..." under a non-empty, settled list.
    pub fn stats_line(&self) -> Option<String> {
        if self.store.loading || self.store.is_empty() {
            return None;
        }

        let filters = &self.store.filters;
        let mut line = format!(
            "Showing {} of {} comments",
            self.store.comments.len(),
            self.store.pagination.total_records
        );
        if !filters.search.is_empty() {
            line.push_str(&format!(" matching \"{}\"", filters.search));
        }
        if !filters.task_id.is_empty() {
            line.push_str(&format!(" for task \"{}\"", filters.task_id));
        }
        Some(line)
    }

    // ============ Keys ============

    /// Handle key events, returns true if app should quit
    pub async fn handle_key(&mut self, key: KeyEvent, tx: mpsc::Sender<AppEvent>) -> Result<bool> {
        // Global quit with Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        if self.form.is_open() {
            self.handle_form_key(key).await;
            return Ok(false);
        }

        if self.confirming_delete.is_some() {
            self.handle_confirm_key(key).await;
            return Ok(false);
        }

        match self.focus {
            Focus::List => self.handle_list_key(key, tx),
            Focus::Search | Focus::TaskFilter => {
                self.handle_filter_input_key(key, tx);
                Ok(false)
            }
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        if self.form_loading {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.cancel_form(),
            KeyCode::Char('s') if ctrl => self.submit_form().await,
            KeyCode::Char('e') if ctrl => self.edit_content_externally(),
            KeyCode::Tab => {
                if let Some(form) = self.form.form_mut() {
                    form.next_field();
                }
            }
            KeyCode::BackTab => {
                if let Some(form) = self.form.form_mut() {
                    form.prev_field();
                }
            }
            KeyCode::Enter
                if self.form.form().map(|f| f.focus) != Some(FormField::Content) =>
            {
                self.submit_form().await
            }
            _ => {
                if let Some(form) = self.form.form_mut() {
                    form.input(key);
                }
            }
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete().await,
            KeyCode::Char('n') | KeyCode::Esc => self.cancel_delete(),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, tx: mpsc::Sender<AppEvent>) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('n') => self.open_create_form(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('t') => self.focus = Focus::TaskFilter,
            KeyCode::Char('s') => {
                let filters = self.store.filters.with_sort_by(self.store.filters.sort_by.next());
                self.apply_filters(filters, tx);
            }
            KeyCode::Char('o') => {
                let filters = self
                    .store
                    .filters
                    .with_sort_order(self.store.filters.sort_order.toggle());
                self.apply_filters(filters, tx);
            }
            KeyCode::Char('p') => {
                let filters = self.store.filters.with_limit(self.store.filters.limit.next());
                self.apply_filters(filters, tx);
            }
            KeyCode::Char('r') => self.reset_filters(tx),
            KeyCode::Char('R') => self.refresh(tx),
            KeyCode::Char('h') | KeyCode::Left => {
                if let Some(page) = self.page_controls().and_then(|c| c.prev) {
                    self.change_page(page, tx);
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if let Some(page) = self.page_controls().and_then(|c| c.next) {
                    self.change_page(page, tx);
                }
            }
            KeyCode::Char('H') => {
                if let Some(page) = self.page_controls().and_then(|c| c.first) {
                    self.change_page(page, tx);
                }
            }
            KeyCode::Char('L') => {
                if let Some(page) = self.page_controls().and_then(|c| c.last) {
                    self.change_page(page, tx);
                }
            }
            KeyCode::Char(digit @ '1'..='5') => {
                let n = digit as usize - '0' as usize;
                if let Some(page) = self.page_controls().and_then(|c| c.window_page(n)) {
                    self.change_page(page, tx);
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn handle_filter_input_key(&mut self, key: KeyEvent, tx: mpsc::Sender<AppEvent>) {
        let current = match self.focus {
            Focus::Search => self.store.filters.search.clone(),
            Focus::TaskFilter => self.store.filters.task_id.clone(),
            Focus::List => return,
        };

        let updated = match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
                self.focus = Focus::List;
                return;
            }
            KeyCode::Char(c) => format!("{}{}", current, c),
            KeyCode::Backspace => {
                let mut value = current.clone();
                if value.pop().is_none() {
                    return;
                }
                value
            }
            _ => return,
        };

        let filters = match self.focus {
            Focus::Search => self.store.filters.with_search(updated),
            _ => self.store.filters.with_task_id(updated),
        };
        self.apply_filters(filters, tx);
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected < self.store.comments.len().saturating_sub(1) {
            self.selected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use comments_shared::api::{Pagination, SortBy};
    use std::time::Duration;

    // Nothing listens here, so any request that slips through fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:1/api";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn comment(id: &str) -> Comment {
        let now = Utc::now();
        Comment {
            id: id.to_string(),
            task_id: "t1".to_string(),
            user_id: "u1".to_string(),
            user_name: "Alice".to_string(),
            content: format!("comment {id}"),
            created_at: now,
            updated_at: now,
        }
    }

    /// App showing page `current` of `total`, three comments on screen.
    fn loaded_app(current: u32, total: u32) -> App {
        let mut app = App::new(ApiClient::new(UNREACHABLE));
        let ticket = app
            .store
            .begin_fetch(&FilterPatch::from(CommentFilters::default().with_page(current)));
        app.on_comments_loaded(
            ticket,
            Ok(CommentPage {
                data: vec![comment("a"), comment("b"), comment("c")],
                pagination: Pagination {
                    current_page: current,
                    total_pages: total,
                    has_next_page: current < total,
                    has_prev_page: current > 1,
                    total_records: u64::from(total) * 3,
                },
            }),
        );
        app
    }

    async fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> bool {
        app.handle_key(key(code), tx.clone()).await.unwrap()
    }

    #[tokio::test]
    async fn add_comment_opens_create_form_and_esc_hides_it() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);
        app.form_error = Some("stale".to_string());

        press(&mut app, &tx, KeyCode::Char('n')).await;
        assert!(matches!(app.form, FormState::Create(_)));
        assert!(app.form_error.is_none());

        press(&mut app, &tx, KeyCode::Esc).await;
        assert!(matches!(app.form, FormState::Hidden));
        assert_eq!(app.toasts.iter().last().map(|t| t.message.as_str()), Some("Operation cancelled"));
    }

    #[tokio::test]
    async fn edit_opens_form_for_selected_comment() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);

        press(&mut app, &tx, KeyCode::Char('j')).await;
        press(&mut app, &tx, KeyCode::Char('e')).await;

        let editing = app.form.editing().map(|c| c.id.as_str());
        assert_eq!(editing, Some("b"));
        let form = app.form.form().unwrap();
        assert_eq!(form.content(), "comment b");
        assert!(!form.is_editable(FormField::UserName));
    }

    #[tokio::test]
    async fn invalid_form_stays_open_without_request() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);
        app.open_create_form();
        if let Some(form) = app.form.form_mut() {
            form.task_id = "t1".to_string();
            form.user_id = "u1".to_string();
            form.user_name = "Alice".to_string();
            form.set_content(&"x".repeat(1001));
        }

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL), tx)
            .await
            .unwrap();

        let form = app.form.form().expect("form stays open");
        assert!(form.errors.get(FormField::Content).is_some());
        // A request to the unreachable backend would have set this
        assert!(app.form_error.is_none());
        assert!(!app.form_loading);
        assert_eq!(app.toasts.len(), 1);

        // Validation toasts last three seconds
        app.on_tick(Instant::now() + Duration::from_millis(2900));
        assert_eq!(app.toasts.len(), 1);
        app.on_tick(Instant::now() + Duration::from_millis(3100));
        assert!(app.toasts.is_empty());
    }

    #[tokio::test]
    async fn failed_create_keeps_form_open_with_error() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);
        app.open_create_form();
        if let Some(form) = app.form.form_mut() {
            form.task_id = "t1".to_string();
            form.user_id = "u1".to_string();
            form.user_name = "Alice".to_string();
            form.set_content("hello");
        }

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL), tx)
            .await
            .unwrap();

        assert!(matches!(app.form, FormState::Create(_)));
        assert_eq!(app.form_error.as_deref(), Some("Failed to create comment"));
        assert!(!app.form_loading);
        // List is untouched by a failed mutation
        assert_eq!(app.store.comments.len(), 3);
    }

    #[tokio::test]
    async fn typing_a_search_resets_to_first_page() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(3, 5);
        assert_eq!(app.store.filters.page, 3);

        press(&mut app, &tx, KeyCode::Char('/')).await;
        press(&mut app, &tx, KeyCode::Char('b')).await;
        press(&mut app, &tx, KeyCode::Char('u')).await;

        assert_eq!(app.focus, Focus::Search);
        assert_eq!(app.store.filters.search, "bu");
        assert_eq!(app.store.filters.page, 1);
        assert!(app.store.loading);

        press(&mut app, &tx, KeyCode::Backspace).await;
        assert_eq!(app.store.filters.search, "b");

        press(&mut app, &tx, KeyCode::Esc).await;
        assert_eq!(app.focus, Focus::List);
    }

    #[tokio::test]
    async fn sort_and_page_size_changes_reset_page() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(3, 5);

        press(&mut app, &tx, KeyCode::Char('s')).await;
        assert_eq!(app.store.filters.sort_by, SortBy::UserName);
        assert_eq!(app.store.filters.page, 1);

        let mut app = loaded_app(3, 5);
        press(&mut app, &tx, KeyCode::Char('p')).await;
        assert_eq!(app.store.filters.limit.get(), 20);
        assert_eq!(app.store.filters.page, 1);
    }

    #[tokio::test]
    async fn page_keys_change_only_the_page() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(3, 5);
        app.store.filters = app.store.filters.with_search("bug").with_page(3);

        press(&mut app, &tx, KeyCode::Char('l')).await;
        assert_eq!(app.store.filters.page, 4);
        assert_eq!(app.store.filters.search, "bug");

        let mut app = loaded_app(3, 5);
        press(&mut app, &tx, KeyCode::Char('H')).await;
        assert_eq!(app.store.filters.page, 1);

        let mut app = loaded_app(3, 5);
        press(&mut app, &tx, KeyCode::Char('5')).await;
        assert_eq!(app.store.filters.page, 5);
    }

    #[tokio::test]
    async fn page_keys_ignored_on_single_page() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);

        press(&mut app, &tx, KeyCode::Char('l')).await;
        assert_eq!(app.store.filters.page, 1);
        assert!(!app.store.loading);
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(2, 5);
        app.store.filters = app.store.filters.with_task_id("t7").with_page(2);

        press(&mut app, &tx, KeyCode::Char('r')).await;

        assert_eq!(app.store.filters, CommentFilters::default());
        assert_eq!(
            app.toasts.iter().last().map(|t| t.message.as_str()),
            Some("Filters reset to default")
        );
    }

    #[tokio::test]
    async fn cancelled_delete_makes_no_request() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);

        press(&mut app, &tx, KeyCode::Char('d')).await;
        assert_eq!(app.confirming_delete.as_ref().map(|c| c.id.as_str()), Some("a"));

        press(&mut app, &tx, KeyCode::Char('n')).await;
        assert!(app.confirming_delete.is_none());
        let messages: Vec<_> = app.toasts.iter().map(|t| t.message.clone()).collect();
        assert_eq!(messages, vec!["Delete cancelled".to_string()]);
        assert!(!app.store.loading);
    }

    #[tokio::test]
    async fn failed_delete_only_notifies() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);

        press(&mut app, &tx, KeyCode::Char('d')).await;
        press(&mut app, &tx, KeyCode::Char('y')).await;

        assert!(app.confirming_delete.is_none());
        assert_eq!(app.store.comments.len(), 3);
        assert!(app.store.error.is_none());
        let last = app.toasts.iter().last().map(|t| t.message.clone());
        assert_eq!(last.as_deref(), Some("Failed to delete comment: Failed to delete comment"));

        // A second confirm has nothing pending
        press(&mut app, &tx, KeyCode::Char('y')).await;
        assert_eq!(app.toasts.len(), 1);
    }

    #[tokio::test]
    async fn stale_selection_is_clamped_after_reload() {
        let mut app = loaded_app(1, 1);
        app.selected = 2;

        let ticket = app.store.begin_fetch(&FilterPatch::default());
        app.on_comments_loaded(
            ticket,
            Ok(CommentPage {
                data: vec![comment("z")],
                pagination: Pagination::default(),
            }),
        );

        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_comment().map(|c| c.id.as_str()), Some("z"));
    }

    #[test]
    fn stats_line_mentions_active_filters() {
        let mut app = loaded_app(1, 2);
        assert_eq!(app.stats_line().as_deref(), Some("Showing 3 of 6 comments"));

        app.store.filters = app.store.filters.with_search("bug").with_task_id("t1");
        assert_eq!(
            app.stats_line().as_deref(),
            Some("Showing 3 of 6 comments matching \"bug\" for task \"t1\"")
        );

        app.store.loading = true;
        assert!(app.stats_line().is_none());
    }

    #[test]
    fn input_is_paused_only_while_editor_runs() {
        let mut app = loaded_app(1, 1);
        app.open_create_form();
        let gate = app.input_gate.clone();
        assert!(!gate.is_paused());

        app.edit_content_with(|content| {
            assert!(gate.is_paused());
            Ok(format!("{content}from the editor"))
        });

        assert!(!app.input_gate.is_paused());
        assert!(app.needs_terminal_clear);
        assert_eq!(app.form.form().map(|f| f.content()).as_deref(), Some("from the editor"));
    }

    #[test]
    fn failed_editor_still_resumes_input() {
        let mut app = loaded_app(1, 1);
        app.open_create_form();

        app.edit_content_with(|_| Err(anyhow::anyhow!("no editor")));

        assert!(!app.input_gate.is_paused());
        assert_eq!(
            app.toasts.iter().last().map(|t| t.message.as_str()),
            Some("Editor failed: no editor")
        );
    }

    #[tokio::test]
    async fn q_quits_from_the_list() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = loaded_app(1, 1);
        assert!(press(&mut app, &tx, KeyCode::Char('q')).await);

        app.focus = Focus::Search;
        assert!(!press(&mut app, &tx, KeyCode::Char('q')).await);
        assert_eq!(app.store.filters.search, "q");
    }
}

//! The create/edit comment form and its client-side validation.
//!
//! One layout serves both modes. In edit mode the task id and user id are
//! read-only, the user name is shown but disabled, and only the content is
//! editable and submitted.

use comments_shared::{
    api::{CreateCommentRequest, UpdateCommentRequest},
    Comment, MAX_CONTENT_LEN, MAX_USER_NAME_LEN,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;

use crate::editor::{create_textarea, textarea_content};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    TaskId,
    UserId,
    UserName,
    Content,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::TaskId => "Task ID",
            FormField::UserId => "User ID",
            FormField::UserName => "User Name",
            FormField::Content => "Comment Content",
        }
    }
}

const CREATE_FIELDS: [FormField; 4] = [
    FormField::TaskId,
    FormField::UserId,
    FormField::UserName,
    FormField::Content,
];
const EDIT_FIELDS: [FormField; 1] = [FormField::Content];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Task ID is required")]
    TaskIdRequired,
    #[error("User ID is required")]
    UserIdRequired,
    #[error("User name is required")]
    UserNameRequired,
    #[error("User name cannot exceed 100 characters")]
    UserNameTooLong,
    #[error("Comment content is required")]
    ContentRequired,
    #[error("Comment cannot exceed 1000 characters")]
    ContentTooLong,
}

impl ValidationError {
    pub fn field(self) -> FormField {
        match self {
            ValidationError::TaskIdRequired => FormField::TaskId,
            ValidationError::UserIdRequired => FormField::UserId,
            ValidationError::UserNameRequired | ValidationError::UserNameTooLong => {
                FormField::UserName
            }
            ValidationError::ContentRequired | ValidationError::ContentTooLong => {
                FormField::Content
            }
        }
    }
}

/// Inline errors, at most one per field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<ValidationError>);

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<ValidationError> {
        self.0.iter().copied().find(|e| e.field() == field)
    }

    pub fn clear(&mut self, field: FormField) {
        self.0.retain(|e| e.field() != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// What a valid form turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(CreateCommentRequest),
    Update(UpdateCommentRequest),
}

#[derive(Debug, Clone)]
pub struct CommentForm {
    mode: FormMode,
    pub task_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: TextArea<'static>,
    pub focus: FormField,
    pub errors: FieldErrors,
}

impl CommentForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            task_id: String::new(),
            user_id: String::new(),
            user_name: String::new(),
            content: create_textarea(""),
            focus: FormField::TaskId,
            errors: FieldErrors::default(),
        }
    }

    pub fn edit(comment: &Comment) -> Self {
        Self {
            mode: FormMode::Edit,
            task_id: comment.task_id.clone(),
            user_id: comment.user_id.clone(),
            user_name: comment.user_name.clone(),
            content: create_textarea(&comment.content),
            focus: FormField::Content,
            errors: FieldErrors::default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn editable_fields(&self) -> &'static [FormField] {
        match self.mode {
            FormMode::Create => &CREATE_FIELDS,
            FormMode::Edit => &EDIT_FIELDS,
        }
    }

    pub fn is_editable(&self, field: FormField) -> bool {
        self.editable_fields().contains(&field)
    }

    pub fn next_field(&mut self) {
        self.cycle_focus(1);
    }

    pub fn prev_field(&mut self) {
        let len = self.editable_fields().len();
        self.cycle_focus(len - 1);
    }

    fn cycle_focus(&mut self, step: usize) {
        let fields = self.editable_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + step) % fields.len()];
    }

    pub fn content(&self) -> String {
        textarea_content(&self.content)
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = create_textarea(content);
        self.errors.clear(FormField::Content);
    }

    pub fn char_count(&self) -> usize {
        self.content().chars().count()
    }

    pub fn over_limit(&self) -> bool {
        self.char_count() > MAX_CONTENT_LEN
    }

    /// Feed a key press to the focused field. Editing a field clears its
    /// inline error.
    pub fn input(&mut self, key: KeyEvent) {
        if !self.is_editable(self.focus) {
            return;
        }

        if self.focus == FormField::Content {
            if self.content.input(key) {
                self.errors.clear(FormField::Content);
            }
            return;
        }

        let value = match self.focus {
            FormField::TaskId => &mut self.task_id,
            FormField::UserId => &mut self.user_id,
            FormField::UserName => &mut self.user_name,
            FormField::Content => return,
        };

        let changed = match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                value.push(c);
                true
            }
            KeyCode::Backspace => value.pop().is_some(),
            _ => false,
        };

        if changed {
            self.errors.clear(self.focus);
        }
    }

    /// Check every rule without touching the stored errors.
    pub fn validate(&self) -> Result<Submission, FieldErrors> {
        let mut errors = Vec::new();
        let content = self.content();

        if self.mode == FormMode::Create {
            if self.task_id.trim().is_empty() {
                errors.push(ValidationError::TaskIdRequired);
            }
            if self.user_id.trim().is_empty() {
                errors.push(ValidationError::UserIdRequired);
            }
        }

        if self.user_name.trim().is_empty() {
            errors.push(ValidationError::UserNameRequired);
        } else if self.user_name.chars().count() > MAX_USER_NAME_LEN {
            errors.push(ValidationError::UserNameTooLong);
        }

        if content.trim().is_empty() {
            errors.push(ValidationError::ContentRequired);
        } else if content.chars().count() > MAX_CONTENT_LEN {
            errors.push(ValidationError::ContentTooLong);
        }

        if !errors.is_empty() {
            return Err(FieldErrors(errors));
        }

        Ok(match self.mode {
            FormMode::Create => Submission::Create(CreateCommentRequest {
                task_id: self.task_id.clone(),
                user_id: self.user_id.clone(),
                user_name: self.user_name.clone(),
                content,
            }),
            FormMode::Edit => Submission::Update(UpdateCommentRequest { content }),
        })
    }

    /// Validate and remember the inline errors for display.
    pub fn submit(&mut self) -> Result<Submission, FieldErrors> {
        let result = self.validate();
        self.errors = match &result {
            Ok(_) => FieldErrors::default(),
            Err(errors) => errors.clone(),
        };
        result
    }
}

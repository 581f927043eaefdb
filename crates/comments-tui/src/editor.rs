use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::process::Command;
use tempfile::NamedTempFile;
use tui_textarea::{CursorMove, TextArea};

/// Create a TextArea holding `content`, cursor at the end
pub fn create_textarea(content: &str) -> TextArea<'static> {
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    if content.ends_with('\n') || lines.is_empty() {
        lines.push(String::new());
    }

    let mut textarea = TextArea::new(lines);
    textarea.move_cursor(CursorMove::Bottom);
    textarea.move_cursor(CursorMove::End);
    textarea.set_max_histories(100);

    textarea
}

/// Extract content from TextArea as a single String
pub fn textarea_content(textarea: &TextArea) -> String {
    textarea.lines().join("\n")
}

/// Launch `$EDITOR` (or `$VISUAL`, then vim) on `content` and return the
/// edited text with trailing newlines stripped.
pub fn launch_external_editor(content: &str) -> Result<String> {
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "vim".to_string());

    let mut temp_file = NamedTempFile::with_suffix(".txt").context("Could not create temp file")?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    let temp_path = temp_file.path().to_path_buf();

    // Leave TUI mode
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    tracing::debug!(%editor, path = %temp_path.display(), "launching external editor");
    let status = Command::new(&editor).arg(&temp_path).status();

    // Restore TUI mode (always, even on error)
    let restore_result = (|| -> Result<()> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        enable_raw_mode()?;
        Ok(())
    })();

    if let Err(e) = restore_result {
        anyhow::bail!("Failed to restore terminal: {}", e);
    }

    match status {
        Ok(exit_status) if exit_status.success() => {
            let edited = std::fs::read_to_string(&temp_path)
                .context("Could not read edited comment")?;
            Ok(edited.trim_end_matches('\n').to_string())
        }
        Ok(exit_status) => {
            anyhow::bail!("Editor exited with status: {}", exit_status)
        }
        Err(e) => {
            anyhow::bail!("Failed to launch editor '{}': {}", editor, e)
        }
    }
}

use chrono::{DateTime, Local, Utc};
use comments_shared::{Comment, MAX_CONTENT_LEN};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::form::{CommentForm, FormField, FormMode};
use crate::pagination::PageControls;
use crate::toast::ToastLevel;

const TOAST_WIDTH: u16 = 44;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filter bar
            Constraint::Min(0),    // Comment list
            Constraint::Length(pagination_height(app)),
            Constraint::Length(1), // Stats
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_filter_bar(f, chunks[1], app);
    draw_comment_list(f, chunks[2], app);
    if let Some(controls) = app.visible_page_controls() {
        draw_pagination(f, chunks[3], &controls);
    }
    draw_stats(f, chunks[4], app);
    draw_status_bar(f, chunks[5], app);

    if let Some(form) = app.form.form() {
        draw_form_popup(f, app, form);
    }

    if app.confirming_delete.is_some() {
        draw_delete_confirm_popup(f, app);
    }

    draw_toasts(f, app);
}

fn pagination_height(app: &App) -> u16 {
    if app.visible_page_controls().is_some() {
        2
    } else {
        0
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "Task Comments Manager",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            "add, edit and search comments on tasks",
            Style::default().fg(Color::DarkGray),
        ),
    ])])
    .block(Block::default().borders(Borders::BOTTOM));

    f.render_widget(header, area);
}

fn draw_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let filters = &app.store.filters;

    let field_style = |focus: Focus| {
        if app.focus == focus && !app.form.is_open() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35), // Search
            Constraint::Percentage(20), // Task ID
            Constraint::Min(0),         // Sort + page size
        ])
        .split(area);

    let search = Paragraph::new(filters.search.as_str()).block(
        Block::default()
            .title(" Search (/) ")
            .borders(Borders::ALL)
            .border_style(field_style(Focus::Search)),
    );
    f.render_widget(search, chunks[0]);

    let task = Paragraph::new(filters.task_id.as_str()).block(
        Block::default()
            .title(" Task ID (t) ")
            .borders(Borders::ALL)
            .border_style(field_style(Focus::TaskFilter)),
    );
    f.render_widget(task, chunks[1]);

    let options = Paragraph::new(Line::from(vec![
        Span::styled("Sort: ", Style::default().fg(Color::DarkGray)),
        Span::styled(filters.sort_by.label(), Style::default().fg(Color::White)),
        Span::styled("  Order: ", Style::default().fg(Color::DarkGray)),
        Span::styled(filters.sort_order.label(), Style::default().fg(Color::White)),
        Span::styled("  Per page: ", Style::default().fg(Color::DarkGray)),
        Span::styled(filters.limit.to_string(), Style::default().fg(Color::White)),
    ]))
    .block(
        Block::default()
            .title(" s: sort | o: order | p: per page | r: reset ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(options, chunks[2]);

    if app.form.is_open() || app.confirming_delete.is_some() {
        return;
    }

    // Set cursor position
    let cursor = match app.focus {
        Focus::Search => Some((chunks[0], filters.search.chars().count())),
        Focus::TaskFilter => Some((chunks[1], filters.task_id.chars().count())),
        Focus::List => None,
    };
    if let Some((field, len)) = cursor {
        let max_x = field.x + field.width.saturating_sub(2);
        f.set_cursor_position(((field.x + 1 + len as u16).min(max_x), field.y + 1));
    }
}

fn draw_comment_list(f: &mut Frame, area: Rect, app: &App) {
    let store = &app.store;
    let list_block = |indicator: &str| {
        Block::default()
            .title(format!(" Comments ({}){} ", store.pagination.total_records, indicator))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
    };
    let block = list_block("");

    if store.loading {
        let text = Paragraph::new("Loading comments...")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(text, area);
        return;
    }

    if let Some(ref error) = store.error {
        draw_error_panel(f, area, error);
        return;
    }

    if store.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No comments found",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Try adjusting your search filters or create a new comment.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    let cards: Vec<Vec<Line>> = store
        .comments
        .iter()
        .enumerate()
        .map(|(i, comment)| card_lines(comment, i == app.selected, width))
        .collect();

    // Keep the selected card on screen
    let selected = app.selected.min(cards.len() - 1);
    let mut scroll_offset = 0;
    while scroll_offset < selected
        && cards[scroll_offset..=selected].iter().map(Vec::len).sum::<usize>() > visible_height
    {
        scroll_offset += 1;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut shown_end = scroll_offset;
    for card in cards.into_iter().skip(scroll_offset) {
        if lines.len() >= visible_height {
            break;
        }
        lines.extend(card);
        shown_end += 1;
    }

    let has_more_above = scroll_offset > 0;
    let has_more_below = shown_end < store.comments.len() || lines.len() > visible_height;
    let scroll_indicator = match (has_more_above, has_more_below) {
        (true, true) => " ↑↓",
        (true, false) => " ↑",
        (false, true) => " ↓",
        (false, false) => "",
    };

    let list = Paragraph::new(lines).block(list_block(scroll_indicator));
    f.render_widget(list, area);
}

/// Full comment body wrapped to `width` columns, then author and dates.
fn card_lines(comment: &Comment, selected: bool, width: usize) -> Vec<Line<'_>> {
    let bg_style = if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let marker = if selected { "▌" } else { " " };

    let mut lines: Vec<Line> = wrap_content(&comment.content, width.saturating_sub(2))
        .into_iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(format!("{} ", marker), bg_style.fg(Color::Cyan)),
                Span::styled(row, bg_style.fg(Color::White)),
            ])
        })
        .collect();

    lines.push(Line::from(vec![
        Span::styled(format!("{}  ", marker), bg_style.fg(Color::Cyan)),
        Span::styled("Task: ", bg_style.fg(Color::DarkGray)),
        Span::styled(comment.task_id.as_str(), bg_style.fg(Color::Yellow)),
        Span::styled("  By: ", bg_style.fg(Color::DarkGray)),
        Span::styled(comment.user_name.as_str(), bg_style.fg(Color::Green)),
        Span::styled(format!(" ({})", comment.user_id), bg_style.fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("{}  ", marker), bg_style.fg(Color::Cyan)),
        Span::styled("Created ", bg_style.fg(Color::DarkGray)),
        Span::styled(format_timestamp(&comment.created_at), bg_style.fg(Color::Gray)),
        Span::styled("  Updated ", bg_style.fg(Color::DarkGray)),
        Span::styled(format_timestamp(&comment.updated_at), bg_style.fg(Color::Gray)),
    ]));
    lines.push(Line::from(""));
    lines
}

/// Split content into rows of at most `width` chars, keeping its own line
/// breaks. Empty content still yields one row.
fn wrap_content(content: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in content.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string()
}

fn draw_error_panel(f: &mut Frame, area: Rect, error: &str) {
    let block = Block::default()
        .title(" Error Loading Comments ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(text, area);
}

fn draw_pagination(f: &mut Frame, area: Rect, controls: &PageControls) {
    let control = |label: &'static str, target: Option<u32>| {
        let style = if target.is_some() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let mut spans = vec![
        control("« First", controls.first),
        Span::raw("  "),
        control("‹ Prev", controls.prev),
        Span::raw("  "),
    ];
    for page in &controls.window {
        let style = if *page == controls.current {
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!(" {} ", page), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(" "));
    spans.push(control("Next ›", controls.next));
    spans.push(Span::raw("  "));
    spans.push(control("Last »", controls.last));

    let bar = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(
            format!(
                "Page {} of {} ({} total comments)",
                controls.current, controls.total, controls.total_records
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);

    f.render_widget(bar, area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    if let Some(stats) = app.stats_line() {
        let text = Paragraph::new(stats)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(text, area);
    }
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (mode, mode_color) = match (app.form.form().map(CommentForm::mode), app.focus) {
        (Some(FormMode::Create), _) => ("CREATE", Color::Green),
        (Some(FormMode::Edit), _) => ("EDIT", Color::Yellow),
        _ if app.confirming_delete.is_some() => ("DELETE", Color::Red),
        (None, Focus::Search) => ("SEARCH", Color::Magenta),
        (None, Focus::TaskFilter) => ("TASK", Color::Magenta),
        (None, Focus::List) => ("LIST", Color::Blue),
    };

    let hints = if app.form.is_open() {
        "Tab: next field | Ctrl+S: save | Ctrl+E: $EDITOR | Esc: cancel"
    } else if app.confirming_delete.is_some() {
        "y: confirm | n/Esc: cancel"
    } else if app.focus != Focus::List {
        "type to filter | Enter/Esc: back to list"
    } else {
        "n: new | e: edit | d: delete | h/l: page | R: refresh | q: quit"
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default().bg(mode_color).fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]));

    f.render_widget(status, area);
}

fn draw_form_popup(f: &mut Frame, app: &App, form: &CommentForm) {
    let area = centered_rect(70, 70, f.area());

    f.render_widget(Clear, area);

    let title = match form.mode() {
        FormMode::Create => " Add New Comment ",
        FormMode::Edit => " Edit Comment ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Task ID + User ID
            Constraint::Length(3), // User Name
            Constraint::Min(5),    // Content
            Constraint::Length(1), // Counter
            Constraint::Length(2), // Form error / field errors
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    let id_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_text_field(f, id_chunks[0], form, FormField::TaskId, &form.task_id);
    draw_text_field(f, id_chunks[1], form, FormField::UserId, &form.user_id);
    draw_text_field(f, chunks[1], form, FormField::UserName, &form.user_name);

    // Content field
    let content_block = Block::default()
        .title(field_title(form, FormField::Content))
        .borders(Borders::ALL)
        .border_style(field_style(form, FormField::Content));
    let content_inner = content_block.inner(chunks[2]);
    f.render_widget(content_block, chunks[2]);
    f.render_widget(&form.content, content_inner);

    let count_style = if form.over_limit() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let counter = Paragraph::new(Span::styled(
        format!("{}/{}", form.char_count(), MAX_CONTENT_LEN),
        count_style,
    ))
    .alignment(Alignment::Right);
    f.render_widget(counter, chunks[3]);

    let messages: Vec<Line> = app
        .form_error
        .iter()
        .map(|e| Line::from(Span::styled(e.clone(), Style::default().fg(Color::Red))))
        .chain(form.errors.iter().map(|e| {
            Line::from(Span::styled(
                format!("{}: {}", e.field().label(), e),
                Style::default().fg(Color::Red),
            ))
        }))
        .collect();
    f.render_widget(Paragraph::new(messages).wrap(Wrap { trim: true }), chunks[4]);

    let hint_text = if app.form_loading {
        "Saving..."
    } else {
        match form.mode() {
            FormMode::Create => "Tab: switch field | Ctrl+S: add comment | Esc: cancel",
            FormMode::Edit => "Ctrl+S: update comment | Ctrl+E: $EDITOR | Esc: cancel",
        }
    };
    let hint = Paragraph::new(hint_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[5]);

    // Set cursor position for single-line fields; the text area draws its own
    let field_area = match form.focus {
        FormField::TaskId => Some((id_chunks[0], &form.task_id)),
        FormField::UserId => Some((id_chunks[1], &form.user_id)),
        FormField::UserName => Some((chunks[1], &form.user_name)),
        FormField::Content => None,
    };
    if let Some((field, value)) = field_area {
        let max_x = field.x + field.width.saturating_sub(2);
        let x = (field.x + 1 + value.chars().count() as u16).min(max_x);
        f.set_cursor_position((x, field.y + 1));
    }
}

fn field_title(form: &CommentForm, field: FormField) -> String {
    let mut title = format!(" {} ", field.label());
    if form.mode() == FormMode::Edit && field != FormField::Content {
        title.push_str("(read-only) ");
    }
    if form.errors.get(field).is_some() {
        title.push_str("! ");
    }
    title
}

fn field_style(form: &CommentForm, field: FormField) -> Style {
    if form.errors.get(field).is_some() {
        Style::default().fg(Color::Red)
    } else if !form.is_editable(field) {
        Style::default().fg(Color::DarkGray)
    } else if form.focus == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_text_field(f: &mut Frame, area: Rect, form: &CommentForm, field: FormField, value: &str) {
    let value_style = if form.is_editable(field) {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(field_title(form, field))
        .borders(Borders::ALL)
        .border_style(field_style(form, field));
    let text = Paragraph::new(Span::styled(value, value_style)).block(block);
    f.render_widget(text, area);
}

fn draw_delete_confirm_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, f.area());

    f.render_widget(Clear, area);

    let preview = app
        .confirming_delete
        .as_ref()
        .and_then(|c| c.content.lines().next())
        .unwrap_or("Unknown");

    let block = Block::default()
        .title(" Confirm Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Message
            Constraint::Length(2), // Hint
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let message = Paragraph::new(vec![
        Line::from(Span::raw("Delete this comment?")),
        Line::from(Span::styled(
            format!("\"{}\"", preview),
            Style::default().fg(Color::Yellow),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let hint = Paragraph::new("y: yes, delete | n: no, cancel")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);
}

/// Newest notifications stacked in the top-right corner.
fn draw_toasts(f: &mut Frame, app: &App) {
    let screen = f.area();
    let width = TOAST_WIDTH.min(screen.width);
    let mut y = screen.y + 1;

    for toast in app.toasts.iter().rev() {
        if y + 3 > screen.bottom() {
            break;
        }

        let (title, color) = match toast.level {
            ToastLevel::Info => (" Info ", Color::Blue),
            ToastLevel::Success => (" Success ", Color::Green),
            ToastLevel::Error => (" Error ", Color::Red),
        };
        let area = Rect::new(screen.right().saturating_sub(width + 1), y, width, 3);

        f.render_widget(Clear, area);
        let text = Paragraph::new(toast.message.as_str())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(text, area);

        y += 3;
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

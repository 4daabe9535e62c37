use docchat_core::{
    AppViewModel, NotificationView, RequestKind, Severity, Speaker, TurnView, UploadStatus,
    UploadTone,
};
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::constants::*;
use super::layout::{centered_rect, AppLayout};
use super::view_state::UiState;

pub fn render(frame: &mut Frame, view: &AppViewModel, ui: &mut UiState) {
    let layout = AppLayout::compute(frame.area());

    render_banner(frame, layout.banner, view.notification.as_ref());
    render_transcript(frame, layout.transcript, view, ui);
    render_upload_status(frame, layout.upload_status, view.upload_status.as_ref());
    let modal_open = view.busy.is_some() || view.confirmation.is_some() || ui.picker.open;
    render_query_input(frame, layout.input, ui, !modal_open);
    render_footer(frame, layout.footer);

    if let Some(kind) = view.busy {
        render_busy_overlay(frame, kind, ui.spinner_frame);
    } else if let Some(prompt) = view.confirmation {
        render_confirmation(frame, prompt);
    } else if ui.picker.open {
        render_file_picker(frame, ui);
    }
}

fn render_banner(frame: &mut Frame, area: Rect, notification: Option<&NotificationView>) {
    let Some(note) = notification else {
        return;
    };
    let (icon, bg) = match note.severity {
        Severity::Info => ("i", INFO_BG),
        Severity::Success => ("✓", SUCCESS_BG),
        Severity::Error => ("✗", ERROR_BG),
    };
    let text = docchat_core::sanitize_for_display(&note.text).replace('\n', " ");
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(text),
    ]))
    .style(Style::default().fg(USER_FG).bg(bg));
    frame.render_widget(banner, area);
}

fn render_transcript(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &mut UiState) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let lines = transcript_lines(&view.turns, inner.width);
    let offset = ui
        .scroll
        .layout(view.transcript_revision, lines.len(), inner.height as usize);

    let mut block = Block::default().borders(Borders::ALL).title(APP_TITLE);
    if !ui.scroll.is_following() {
        block = block.title_bottom(Line::from(SCROLLED_HINT).alignment(Alignment::Right));
    }

    let transcript = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(transcript, area);
}

/// Pre-wrapped transcript lines; user bubbles right-aligned, bot bubbles left.
pub fn transcript_lines(turns: &[TurnView], width: u16) -> Vec<Line<'static>> {
    let bubble_width = (usize::from(width) * usize::from(BUBBLE_WIDTH_PERCENT) / 100).max(8);
    let text_width = bubble_width.saturating_sub(2).max(1);
    let mut lines = Vec::new();

    for turn in turns {
        let (label, alignment, bubble) = match turn.speaker {
            Speaker::User => ("You", Alignment::Right, Style::default().fg(USER_FG).bg(USER_BG)),
            Speaker::Bot => ("Assistant", Alignment::Left, Style::default().fg(BOT_FG).bg(BOT_BG)),
        };

        lines.push(
            Line::from(Span::styled(
                label,
                Style::default().fg(SOURCES_FG).add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
        );
        for text_line in &turn.lines {
            for chunk in wrap_text(text_line, text_width) {
                lines.push(Line::from(Span::styled(format!(" {chunk} "), bubble)).alignment(alignment));
            }
        }
        if let Some(sources) = &turn.sources_line {
            let style = bubble
                .fg(SOURCES_FG)
                .add_modifier(Modifier::ITALIC);
            for chunk in wrap_text(sources, text_width.saturating_sub(2).max(1)) {
                lines.push(Line::from(Span::styled(format!(" │ {chunk} "), style)).alignment(alignment));
            }
        }
        lines.push(Line::default());
    }

    lines
}

/// Word-wrap to `width` display columns; words wider than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split(' ') {
        let word_width = word.width();
        let needed = if current_width == 0 {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed <= width {
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }
        if current_width > 0 {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for c in word.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width > 0 && current_width + char_width > width {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += char_width;
        }
    }
    out.push(current);
    out
}

fn render_upload_status(frame: &mut Frame, area: Rect, status: Option<&UploadStatus>) {
    let Some(status) = status else {
        return;
    };
    let color = match status.tone {
        UploadTone::Pending => PENDING_FG,
        UploadTone::Success => SUCCESS_BG,
        UploadTone::Error => ERROR_BG,
    };
    let text = docchat_core::sanitize_for_display(&status.text).replace('\n', " ");
    let line = Line::from(vec![
        Span::styled(" Upload: ", Style::default().fg(SOURCES_FG)),
        Span::styled(text, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_query_input(frame: &mut Frame, area: Rect, ui: &UiState, show_cursor: bool) {
    let block = Block::default().borders(Borders::ALL).title(INPUT_TITLE);
    let inner = block.inner(area);
    let cursor = ui.query.cursor_column();
    let scroll_x = horizontal_scroll(cursor, inner.width);

    let input = Paragraph::new(ui.query.text().to_owned())
        .block(block)
        .scroll((0, u16::try_from(scroll_x).unwrap_or(u16::MAX)));
    frame.render_widget(input, area);

    if show_cursor {
        place_cursor(frame, inner, cursor - scroll_x);
    }
}

/// Columns to skip so the cursor stays inside a single-line field.
fn horizontal_scroll(cursor: usize, field_width: u16) -> usize {
    cursor.saturating_sub(usize::from(field_width.saturating_sub(1)))
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(KEY_HINTS.len() * 2);
    for (key, action) in KEY_HINTS {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(INFO_BG).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{action}  ")));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn busy_label(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::Chat => "Waiting for the answer...",
        RequestKind::Upload => "Uploading and processing...",
        RequestKind::ClearData => "Clearing data...",
    }
}

fn render_busy_overlay(frame: &mut Frame, kind: RequestKind, spinner_frame: usize) {
    let area = centered_rect(44, 5, frame.area());
    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    let body = Paragraph::new(vec![
        Line::default(),
        Line::from(format!("{spinner} {}", busy_label(kind))).alignment(Alignment::Center),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Working "));

    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

fn render_confirmation(frame: &mut Frame, prompt: &str) {
    let area = centered_rect(64, 8, frame.area());
    let body = Paragraph::new(vec![
        Line::from(prompt.to_owned()),
        Line::default(),
        Line::from(Span::styled(
            CONFIRM_HINT,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(CONFIRM_TITLE)
            .border_style(Style::default().fg(ERROR_BG)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

fn render_file_picker(frame: &mut Frame, ui: &UiState) {
    let area = centered_rect(72, 5, frame.area());
    let block = Block::default().borders(Borders::ALL).title(PICKER_TITLE);
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let hint_row = Rect::new(inner.x, inner.y, inner.width, 1);
    let entry_row = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    let cursor = ui.picker.draft.cursor_column();
    let scroll_x = horizontal_scroll(cursor, entry_row.width);

    frame.render_widget(
        Paragraph::new(Span::styled(PICKER_HINT, Style::default().fg(SOURCES_FG))),
        hint_row,
    );
    frame.render_widget(
        Paragraph::new(ui.picker.draft.text().to_owned())
            .scroll((0, u16::try_from(scroll_x).unwrap_or(u16::MAX))),
        entry_row,
    );
    place_cursor(frame, entry_row, cursor - scroll_x);
}

fn place_cursor(frame: &mut Frame, area: Rect, column: usize) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let column = u16::try_from(column)
        .unwrap_or(u16::MAX)
        .min(area.width - 1);
    frame.set_cursor_position(Position::new(area.x + column, area.y));
}

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::presenter::{TaskRow, ViewModel};
use crate::task::Filter;

use super::app::{AddField, App, Prompt};

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();

    if !app.controller.is_signed_in() {
        render_signed_out(frame, area, app);
        return;
    }

    let view = app.presenter.view();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    render_header(frame, app, chunks[0]);
    render_tabs(frame, &view, chunks[1]);
    render_list(frame, app, &view, chunks[2]);
    render_summary(frame, &view, chunks[3]);
    render_status(frame, app, chunks[4]);
}

fn render_signed_out(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "GlassTask",
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your tasks, synced everywhere.",
            Style::default().fg(COLOR_MUTED),
        )),
        Line::default(),
        Line::from(Span::styled(
            "press s to sign in  \u{2022}  q to quit",
            Style::default().fg(COLOR_TEXT),
        )),
    ];
    if let Some(notice) = app.notice.as_deref() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            notice,
            Style::default().fg(COLOR_ERROR),
        )));
    }
    let hero = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(40),
                Constraint::Length(6),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);
    frame.render_widget(hero, vertical[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "GlassTask",
        Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
    )];
    if let Some(user) = app.user_label() {
        spans.push(Span::styled("  \u{2022}  ", Style::default().fg(COLOR_MUTED_DARK)));
        spans.push(Span::styled(user, Style::default().fg(COLOR_MUTED)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let tabs = [
        ("1 All", Filter::All),
        ("2 Active", Filter::Active),
        ("3 Completed", Filter::Completed),
    ];
    let mut spans = Vec::new();
    for (idx, (label, filter)) in tabs.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", Style::default().fg(COLOR_MUTED_DARK)));
        }
        let style = if view.filter == filter {
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(frame: &mut Frame, app: &App, view: &ViewModel, area: Rect) {
    if view.rows.is_empty() {
        let empty = match view.filter {
            Filter::All => "No tasks yet. Press a to add one.",
            Filter::Active => "Nothing active.",
            Filter::Completed => "Nothing completed.",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(empty, Style::default().fg(COLOR_MUTED_DARK))),
            area,
        );
        return;
    }

    let mut lines = Vec::with_capacity(view.rows.len());
    for (idx, row) in view.rows.iter().enumerate() {
        lines.push(render_row(row, idx == app.selected));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_row(row: &TaskRow, selected: bool) -> Line<'static> {
    let marker = if selected { "\u{203a} " } else { "  " };
    let checkbox = if row.completed { "[x] " } else { "[ ] " };
    let mut title_style = if row.completed {
        Style::default()
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let mut spans = vec![
        Span::styled(marker.to_string(), Style::default().fg(COLOR_ACCENT)),
        Span::styled(
            checkbox.to_string(),
            Style::default().fg(if row.completed {
                COLOR_SUCCESS
            } else {
                COLOR_MUTED
            }),
        ),
        Span::styled(row.title.clone(), title_style),
    ];
    if let Some(due) = row.due_label.as_deref() {
        spans.push(Span::styled(
            format!("  {due}"),
            Style::default().fg(COLOR_MUTED),
        ));
    }
    Line::from(spans)
}

fn render_summary(frame: &mut Frame, view: &ViewModel, area: Rect) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            view.summary.to_string(),
            Style::default().fg(COLOR_MUTED),
        )),
        area,
    );
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(prompt) = app.prompt.as_ref() {
        frame.render_widget(Paragraph::new(render_prompt(prompt)), area);
        return;
    }
    if let Some(notice) = app.notice.as_deref() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                notice.to_string(),
                Style::default().fg(COLOR_ERROR),
            )),
            area,
        );
        return;
    }
    frame.render_widget(
        Paragraph::new(Span::styled(
            "a add  e edit  space toggle  d delete  c clear completed  f filter  s sign out  q quit",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
        area,
    );
}

fn render_prompt(prompt: &Prompt) -> Line<'static> {
    let focused = Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD);
    let blurred = Style::default().fg(COLOR_MUTED);
    match prompt {
        Prompt::Add { title, due, field } => Line::from(vec![
            Span::styled("Add task  ", Style::default().fg(COLOR_TEXT)),
            Span::styled(
                format!("Title: {title}\u{2581}"),
                if *field == AddField::Title { focused } else { blurred },
            ),
            Span::styled("  ", blurred),
            Span::styled(
                format!("Due: {due}\u{2581}"),
                if *field == AddField::Due { focused } else { blurred },
            ),
            Span::styled(
                "  (tab switches, enter saves, esc cancels)",
                Style::default().fg(COLOR_MUTED_DARK),
            ),
        ]),
        Prompt::Edit { title, .. } => Line::from(vec![
            Span::styled("Edit task  ", Style::default().fg(COLOR_TEXT)),
            Span::styled(format!("Title: {title}\u{2581}"), focused),
            Span::styled(
                "  (enter saves, esc cancels)",
                Style::default().fg(COLOR_MUTED_DARK),
            ),
        ]),
    }
}

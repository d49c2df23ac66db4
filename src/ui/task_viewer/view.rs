use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::filter::{Filter, ListView};
use crate::persistence::TaskPersistence;
use crate::task::Task;

use super::app::{AppState, InputMode, StatusKind};

const COLOR_TEXT: Color = Color::Rgb(229, 231, 235);
const COLOR_MUTED: Color = Color::Rgb(107, 114, 128);
const COLOR_MUTED_DARK: Color = Color::Rgb(75, 85, 99);
const COLOR_ACCENT: Color = Color::Rgb(192, 132, 252);
const COLOR_ACCENT_BG: Color = Color::Rgb(46, 16, 101);
const COLOR_SELECTED_BG: Color = Color::Rgb(31, 31, 36);
const COLOR_ERROR: Color = Color::Rgb(248, 113, 113);
const COLOR_INFO: Color = Color::Rgb(196, 181, 253);

pub fn render<P: TaskPersistence>(frame: &mut Frame, app: &AppState<P>) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(area);

    let view = app.view();
    render_header(frame, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_filter_bar(frame, &view, chunks[2]);
    render_list(frame, app, &view, chunks[3]);
    render_footer(frame, app, &view, chunks[4]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let date = Local::now().format("%A, %B %-d").to_string();
    let lines = vec![
        Line::from(Span::styled(
            "My Tasks",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(date, Style::default().fg(COLOR_MUTED))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_input<P: TaskPersistence>(frame: &mut Frame, app: &AppState<P>, area: Rect) {
    let editing = app.mode == InputMode::Insert;
    let border = if editing { COLOR_ACCENT } else { COLOR_MUTED_DARK };
    let line = if app.input.is_empty() && !editing {
        Line::from(Span::styled(
            "Add a new task...",
            Style::default().fg(COLOR_MUTED_DARK),
        ))
    } else {
        Line::from(vec![
            Span::styled("+ ", Style::default().fg(COLOR_ACCENT)),
            Span::styled(app.input.clone(), Style::default().fg(COLOR_TEXT)),
        ])
    };
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(widget, area);

    if editing {
        let x = area.x + 3 + app.input.chars().count() as u16;
        frame.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

fn render_filter_bar(frame: &mut Frame, view: &ListView<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)].as_ref())
        .split(area);

    let left = Paragraph::new(Span::styled(
        view.items_left_label(),
        Style::default().fg(COLOR_MUTED),
    ));
    frame.render_widget(left, chunks[0]);

    let mut spans = Vec::new();
    for (idx, filter) in Filter::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        let label = format!(" {} ", capitalize(filter.as_str()));
        let style = if *filter == view.filter {
            Style::default()
                .fg(COLOR_ACCENT)
                .bg(COLOR_ACCENT_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        spans.push(Span::styled(label, style));
    }
    let right = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}

fn render_list<P: TaskPersistence>(
    frame: &mut Frame,
    app: &AppState<P>,
    view: &ListView<'_>,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(COLOR_MUTED_DARK));

    if let Some(message) = view.empty_message() {
        let widget = Paragraph::new(vec![
            Line::raw(""),
            Line::from(Span::styled(message, Style::default().fg(COLOR_MUTED))),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(widget, area);
        return;
    }

    // Keep the selected row on screen.
    let height = area.height.saturating_sub(1) as usize;
    let selected = app.selected.unwrap_or(0);
    let offset = if height == 0 || selected < height {
        0
    } else {
        selected + 1 - height
    };

    let lines: Vec<Line<'_>> = view
        .tasks
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, task)| task_row(task, app.selected == Some(idx)))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn task_row(task: &Task, selected: bool) -> Line<'static> {
    let (check, text_style) = if task.completed {
        (
            Span::styled("(✓) ", Style::default().fg(COLOR_ACCENT)),
            Style::default()
                .fg(COLOR_MUTED)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (
            Span::styled("( ) ", Style::default().fg(COLOR_MUTED)),
            Style::default().fg(COLOR_TEXT),
        )
    };
    let marker = if selected { "› " } else { "  " };
    let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(COLOR_ACCENT)),
        check,
        Span::styled(task.text.clone(), text_style),
    ]);
    if selected {
        line.style(Style::default().bg(COLOR_SELECTED_BG))
    } else {
        line
    }
}

fn render_footer<P: TaskPersistence>(
    frame: &mut Frame,
    app: &AppState<P>,
    view: &ListView<'_>,
    area: Rect,
) {
    let mut first = vec![Span::styled(app.footer_hint(), Style::default().fg(COLOR_MUTED))];
    if let Some((status, kind)) = app.status_line() {
        let style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_INFO),
        };
        first.push(Span::raw("  |  "));
        first.push(Span::styled(status.to_string(), style));
    }

    let mut lines = vec![Line::from(first)];
    if view.has_completed {
        lines.push(Line::from(Span::styled(
            "c  Clear completed",
            Style::default().fg(COLOR_MUTED),
        )));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

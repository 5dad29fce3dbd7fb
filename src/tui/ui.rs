use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Line as CanvasLine},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use crate::commands::due_text;
use crate::dial::{self, DialMode};
use super::app::{App, DisplayItem, InputMode, ViewMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    render_tasks(f, app, chunks[0]);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Pending => "q: Quit | a: Add | Space: Done | d: Del | v: Next View",
            _ => "q: Quit | Space: Back to Pending | d: Del | v: Next View",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
        InputMode::Picking => "←/→: Move | Tab: Hours/Minutes | a/p/Space: AM/PM | Enter: OK | c: Clear | Esc: Cancel",
        InputMode::Confirming => "y: Delete | n: Cancel",
        InputMode::Alert => "Any key: OK",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    match app.input_mode {
        InputMode::Adding => render_add_prompt(f, app),
        InputMode::Picking => render_picker(f, app),
        InputMode::Confirming => {
            let name = app
                .pending_delete
                .and_then(|id| app.store.get(id))
                .map(|t| t.name.clone())
                .unwrap_or_default();
            render_dialog(f, "Delete Task", &format!("Delete '{}'? This cannot be undone.", name));
        }
        InputMode::Alert => {
            if let Some((title, message)) = &app.alert {
                render_dialog(f, title, message);
            }
        }
        InputMode::Normal => {}
    }
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let completed_view = app.view_mode != ViewMode::Pending;
    let rows: Vec<Row> = app
        .display_items
        .iter()
        .map(|item| match item {
            DisplayItem::Header(title, count) => Row::new(vec![
                Cell::from(""),
                Cell::from(format!("{} ({})", title, count)),
            ])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            DisplayItem::Task(entry) => {
                let t = &entry.task;
                let when = if completed_view {
                    t.completed_at
                        .map(|at| at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default()
                } else {
                    due_text(t)
                };
                let status = if t.is_completed {
                    "Done"
                } else if entry.is_overdue {
                    "Not completed on time"
                } else {
                    ""
                };
                let style = if t.is_completed {
                    Style::default().fg(Color::DarkGray)
                } else if entry.is_overdue {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(t.id.to_string()),
                    Cell::from(format!("  {}", t.name)),
                    Cell::from(when),
                    Cell::from(t.description.clone().unwrap_or_default()),
                    Cell::from(status),
                ]).style(style)
            }
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Min(20),
        Constraint::Length(22),
    ];

    let when_header = if completed_view { "Completed" } else { "Due" };
    let title = format!("Taskday - {}", app.view_mode.title());
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Name", when_header, "Description", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_add_prompt(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 3, f.area());
    f.render_widget(Clear, area);

    let title = match app.add_state.step {
        0 => "Add Task: Enter Name",
        1 => "Add Task: Enter Description (Optional)",
        2 => "Add Task: Enter Due Date YYYY-MM-DD (Optional)",
        _ => "Add Task",
    };

    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);
}

fn render_picker(f: &mut Frame, app: &App) {
    let area = centered_rect(40, 22, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let picker = &app.picker;
    let active = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(Color::Gray);
    let (hour_style, minute_style) = match picker.mode {
        DialMode::Hours => (active, idle),
        DialMode::Minutes => (idle, active),
    };
    let header = Line::from(vec![
        Span::styled(format!("{:02}", picker.time.hour12()), hour_style),
        Span::raw(":"),
        Span::styled(format!("{:02}", picker.time.minute()), minute_style),
        Span::raw("  "),
        Span::styled(picker.time.period().to_string(), active),
    ]);
    f.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL).title("Set Time")),
        chunks[0],
    );

    let radius = app.dial_radius;
    let bound = radius + 20.0;
    let marks = dial::dial_marks(picker.mode, radius);
    let (tip_x, tip_y) = dial::polar_offset(dial::hand_angle(picker.mode, &picker.time), radius * 0.75);

    // Canvas y grows upwards, dial offsets grow downwards.
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL))
        .x_bounds([-bound, bound])
        .y_bounds([-bound, bound])
        .paint(move |ctx| {
            ctx.draw(&Circle { x: 0.0, y: 0.0, radius: radius + 12.0, color: Color::DarkGray });
            ctx.draw(&CanvasLine { x1: 0.0, y1: 0.0, x2: tip_x, y2: -tip_y, color: Color::Yellow });
            for mark in &marks {
                let style = if dial::is_selected(mark, picker.mode, &picker.time) {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                };
                ctx.print(mark.x - 4.0, -mark.y, Span::styled(mark.label.clone(), style));
            }
        });
    f.render_widget(canvas, chunks[1]);
}

fn render_dialog(f: &mut Frame, title: &str, message: &str) {
    let area = centered_rect(50, 5, f.area());
    f.render_widget(Clear, area);
    let dialog = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, InputMode};
use crate::draft::deadline_offset;
use crate::schedule::{deadline_status, DeadlineStatus};
use crate::timeutil::format_unix_time;
use crate::toast::ToastType;

pub fn ui(f: &mut Frame, app: &mut App) {
    let mut constraints = vec![
        Constraint::Min(0),    // Table
        Constraint::Length(3), // Help
    ];
    if app.toast.is_showing() {
        constraints.push(Constraint::Length(3)); // Toast
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let now = Utc::now();
    let rows: Vec<Row> = app
        .visible
        .iter()
        .map(|t| {
            let assignee = app
                .session
                .users
                .iter()
                .find(|u| u.id == t.assigned_user)
                .map(|u| u.name.clone())
                .unwrap_or_default();
            let deadline = if t.deadline > 0 {
                format_unix_time(t.deadline, deadline_offset())
            } else {
                String::new()
            };

            let overdue = deadline_status(t.deadline, now) == DeadlineStatus::Overdue;
            let mut labels = Vec::new();
            if t.recurring_interval.is_some() {
                labels.push("Recurring");
            }
            if overdue {
                labels.push("Overdue");
            }

            let style = if t.completed {
                Style::default().fg(Color::DarkGray)
            } else if overdue {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.description.clone()),
                Cell::from(assignee),
                Cell::from(deadline),
                Cell::from(labels.join(" ")),
                Cell::from(if t.completed { "Done" } else { "Open" }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Task", "Assignee", "Deadline", "Labels", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("Taskhub - Your tasks ({})", app.visible.len())))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => {
            "q: Quit | a: Add | Space: Complete | d: Del | r: Refresh | c: Toggle Done | x: Dismiss Toast"
        }
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    if let Some(toast) = &app.toast.current {
        let (title, color) = match toast.kind {
            ToastType::Info => ("Info", Color::Blue),
            ToastType::Success => ("Success", Color::Green),
            ToastType::Warning => ("Warning", Color::Yellow),
            ToastType::Error => ("Error", Color::Red),
        };
        let body = format!("{} ({}s)", toast.message, toast.closing_in_seconds);
        let widget = Paragraph::new(body)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(widget, chunks[2]);
    }

    // Render the wizard input box if needed
    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area); // Clear the area first

        let title = match app.add_state.step {
            0 => "Add Task: Enter Description",
            1 => "Add Task: Enter Due Date (YYYY-MM-DD, Optional)",
            2 => "Add Task: Enter Due Time (HH:MM, Optional)",
            3 => "Add Task: Enter Recurrence (Optional)",
            4 => "Add Task: Enter Assigned Team (Optional)",
            5 => "Add Task: Enter Assignee (Defaults to You)",
            6 => "Add Task: Enter Notes (Optional)",
            _ => "Add Task",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
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

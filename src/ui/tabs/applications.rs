use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::ApplicationStatus;
use crate::ui::styles;
use crate::utils::{format_date, format_phone};

/// Render the Applications tab - career applications with review status
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_application_table(frame, app, chunks[0]);
    render_application_detail(frame, app, chunks[1]);
}

fn status_style(status: ApplicationStatus) -> ratatui::style::Style {
    match status {
        ApplicationStatus::New => styles::highlight_style(),
        ApplicationStatus::Reviewed => styles::list_item_style(),
        ApplicationStatus::Shortlisted => styles::success_style(),
        ApplicationStatus::Rejected => styles::muted_style(),
    }
}

fn render_application_table(frame: &mut Frame, app: &App, area: Rect) {
    let applications = app.get_filtered_applications();
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Position"),
        Cell::from("Status"),
        Cell::from("Date"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = applications
        .iter()
        .map(|application| {
            let date = application
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(application.name.clone()),
                Cell::from(application.position.clone()),
                Cell::from(
                    Span::styled(application.status.label(), status_style(application.status)),
                ),
                Cell::from(date),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let title = format!(" Applications ({}) ", applications.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !applications.is_empty() {
        state.select(Some(app.applications_selection.min(applications.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_application_detail(frame: &mut Frame, app: &App, area: Rect) {
    let applications = app.get_filtered_applications();
    let selected = applications.get(app.applications_selection);
    let focused = matches!(app.focus, Focus::Detail);

    let content = match selected {
        Some(application) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                application.name.clone(),
                styles::title_style(),
            )));
            lines.push(Line::from(Span::styled(
                application.position.clone(),
                styles::highlight_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("Status:   ", styles::muted_style()),
                Span::styled(
                    application.status.label(),
                    status_style(application.status),
                ),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Email:    ", styles::muted_style()),
                Span::raw(application.email.clone()),
            ]));

            if let Some(ref phone) = application.phone {
                lines.push(Line::from(vec![
                    Span::styled("Phone:    ", styles::muted_style()),
                    Span::raw(format_phone(phone)),
                ]));
            }

            if let Some(ref resume) = application.resume_url {
                lines.push(Line::from(vec![
                    Span::styled("Resume:   ", styles::muted_style()),
                    Span::raw(resume.clone()),
                ]));
            }

            if let Some(ref created) = application.created_at {
                lines.push(Line::from(vec![
                    Span::styled("Applied:  ", styles::muted_style()),
                    Span::raw(format_date(created)),
                ]));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Cover message",
                styles::highlight_style(),
            )));
            lines.push(Line::from(Span::raw(
                application.message_display().to_string(),
            )));

            lines
        }
        None => vec![Line::from(Span::styled(
            "No application selected",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Detail ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        );

    frame.render_widget(paragraph, area);
}

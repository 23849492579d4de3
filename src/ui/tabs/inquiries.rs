use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::{format_date, format_phone};

/// Render the Inquiries tab - contact form submissions
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_inquiry_table(frame, app, chunks[0]);
    render_inquiry_detail(frame, app, chunks[1]);
}

fn render_inquiry_table(frame: &mut Frame, app: &App, area: Rect) {
    let inquiries = app.get_filtered_inquiries();
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from(" "),
        Cell::from("From"),
        Cell::from("Subject"),
        Cell::from("Date"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = inquiries
        .iter()
        .map(|inquiry| {
            let date = inquiry
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());

            // Unread inquiries get the accent marker and brighter text
            let row_style = if inquiry.read {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(Span::styled(inquiry.read_marker(), styles::highlight_style())),
                Cell::from(inquiry.name.clone()),
                Cell::from(inquiry.subject_display().to_string()),
                Cell::from(date),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Percentage(28),
        Constraint::Fill(2),
        Constraint::Length(12),
    ];

    let unread = app.inquiries.iter().filter(|i| !i.read).count();
    let title = format!(" Inquiries ({}, {} unread) ", inquiries.len(), unread);

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
    if !inquiries.is_empty() {
        state.select(Some(app.inquiries_selection.min(inquiries.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_inquiry_detail(frame: &mut Frame, app: &App, area: Rect) {
    let inquiries = app.get_filtered_inquiries();
    let selected = inquiries.get(app.inquiries_selection);
    let focused = matches!(app.focus, Focus::Detail);

    let content = match selected {
        Some(inquiry) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                inquiry.subject_display().to_string(),
                styles::title_style(),
            )));
            lines.push(Line::from(""));

            lines.push(Line::from(vec![
                Span::styled("From:     ", styles::muted_style()),
                Span::raw(inquiry.name.clone()),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Email:    ", styles::muted_style()),
                Span::raw(inquiry.email.clone()),
            ]));

            if let Some(ref phone) = inquiry.phone {
                lines.push(Line::from(vec![
                    Span::styled("Phone:    ", styles::muted_style()),
                    Span::raw(format_phone(phone)),
                ]));
            }

            if let Some(ref created) = inquiry.created_at {
                lines.push(Line::from(vec![
                    Span::styled("Received: ", styles::muted_style()),
                    Span::raw(format_date(created)),
                ]));
            }

            let read_label = if inquiry.read { "read" } else { "unread" };
            lines.push(Line::from(vec![
                Span::styled("Marked:   ", styles::muted_style()),
                Span::raw(read_label),
            ]));

            lines.push(Line::from(""));
            lines.push(Line::from(Span::raw(inquiry.message.clone())));

            lines
        }
        None => vec![Line::from(Span::styled(
            "No inquiry selected",
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

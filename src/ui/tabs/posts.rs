use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::{format_date, truncate_string};

/// Render the Posts tab - list of blog posts with a detail pane
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_post_table(frame, app, chunks[0]);
    render_post_detail(frame, app, chunks[1]);
}

fn render_post_table(frame: &mut Frame, app: &App, area: Rect) {
    let posts = app.get_filtered_posts();
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("St"),
        Cell::from("Title"),
        Cell::from("Author"),
        Cell::from("Date"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = posts
        .iter()
        .map(|post| {
            let status = if post.published { "✓" } else { "·" };
            let date = post
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(status),
                Cell::from(post.title.clone()),
                Cell::from(post.author_display().to_string()),
                Cell::from(date),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Percentage(50),
        Constraint::Fill(2),
        Constraint::Length(12),
    ];

    let title = format!(" Posts ({}) ", posts.len());

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
    if !posts.is_empty() {
        state.select(Some(app.posts_selection.min(posts.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_post_detail(frame: &mut Frame, app: &App, area: Rect) {
    let posts = app.get_filtered_posts();
    let selected = posts.get(app.posts_selection);
    let focused = matches!(app.focus, Focus::Detail);

    let content = match selected {
        Some(post) => {
            let mut lines = vec![];

            lines.push(Line::from(Span::styled(
                post.title.clone(),
                styles::title_style(),
            )));
            let deck = post.summary();
            if !deck.is_empty() {
                lines.push(Line::from(Span::styled(deck, styles::muted_style())));
            }
            lines.push(Line::from(""));

            let status_style = if post.published {
                styles::success_style()
            } else {
                styles::muted_style()
            };
            lines.push(Line::from(vec![
                Span::styled("Status:   ", styles::muted_style()),
                Span::styled(post.status_label(), status_style),
            ]));

            lines.push(Line::from(vec![
                Span::styled("Author:   ", styles::muted_style()),
                Span::raw(post.author_display().to_string()),
            ]));

            if let Some(ref slug) = post.slug {
                lines.push(Line::from(vec![
                    Span::styled("Slug:     ", styles::muted_style()),
                    Span::raw(slug.clone()),
                ]));
            }

            if let Some(ref created) = post.created_at {
                lines.push(Line::from(vec![
                    Span::styled("Created:  ", styles::muted_style()),
                    Span::raw(format_date(created)),
                ]));
            }

            lines.push(Line::from(""));

            let body = post.plain_content();
            if body.is_empty() {
                lines.push(Line::from(Span::styled("(no content)", styles::muted_style())));
            } else {
                // Cap the body so a long article doesn't drown the pane
                for chunk in truncate_string(&body, 1200).split('\n') {
                    lines.push(Line::from(Span::raw(chunk.to_string())));
                }
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "No post selected",
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

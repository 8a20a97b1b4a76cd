// UI module for rendering the TUI.
// Draws the query header, fetch/search progress, and the ranked results list.

mod list;

pub use list::format_result_line;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::SessionState;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled("Query: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.terms.join(" "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", app.strategy),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Draw the progress indicator, results, or error for the current phase.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.session.state().clone() {
        SessionState::Idle => {
            let message = format!("{} Starting...", app.spinner());
            list::render_status(frame, area, message, Color::Yellow);
        }
        SessionState::Fetching { count, from_cache } => {
            let source = if from_cache { " (from cache)" } else { "" };
            list::render_status(
                frame,
                area,
                format!(
                    "{} Fetching starred repositories: {}{}",
                    app.spinner(),
                    count,
                    source
                ),
                Color::Yellow,
            );
        }
        SessionState::Searching { count } => {
            list::render_status(
                frame,
                area,
                format!("{} Searching {} repositories...", app.spinner(), count),
                Color::Yellow,
            );
        }
        SessionState::Done { results, searched } => {
            list::render_results(frame, &results, searched, &mut app.list_state, area);
        }
        SessionState::Failed { message } => {
            list::render_status(frame, area, format!("✗ {}", message), Color::Red);
        }
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " q quit  j/k move ",
        Style::default().fg(Color::DarkGray),
    )];
    if app.session.from_cache() {
        spans.push(Span::styled(
            " cached ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// Result list rendering.
// Provides the ranked results view and centered status messages.

use ratatui::{prelude::*, widgets::*};

use crate::search::SearchResultItem;

/// Format a result as `score name (url)`.
pub fn format_result_line(item: &SearchResultItem) -> String {
    format!(
        "{:>7} {} ({})",
        format_score(item.score),
        item.repository.name,
        item.repository.url
    )
}

/// Whole scores print without decimals; engine scores keep two.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as u64)
    } else {
        format!("{:.2}", score)
    }
}

/// Render a centered status message.
pub fn render_status(frame: &mut Frame, area: Rect, message: String, color: Color) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color));
    frame.render_widget(text, area);
}

/// Render the ranked results.
pub fn render_results(
    frame: &mut Frame,
    results: &[SearchResultItem],
    searched: usize,
    list_state: &mut ListState,
    area: Rect,
) {
    let title = format!(" Results: {} of {} ", results.len(), searched);
    let block = Block::default().borders(Borders::ALL).title(title);

    if results.is_empty() {
        let text = Paragraph::new("No matching repositories")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|item| {
            let description = if item.repository.description.is_empty() {
                Span::raw("")
            } else {
                Span::styled(
                    format!("  {}", item.repository.description),
                    Style::default().fg(Color::DarkGray),
                )
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>7} ", format_score(item.score)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    item.repository.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({})", item.repository.url),
                    Style::default().fg(Color::Blue),
                ),
                description,
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Repository;

    #[test]
    fn test_format_result_line() {
        let item = SearchResultItem {
            repository: Repository::new("jolt", "https://github.com/phatblat/jolt", "", ""),
            score: 112.0,
        };
        assert_eq!(
            format_result_line(&item),
            "    112 jolt (https://github.com/phatblat/jolt)"
        );
    }

    #[test]
    fn test_format_fractional_score() {
        assert_eq!(format_score(0.4567), "0.46");
        assert_eq!(format_score(3.0), "3");
    }
}

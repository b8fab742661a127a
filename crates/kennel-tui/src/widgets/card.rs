//! A single dog card for the collection grid.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use kennel_core::DogRecord;

use crate::theme;

/// Rows a card occupies in the grid, border included.
pub const CARD_HEIGHT: u16 = 7;

/// Render one dog card. The selected card gets the focused border.
pub fn render(frame: &mut Frame, area: Rect, dog: &DogRecord, selected: bool) {
    let border_style = if selected {
        theme::border_focused()
    } else {
        theme::border_default()
    };

    let mut title_spans = vec![Span::styled(format!(" {} ", dog.name), theme::title_style())];
    if dog.is_favorite {
        title_spans.push(Span::styled("♥ ", theme::heart_style()));
    }

    let mut block = Block::default()
        .title(Line::from(title_spans))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    if selected {
        block = block.style(ratatui::style::Style::default().bg(theme::BG_HIGHLIGHT));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::with_capacity(4);

    let mut tags = vec![Span::styled(format!("[{}]", dog.breed), theme::tag_style())];
    if let Some(age) = dog.age {
        tags.push(Span::raw(" "));
        tags.push(Span::styled(
            format!("[{age} yr{}]", if age == 1 { "" } else { "s" }),
            theme::tag_style(),
        ));
    }
    lines.push(Line::from(tags));

    if let Some(ref color) = dog.color {
        lines.push(Line::from(vec![
            Span::styled("Color: ", theme::key_hint()),
            Span::styled(color.clone(), theme::card_text()),
        ]));
    }

    if let Some(ref description) = dog.description {
        lines.push(Line::from(Span::styled(
            truncate(description, usize::from(inner.width).saturating_mul(2)),
            theme::key_hint(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

/// Truncate to `max` characters, appending an ellipsis when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate("good dog", 20), "good dog");
    }

    #[test]
    fn truncate_cuts_and_appends_ellipsis() {
        assert_eq!(truncate("a very good dog indeed", 10), "a very go…");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("çççç", 4), "çççç");
    }
}

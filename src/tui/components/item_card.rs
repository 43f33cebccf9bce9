use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::catalog::types::MAX_RATING;
use crate::catalog::{CatalogItem, ItemDetails};

/// Rows a card occupies in the grid, borders included.
pub const CARD_HEIGHT: u16 = 7;

/// A single course or mentor card.
///
/// Transient: built each frame from a borrowed item. `highlighted` comes
/// from the owning view (grid selection or strip focus).
#[derive(Clone, Copy)]
pub struct ItemCard<'a> {
    pub item: &'a CatalogItem,
    pub highlighted: bool,
}

impl<'a> ItemCard<'a> {
    pub fn new(item: &'a CatalogItem, highlighted: bool) -> Self {
        Self { item, highlighted }
    }
}

/// `★★★★☆ 4.3`, rounded to the nearest whole star.
pub fn rating_stars(rating: f64) -> String {
    let filled = rating.round().clamp(0.0, MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{} {:.1}", "★".repeat(filled), "☆".repeat(empty), rating)
}

impl<'a> Widget for ItemCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = match self.item.details {
            ItemDetails::Course { .. } => Color::Green,
            ItemDetails::Mentor { .. } => Color::Magenta,
        };

        let border_style = if self.highlighted {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(accent).add_modifier(Modifier::DIM)
        };

        let mut lines = vec![
            Line::from(Span::styled(
                self.item.meta_line(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                rating_stars(self.item.rating),
                Style::default().fg(Color::Yellow),
            )),
        ];
        if let ItemDetails::Mentor { featured: true, .. } = self.item.details {
            lines.push(Line::from(Span::styled(
                "Featured mentor",
                Style::default().fg(accent),
            )));
        }
        lines.push(Line::from(self.item.summary()));

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(format!(" {} ", self.item.title))
                    .border_style(border_style)
                    .title_style(border_style)
                    .padding(Padding::horizontal(1)),
            )
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn mentor() -> CatalogItem {
        CatalogItem {
            id: "m1".into(),
            title: "Priya Raman".into(),
            short_description: Some("Helps engineers move into staff roles.".into()),
            description: None,
            image: None,
            tag: Some("Acme".into()),
            rating: 4.6,
            order: 0,
            active: true,
            link: None,
            details: ItemDetails::Mentor {
                role: Some("Staff Engineer".into()),
                company: Some("Acme".into()),
                featured: true,
            },
        }
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(4.8), "★★★★★ 4.8");
        assert_eq!(rating_stars(4.3), "★★★★☆ 4.3");
        assert_eq!(rating_stars(0.0), "☆☆☆☆☆ 0.0");
    }

    #[test]
    fn test_card_renders_title_meta_and_summary() {
        let backend = TestBackend::new(60, CARD_HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let item = mentor();

        terminal
            .draw(|f| {
                f.render_widget(ItemCard::new(&item, true), f.area());
            })
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Priya Raman"));
        assert!(text.contains("Staff Engineer | Acme"));
        assert!(text.contains("Featured mentor"));
        assert!(text.contains("Helps engineers"));
    }
}

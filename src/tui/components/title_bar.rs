//! # TitleBar Component
//!
//! Top status bar: app name, section tabs and the status message.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(tabs, app.active, app.status_message.clone());
//! title_bar.render(frame, area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Status message**: `"Redefine │ Courses · [All Courses] · Mentors │ Loading..."`
//! 2. **Default**: `"Redefine │ Courses · [All Courses] · Mentors"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    /// Section titles, in order.
    pub tabs: Vec<String>,
    /// Index of the visible section.
    pub active: usize,
    /// Status message (e.g., "Loading catalog...", "Submitting...")
    pub status_message: String,
}

impl TitleBar {
    pub fn new(tabs: Vec<String>, active: usize, status_message: String) -> Self {
        Self {
            tabs,
            active,
            status_message,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Redefine", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" │ "),
        ];

        for (i, tab) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
            }
            if i == self.active {
                spans.push(Span::styled(
                    format!("[{tab}]"),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(tab.clone(), Style::default().fg(Color::Gray)));
            }
        }

        if !self.status_message.is_empty() {
            spans.push(Span::raw(" │ "));
            spans.push(Span::raw(self.status_message.clone()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn tabs() -> Vec<String> {
        vec!["Courses".into(), "All Courses".into(), "Mentors".into()]
    }

    fn render_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_marks_active_tab() {
        let mut title_bar = TitleBar::new(tabs(), 1, "Loading catalog...".to_string());
        let text = render_text(&mut title_bar);

        assert!(text.contains("Redefine"));
        assert!(text.contains("Courses"));
        assert!(text.contains("[All Courses]"));
        assert!(!text.contains("[Mentors]"));
        assert!(text.contains("Loading catalog..."));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new(tabs(), 0, String::new());
        let text = render_text(&mut title_bar);

        assert!(text.contains("[Courses]"));
        assert_eq!(text.matches('│').count(), 1);
    }
}

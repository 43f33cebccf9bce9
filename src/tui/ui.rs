use crate::Section;
use crate::core::catalog_view::PresentationMode;
use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{CatalogPanel, InquiryFormOverlay, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Key hints for browse mode, adjusted to the active section's layout.
fn help_line(app: &App) -> Line<'static> {
    let mode_hint = match app.active_section().map(|v| v.mode()) {
        Some(PresentationMode::Strip) => "m Grid",
        _ => "m Strip",
    };
    let hints = [
        ("Tab", "Section"),
        ("←→↑↓", "Move"),
        ("Enter", "Ask"),
        ("c", "Contact"),
        ("r", "Refresh"),
        (mode_hint, ""),
        ("Ctrl+C", "Quit"),
    ];

    let key_style = Style::default().fg(Color::Cyan);
    let text_style = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();
    for (key, text) in hints {
        spans.push(Span::styled(format!(" {key}"), key_style));
        if !text.is_empty() {
            spans.push(Span::styled(format!(" {text}"), text_style));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

pub fn draw_ui(frame: &mut Frame, app: &App, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    let tabs = Section::ALL.iter().map(|s| s.title().to_string()).collect();
    TitleBar::new(tabs, app.active, app.status_message.clone()).render(frame, title_area);

    if let Some(view) = app.active_section() {
        CatalogPanel::new(view, spinner_frame).render(frame, inset(main_area));
    }

    frame.render_widget(help_line(app), help_area);

    if let Some(session) = app.active_form() {
        InquiryFormOverlay::new(session).render(frame, main_area);
    }
}

/// One column of breathing room on either side of the catalog.
fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        width: area.width.saturating_sub(2),
        ..area
    }
}

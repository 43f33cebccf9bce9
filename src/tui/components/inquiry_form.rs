//! # Inquiry Form Component
//!
//! Centered overlay for an open [`FormSession`]: one row per field, the
//! field's error text under it, and a banner for the submission state.
//!
//! Transient render wrapper: the session itself lives in core state and is
//! borrowed for the frame.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::core::inquiry::FormSession;
use crate::core::submission::SubmissionState;
use crate::core::validation::{Field, FieldSource};
use crate::tui::component::Component;

/// Rows per field: label + value, error line.
const FIELD_ROWS: u16 = 2;
/// Columns taken by the focus marker and the padded label.
const LABEL_COLUMNS: usize = 20;

pub struct InquiryFormOverlay<'a> {
    session: &'a FormSession,
}

impl<'a> InquiryFormOverlay<'a> {
    pub fn new(session: &'a FormSession) -> Self {
        Self { session }
    }

    /// Banner text and style for the current submission state, if any.
    fn banner(&self) -> Option<(String, Style)> {
        match self.session.pipeline.state() {
            SubmissionState::Idle => None,
            SubmissionState::Submitting => Some((
                "Sending your query...".to_string(),
                Style::default().fg(Color::Yellow),
            )),
            SubmissionState::Succeeded => Some((
                "Query submitted successfully! We'll get back to you soon.".to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            SubmissionState::Failed(message) => {
                Some((message.clone(), Style::default().fg(Color::Red)))
            }
        }
    }

    fn field_lines(&self, field: Field, width: usize) -> [Line<'static>; 2] {
        let pipeline = &self.session.pipeline;
        let focused = self.session.focus == field;
        let room = width.saturating_sub(LABEL_COLUMNS + 1);
        let value = visible_tail(pipeline.form().value(field), room).to_string();

        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if focused { "› " } else { "  " };
        let cursor = if focused && !pipeline.is_submitting() { "▏" } else { "" };

        let value_line = Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<18}", field.label()), label_style),
            Span::raw(value),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]);

        let error_line = match pipeline.errors().get(field) {
            Some(kind) => Line::from(Span::styled(
                format!(
                    "{:width$}{}",
                    "",
                    kind.message(field),
                    width = LABEL_COLUMNS
                ),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        };

        [value_line, error_line]
    }
}

impl<'a> Component for InquiryFormOverlay<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 70, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let help_text = if self.session.pipeline.is_submitting() {
            " Sending... "
        } else {
            " Enter Submit  Tab/↓ Next  ↑ Prev  Esc Close "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.session.title()))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [banner_area, fields_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(Field::ALL.len() as u16 * FIELD_ROWS),
        ])
        .areas(inner);

        if let Some((text, style)) = self.banner() {
            frame.render_widget(
                Paragraph::new(Span::styled(text, style))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                banner_area,
            );
        }

        let lines: Vec<Line> = Field::ALL
            .iter()
            .flat_map(|field| self.field_lines(*field, fields_area.width as usize))
            .collect();
        frame.render_widget(Paragraph::new(lines), fields_area);
    }
}

/// The longest suffix of `value` that fits in `width` columns, so the end
/// of a long entry (where typing happens) stays visible.
fn visible_tail(value: &str, width: usize) -> &str {
    let mut used = 0;
    for (offset, ch) in value.char_indices().rev() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &value[offset + ch.len_utf8()..];
        }
    }
    value
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

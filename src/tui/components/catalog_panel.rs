//! # Catalog Panel Component
//!
//! Renders one [`ContentCatalogView`] as a pure function of its state:
//!
//! | phase     | rendering                                      |
//! |-----------|------------------------------------------------|
//! | Idle      | nothing                                        |
//! | Loading   | spinner + "Loading courses..."                 |
//! | Failed    | bordered error block with the generic message  |
//! | Empty     | "No courses available right now."              |
//! | Populated | grid of cards, or a strip + highlight details  |
//!
//! Strip mode shows the rotation window side by side, position dots and
//! the full details of the highlighted item underneath.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::catalog::{CatalogItem, ItemDetails};
use crate::core::catalog_view::{CatalogPhase, ContentCatalogView, PresentationMode};
use crate::core::fetcher::FetchState;
use crate::tui::component::Component;
use crate::tui::components::item_card::{CARD_HEIGHT, ItemCard, rating_stars};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const GRID_COLUMNS: usize = 3;

pub struct CatalogPanel<'a> {
    pub view: &'a ContentCatalogView,
    pub spinner_frame: usize,
}

impl<'a> CatalogPanel<'a> {
    pub fn new(view: &'a ContentCatalogView, spinner_frame: usize) -> Self {
        Self {
            view,
            spinner_frame,
        }
    }

    fn render_centered(frame: &mut Frame, area: Rect, line: Line) {
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), middle);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let highlight = self.view.highlight_index();
        let visible = self.view.visible_items();
        let rows = visible.chunks(GRID_COLUMNS);

        let max_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        // Keep the highlighted row on screen.
        let highlight_row = highlight.map(|i| i / GRID_COLUMNS).unwrap_or(0);
        let first_row = highlight_row.saturating_sub(max_rows - 1);

        for (r, row) in rows.skip(first_row).take(max_rows).enumerate() {
            let row_area = Rect {
                y: area.y + r as u16 * CARD_HEIGHT,
                height: CARD_HEIGHT.min(area.height.saturating_sub(r as u16 * CARD_HEIGHT)),
                ..area
            };
            let columns =
                Layout::horizontal([Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                    .split(row_area);
            for ((index, item), cell) in row.iter().zip(columns.iter()) {
                frame.render_widget(ItemCard::new(item, highlight == Some(*index)), *cell);
            }
        }
    }

    fn render_strip(&self, frame: &mut Frame, area: Rect) {
        let [cards_area, dots_area, details_area] = Layout::vertical([
            Constraint::Length(CARD_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        let highlight = self.view.highlight_index();
        let visible = self.view.visible_items();
        let columns = Layout::horizontal(vec![
            Constraint::Ratio(1, visible.len().max(1) as u32);
            visible.len()
        ])
        .split(cards_area);
        for ((index, item), cell) in visible.iter().zip(columns.iter()) {
            frame.render_widget(ItemCard::new(item, highlight == Some(*index)), *cell);
        }

        let current = self.view.rotator().current_index();
        let dots: Vec<Span> = (0..self.view.items().len())
            .map(|i| {
                if i == current {
                    Span::styled("● ", Style::default().fg(Color::Cyan))
                } else {
                    Span::styled("○ ", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(dots)).alignment(Alignment::Center),
            dots_area,
        );

        if let Some(item) = self.view.highlight() {
            frame.render_widget(details(item), details_area);
        }
    }
}

/// Full details for the highlighted item.
fn details(item: &CatalogItem) -> Paragraph<'_> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            item.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(item.meta_line()),
        Line::from(Span::styled(
            rating_stars(item.rating),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];

    let body = item
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| item.summary());
    lines.push(Line::from(body));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Image: ", label),
        Span::raw(item.media_url().to_string()),
    ]));
    if let Some(link) = &item.link {
        lines.push(Line::from(vec![
            Span::styled("Page: ", label),
            Span::raw(link.clone()),
        ]));
    }
    let hint = match item.details {
        ItemDetails::Course { .. } => " Enter Enquire about this course ",
        ItemDetails::Mentor { .. } => " Enter Ask this mentor ",
    };

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_style(Style::default().fg(Color::DarkGray))
                .title_bottom(Line::from(hint).centered()),
        )
        .wrap(Wrap { trim: true })
}

impl<'a> Component for CatalogPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let noun = self.view.kind().noun();
        match self.view.phase() {
            CatalogPhase::Idle => {}
            CatalogPhase::Loading => {
                let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
                Self::render_centered(
                    frame,
                    area,
                    Line::from(vec![
                        Span::styled(spinner, Style::default().fg(Color::Cyan)),
                        Span::raw(format!(" Loading {noun}...")),
                    ]),
                );
            }
            CatalogPhase::Failed => {
                let message = match self.view.fetch_state() {
                    FetchState::Failed(message) => message.as_str(),
                    _ => "",
                };
                let block = Paragraph::new(vec![
                    Line::from(message.to_string()),
                    Line::from(Span::styled(
                        "Press r to retry",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .block(
                    Block::bordered()
                        .title(" ERROR ")
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center);
                let [_, middle, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(4),
                    Constraint::Fill(1),
                ])
                .areas(area);
                frame.render_widget(block, middle);
            }
            CatalogPhase::Empty => {
                Self::render_centered(
                    frame,
                    area,
                    Line::from(Span::styled(
                        format!("No {noun} available right now."),
                        Style::default().fg(Color::DarkGray),
                    )),
                );
            }
            CatalogPhase::Populated => match self.view.mode() {
                PresentationMode::Grid => self.render_grid(frame, area),
                PresentationMode::Strip => self.render_strip(frame, area),
            },
        }
    }
}

//! Store quote cards and margin line

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::types::{ComparisonResult, MarginStatus};

/// Card dimensions
const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 6;

/// Spacing between cards
const CARD_GAP: u16 = 2;

/// Upper bound on columns so three marketplaces sit on one row
const MAX_COLS: usize = 4;

/// Calculate number of cards per row based on available width
fn cards_per_row(width: u16) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + CARD_GAP)) as usize;
    cards.clamp(1, MAX_COLS)
}

/// Cut `text` to `max` columns, ending with an ellipsis when shortened
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Quote cards, one per store, followed by the margin line
pub struct QuotesView<'a> {
    result: &'a ComparisonResult,
    margin: Option<&'a MarginStatus>,
    fetched_at: Option<DateTime<Local>>,
    theme: Theme,
}

impl<'a> QuotesView<'a> {
    pub fn new(result: &'a ComparisonResult, theme: Theme) -> Self {
        Self {
            result,
            margin: None,
            fetched_at: None,
            theme,
        }
    }

    pub fn with_margin(mut self, margin: Option<&'a MarginStatus>) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_fetched_at(mut self, fetched_at: Option<DateTime<Local>>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    /// Height needed for the card grid at `width`
    pub fn grid_height(&self, width: u16) -> u16 {
        let cols = cards_per_row(width);
        let rows = self.result.len().div_ceil(cols);
        (rows as u16) * (CARD_HEIGHT + 1)
    }

    fn cheapest_store(&self) -> Option<&str> {
        self.margin
            .and_then(MarginStatus::summary)
            .map(|s| s.cheapest_store.as_str())
    }

    /// Margin line text; None when it should not be shown
    fn margin_text(&self) -> Option<String> {
        // A single store has nothing to compare against
        if self.result.len() < 2 {
            return None;
        }
        self.margin
            .map(|m| format!("Estimated Profit Margin: {}", m.display()))
    }
}

impl Widget for QuotesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.result.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No stores returned a price for this product",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let cols = cards_per_row(area.width);
        let chunks = Layout::vertical([
            Constraint::Length(self.grid_height(area.width)), // Card grid
            Constraint::Length(1),                            // Margin
            Constraint::Length(1),                            // Updated at
            Constraint::Min(0),                               // Remaining
        ])
        .split(area);

        self.render_card_grid(chunks[0], buf, cols);
        self.render_margin(chunks[1], buf);
        self.render_fetched_at(chunks[2], buf);
    }
}

impl QuotesView<'_> {
    fn render_card_grid(&self, area: Rect, buf: &mut Buffer, cols: usize) {
        let cards = self.build_cards();
        let cols = cols.min(cards.len()).max(1);

        let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * CARD_GAP;
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_x = start_x + (col as u16) * (CARD_WIDTH + CARD_GAP);
            let card_y = area.y + (row as u16) * (CARD_HEIGHT + 1);

            // Skip if card is outside area
            if card_y + CARD_HEIGHT > area.y + area.height {
                continue;
            }

            let card_area = Rect {
                x: card_x,
                y: card_y,
                width: CARD_WIDTH.min(area.width),
                height: CARD_HEIGHT,
            };
            self.render_card(card_area, buf, card);
        }
    }

    fn build_cards(&self) -> Vec<QuoteCard> {
        let cheapest = self.cheapest_store();
        self.result
            .iter()
            .map(|(store, quote)| {
                let best = Some(store.as_str()) == cheapest;
                QuoteCard {
                    store: store.clone(),
                    price: quote.price.clone(),
                    url: quote.url.clone(),
                    best,
                    border_color: if best {
                        self.theme.best()
                    } else {
                        self.theme.muted()
                    },
                }
            })
            .collect()
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer, card: &QuoteCard) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(card.border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let lines = [
            (
                truncate(&card.store, width),
                Style::default()
                    .fg(self.theme.header())
                    .add_modifier(Modifier::BOLD),
            ),
            (
                truncate(&card.price, width),
                Style::default()
                    .fg(self.theme.price())
                    .add_modifier(Modifier::BOLD),
            ),
            (
                truncate(&card.url, width),
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::UNDERLINED),
            ),
            (
                if card.best {
                    "best price".to_string()
                } else {
                    String::new()
                },
                Style::default().fg(self.theme.best()),
            ),
        ];

        for (offset, (text, style)) in lines.iter().enumerate() {
            let y = inner.y + offset as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let x = inner.x + (inner.width.saturating_sub(text.chars().count() as u16)) / 2;
            buf.set_string(x, y, text, *style);
        }
    }

    fn render_margin(&self, area: Rect, buf: &mut Buffer) {
        let Some(text) = self.margin_text() else {
            return;
        };
        let color = match self.margin {
            Some(MarginStatus::Available(_)) => self.theme.best(),
            _ => self.theme.muted(),
        };
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_fetched_at(&self, area: Rect, buf: &mut Buffer) {
        if let Some(at) = self.fetched_at {
            Paragraph::new(Line::from(Span::styled(
                format!("Updated {}", at.format("%H:%M:%S")),
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
        }
    }
}

/// Internal card representation
struct QuoteCard {
    store: String,
    price: String,
    url: String,
    best: bool,
    border_color: Color,
}

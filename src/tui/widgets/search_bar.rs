//! Search input with the compare button

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use super::spinner::Spinner;
use crate::tui::theme::Theme;

const PLACEHOLDER: &str = "Search product";
const BUTTON_LABEL: &str = "[ Compare Prices ]";
const CURSOR: char = '█';

/// Search bar widget
pub struct SearchBar<'a> {
    input: &'a str,
    focused: bool,
    /// Spinner frame while a search is in flight
    loading: Option<usize>,
    theme: Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(input: &'a str, theme: Theme) -> Self {
        Self {
            input,
            focused: true,
            loading: None,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn loading(mut self, frame: Option<usize>) -> Self {
        self.loading = frame;
        self
    }

    fn button_label(&self) -> String {
        match self.loading {
            Some(frame) => Spinner::label(frame),
            None => BUTTON_LABEL.to_string(),
        }
    }
}

/// Keep the tail of `input` that fits in `width` columns (one reserved for the cursor)
fn visible_tail(input: &str, width: usize) -> &str {
    let max_chars = width.saturating_sub(1);
    let count = input.chars().count();
    if count <= max_chars {
        return input;
    }
    let skip = count - max_chars;
    let start = input
        .char_indices()
        .nth(skip)
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    &input[start..]
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let border_color = if self.focused {
            self.theme.accent()
        } else {
            self.theme.muted()
        };
        let block = Block::default()
            .title(" Product ")
            .title_alignment(Alignment::Left)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = self.button_label();
        let label_width = label.chars().count() as u16;
        let input_width = inner.width.saturating_sub(label_width + 2);

        if self.input.is_empty() && !self.focused {
            buf.set_string(
                inner.x,
                inner.y,
                PLACEHOLDER,
                Style::default().fg(self.theme.muted()),
            );
        } else {
            let text = visible_tail(self.input, input_width as usize);
            buf.set_string(
                inner.x,
                inner.y,
                text,
                Style::default().fg(self.theme.text()),
            );
            if self.focused {
                let cursor_x = inner.x + text.chars().count() as u16;
                buf.set_string(
                    cursor_x,
                    inner.y,
                    CURSOR.to_string(),
                    Style::default().fg(self.theme.accent()),
                );
            }
        }

        let label_style = if self.loading.is_some() {
            Style::default().fg(self.theme.header())
        } else {
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD)
        };
        let label_x = inner.x + inner.width.saturating_sub(label_width);
        buf.set_string(label_x, inner.y, &label, label_style);
    }
}

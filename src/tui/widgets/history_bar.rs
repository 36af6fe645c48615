//! Recent searches row

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::quotes::truncate;
use crate::tui::theme::Theme;

const LABEL: &str = "Recent Searches:";

/// Longest entry text shown inside a button
const MAX_ENTRY_CHARS: usize = 32;

/// Horizontal gap between buttons
const GAP: u16 = 1;

/// Recent searches rendered as a row of buttons
pub struct HistoryBar<'a> {
    entries: &'a [String],
    /// Highlighted entry when the row has focus
    selected: Option<usize>,
    theme: Theme,
}

impl<'a> HistoryBar<'a> {
    pub fn new(entries: &'a [String], theme: Theme) -> Self {
        Self {
            entries,
            selected: None,
            theme,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }
}

/// Button text for an entry
fn button(entry: &str) -> String {
    format!("[ {} ]", truncate(entry, MAX_ENTRY_CHARS))
}

fn button_width(entry: &str) -> u16 {
    button(entry).chars().count() as u16
}

/// First entry to draw so the selected button is on screen
fn first_visible(entries: &[String], selected: usize, width: u16) -> usize {
    let mut start = 0;
    loop {
        let used = entries[start..=selected]
            .iter()
            .fold(0u16, |acc, e| acc.saturating_add(button_width(e) + GAP));
        if used <= width || start == selected {
            return start;
        }
        start += 1;
    }
}

impl Widget for HistoryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 || area.width == 0 || self.entries.is_empty() {
            return;
        }

        buf.set_string(
            area.x,
            area.y,
            LABEL,
            Style::default()
                .fg(self.theme.header())
                .add_modifier(Modifier::BOLD),
        );

        let selected = self
            .selected
            .map(|i| i.min(self.entries.len() - 1));
        let start = selected
            .map(|i| first_visible(self.entries, i, area.width))
            .unwrap_or(0);

        let y = area.y + 1;
        let right = area.x + area.width;
        let mut x = area.x;
        for (i, entry) in self.entries.iter().enumerate().skip(start) {
            let text = button(entry);
            let width = button_width(entry);
            if x.saturating_add(width) > right {
                break;
            }

            let style = if Some(i) == selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(self.theme.text())
            };
            buf.set_string(x, y, &text, style);
            x = x.saturating_add(width + GAP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn render_to_string(bar: HistoryBar, width: u16) -> String {
        let area = Rect::new(0, 0, width, 2);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_label_and_buttons() {
        let history = entries(&["laptop", "phone"]);

        let content = render_to_string(HistoryBar::new(&history, Theme::Dark), 60);

        assert!(content.contains("Recent Searches:"));
        assert!(content.contains("[ laptop ] [ phone ]"));
    }

    #[test]
    fn test_empty_history_renders_nothing() {
        let history: Vec<String> = Vec::new();

        let content = render_to_string(HistoryBar::new(&history, Theme::Dark), 40);

        assert!(content.trim().is_empty());
    }

    #[test]
    fn test_overflowing_buttons_are_cut() {
        let history = entries(&["aaaa", "bbbb", "cccc"]);

        // Each button is 8 wide + 1 gap; 20 columns fit two
        let content = render_to_string(HistoryBar::new(&history, Theme::Dark), 20);

        assert!(content.contains("[ bbbb ]"));
        assert!(!content.contains("cccc"));
    }

    #[test]
    fn test_first_visible_scrolls_to_selection() {
        let history = entries(&["aaaa", "bbbb", "cccc"]);

        assert_eq!(first_visible(&history, 0, 20), 0);
        assert_eq!(first_visible(&history, 1, 20), 0);
        assert_eq!(first_visible(&history, 2, 20), 1);
    }

    #[test]
    fn test_long_entry_is_truncated() {
        let long = "x".repeat(70_000);
        let history = vec![long, "phone".to_string()];

        let content = render_to_string(HistoryBar::new(&history, Theme::Dark), 60);

        assert_eq!(button_width(&history[0]), MAX_ENTRY_CHARS as u16 + 4);
        assert!(content.contains("…"));
        assert!(content.contains("[ phone ]"));
        assert_eq!(first_visible(&history, 1, 60), 0);
    }

    #[test]
    fn test_selected_entry_visible_when_scrolled() {
        let history = entries(&["aaaa", "bbbb", "cccc"]);

        let content = render_to_string(
            HistoryBar::new(&history, Theme::Dark).selected(Some(2)),
            20,
        );

        assert!(content.contains("[ cccc ]"));
    }
}

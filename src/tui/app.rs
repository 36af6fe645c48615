//! Application state and event loop

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};
use tracing::info;

use crate::config::Config;
use crate::services::{
    ComparisonSession, FileHistoryStore, HttpPriceFetcher, PriceFetcher, SearchOutcome,
    SearchTicket,
};
use crate::types::{ComparisonResult, Result, SessionState};

use super::theme::Theme;
use super::widgets::{
    help::HelpPopup, history_bar::HistoryBar, quotes::QuotesView, search_bar::SearchBar,
    spinner::Spinner,
};

const TITLE: &str = "Marketplace Price Comparator";
const TAGLINE: &str = "Compare product prices across Amazon, eBay, and Walmart";

/// Maximum content width (keeps cards readable on wide terminals)
const MAX_CONTENT_WIDTH: u16 = 140;

/// Completed fetch delivered from a worker thread
type FetchMessage = (SearchTicket, Result<ComparisonResult>);

/// Which part of the screen receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    History,
}

/// Main application
pub struct App {
    session: ComparisonSession,
    fetcher: Arc<dyn PriceFetcher + Send + Sync>,
    input: String,
    focus: Focus,
    history_selected: usize,
    spinner_frame: usize,
    show_help: bool,
    should_quit: bool,
    theme: Theme,
    results_tx: mpsc::Sender<FetchMessage>,
    results_rx: mpsc::Receiver<FetchMessage>,
}

impl App {
    pub fn new(
        session: ComparisonSession,
        fetcher: Arc<dyn PriceFetcher + Send + Sync>,
        theme: Theme,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            session,
            fetcher,
            input: String::new(),
            focus: Focus::default(),
            history_selected: 0,
            spinner_frame: 0,
            show_help: false,
            should_quit: false,
            theme,
            results_tx,
            results_rx,
        }
    }

    pub fn session(&self) -> &ComparisonSession {
        &self.session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => {
                self.focus = Focus::Input;
                self.session.reset();
            }
            KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            _ => match self.focus {
                Focus::Input => self.handle_input_key(key, ctrl),
                Focus::History => self.handle_history_key(key),
            },
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Enter => {
                let query = self.input.clone();
                self.submit(&query);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char('u') if ctrl => self.input.clear(),
            // `?` opens help only while nothing has been typed
            KeyCode::Char('?') if self.input.is_empty() => self.show_help = true,
            KeyCode::Char(c) if !ctrl => self.input.push(c),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        let len = self.session.history().len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.history_selected = self.history_selected.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.history_selected + 1 < len {
                    self.history_selected += 1;
                }
            }
            KeyCode::Enter => self.replay_selected(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if !self.session.history().is_empty() => Focus::History,
            _ => Focus::Input,
        };
    }

    /// Replay the highlighted history entry
    fn replay_selected(&mut self) {
        let Some(entry) = self.session.history().get(self.history_selected).cloned() else {
            return;
        };
        self.input = entry.clone();
        self.session.set_query(&entry);
        self.focus = Focus::Input;
        self.submit(&entry);
    }

    /// Issue a search and fetch on a worker thread.
    /// Blank queries are ignored: no request, no state change.
    fn submit(&mut self, query: &str) {
        let Ok(ticket) = self.session.begin_search(query) else {
            return;
        };
        info!(seq = ticket.seq, query = %ticket.query, "searching");

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.results_tx.clone();
        thread::spawn(move || {
            let outcome = fetcher.fetch_prices(&ticket.query);
            let _ = tx.send((ticket, outcome));
        });
    }

    /// Apply any finished fetches (non-blocking)
    pub fn poll_results(&mut self) {
        while let Ok((ticket, outcome)) = self.results_rx.try_recv() {
            if self.session.complete_search(&ticket, outcome) == SearchOutcome::Succeeded {
                // The searched query is now at the front of history
                self.history_selected = 0;
            }
        }
        let len = self.session.history().len();
        self.history_selected = self.history_selected.min(len.saturating_sub(1));
        if len == 0 {
            self.focus = Focus::Input;
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if self.session.is_loading() {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn status_line(&self) -> Option<(String, Style)> {
        match self.session.state() {
            SessionState::Error { message } => {
                Some((message.clone(), Style::default().fg(self.theme.error())))
            }
            SessionState::Loading { query } => Some((
                format!("Searching for \"{}\"...", query),
                Style::default().fg(self.theme.muted()),
            )),
            SessionState::Idle if self.session.result().is_none() => Some((
                "Type a product name and press Enter".to_string(),
                Style::default().fg(self.theme.muted()),
            )),
            _ => None,
        }
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(self.theme.accent());
        let desc = Style::default().fg(self.theme.muted());
        let bindings = Paragraph::new(Line::from(vec![
            Span::styled("Enter", key),
            Span::styled(": Compare", desc),
            Span::raw("  "),
            Span::styled("Tab", key),
            Span::styled(": Recent searches", desc),
            Span::raw("  "),
            Span::styled("F1", key),
            Span::styled(": Help", desc),
            Span::raw("  "),
            Span::styled("Ctrl+C", key),
            Span::styled(": Quit", desc),
        ]))
        .alignment(Alignment::Center);
        bindings.render(area, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Apply max width constraint and center the content
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let history_height = if self.session.history().is_empty() {
            0
        } else {
            2
        };

        let chunks = Layout::vertical([
            Constraint::Length(1),              // [0] Top padding
            Constraint::Length(1),              // [1] Title
            Constraint::Length(1),              // [2] Tagline
            Constraint::Length(1),              // [3] Padding
            Constraint::Length(3),              // [4] Search bar
            Constraint::Length(history_height), // [5] Recent searches
            Constraint::Length(1),              // [6] Status / error
            Constraint::Min(0),                 // [7] Quote cards
            Constraint::Length(1),              // [8] Keybindings
        ])
        .split(area);

        Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
        Paragraph::new(Line::from(Span::styled(
            TAGLINE,
            Style::default().fg(self.theme.muted()),
        )))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let loading = self.session.is_loading().then_some(self.spinner_frame);
        SearchBar::new(&self.input, self.theme)
            .focused(self.focus == Focus::Input)
            .loading(loading)
            .render(chunks[4], buf);

        let selected = (self.focus == Focus::History).then_some(self.history_selected);
        HistoryBar::new(self.session.history(), self.theme)
            .selected(selected)
            .render(chunks[5], buf);

        if let Some((text, style)) = self.status_line() {
            Paragraph::new(Line::from(Span::styled(text, style)))
                .alignment(Alignment::Center)
                .render(chunks[6], buf);
        }

        if let Some(result) = self.session.result() {
            let margin = self.session.margin();
            QuotesView::new(result, self.theme)
                .with_margin(margin.as_ref())
                .with_fetched_at(self.session.fetched_at())
                .render(chunks[7], buf);
        }

        self.render_keybindings(chunks[8], buf);

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(config: &Config) -> anyhow::Result<()> {
    let fetcher = HttpPriceFetcher::new(&config.api_url, config.timeout)?;
    let session = ComparisonSession::new(Box::new(FileHistoryStore::new(&config.data_dir)));
    info!(api_url = %config.api_url, "starting TUI");

    // Detect before raw mode
    let theme = Theme::detect();
    let mut app = App::new(session, Arc::new(fetcher), theme);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    loop {
        app.poll_results();
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

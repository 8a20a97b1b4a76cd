// App state and main event loop.
// Feeds session events into the state machine and handles keyboard input.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::search::StrategyKind;
use crate::state::{Session, SessionEvent, SessionState};
use crate::ui;

const SPINNER_FRAMES: [&str; 10] = [
    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
];

/// Main application state.
pub struct App {
    /// Query words being searched for.
    pub terms: Vec<String>,
    /// Scoring strategy in use.
    pub strategy: StrategyKind,
    /// Fetch/search progress.
    pub session: Session,
    /// Selection in the results list.
    pub list_state: ListState,
    /// Current spinner frame.
    pub spinner_frame: usize,
    /// Whether the app should exit.
    pub should_quit: bool,
    events: UnboundedReceiver<SessionEvent>,
}

impl App {
    pub fn new(
        terms: Vec<String>,
        strategy: StrategyKind,
        events: UnboundedReceiver<SessionEvent>,
    ) -> Self {
        Self {
            terms,
            strategy,
            session: Session::new(),
            list_state: ListState::default(),
            spinner_frame: 0,
            should_quit: false,
            events,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.drain_events();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_input()?;
            self.tick();
        }
        Ok(())
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Apply every session event received since the last frame.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let completed = matches!(event, SessionEvent::SearchCompleted(_));
            self.session.apply(event);
            if completed && self.result_count() > 0 {
                self.list_state.select(Some(0));
            }
        }
    }

    fn tick(&mut self) {
        if !self.session.state().is_finished() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    fn result_count(&self) -> usize {
        self.session.state().results().map_or(0, |r| r.len())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home | KeyCode::Char('g') => {
                if self.result_count() > 0 {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                if let Some(last) = self.result_count().checked_sub(1) {
                    self.list_state.select(Some(last));
                }
            }
            _ => {}
        }
    }

    /// Select the next result.
    fn select_next(&mut self) {
        let len = self.result_count();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous result.
    fn select_prev(&mut self) {
        if self.result_count() == 0 {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    /// Final state after the loop exits.
    pub fn state(&self) -> &SessionState {
        self.session.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchProgress;
    use crate::github::Repository;
    use crate::search::SearchResultItem;
    use tokio::sync::mpsc;

    fn finished_app(n: usize) -> App {
        let (tx, rx) = mpsc::unbounded_channel();
        let results = (0..n)
            .map(|i| SearchResultItem {
                repository: Repository::new(format!("repo-{i}"), "u", "", ""),
                score: (n - i) as f64,
            })
            .collect();
        tx.send(SessionEvent::FetchProgress(FetchProgress {
            count: n,
            from_cache: false,
        }))
        .unwrap();
        tx.send(SessionEvent::SearchStarted { count: n }).unwrap();
        tx.send(SessionEvent::SearchCompleted(results)).unwrap();

        let mut app = App::new(vec!["repo".to_string()], StrategyKind::Weighted, rx);
        app.drain_events();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_completion_selects_first_result() {
        let app = finished_app(3);
        assert!(app.state().is_finished());
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut app = finished_app(2);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.list_state.selected(), Some(1));

        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.list_state.selected(), Some(0));

        app.handle_key(key(KeyCode::End));
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = finished_app(0);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = finished_app(0);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_spinner_stops_when_finished() {
        let mut app = finished_app(1);
        let frame = app.spinner_frame;
        app.tick();
        assert_eq!(app.spinner_frame, frame);
    }
}

//! Root application component
//!
//! Routes key events to the focused component and applies Actions to the
//! entry store, the fetch runner and the modal stack.

use crate::action::Action;
use crate::component::Component;
use crate::components::{draw_customers_screen, CustomersComponent, HelpDialog, QuitDialog};
use crate::model::modal::{Modal, ModalStack};
use crate::model::EntryStore;
use crate::services::{EntryFetcher, FetchRunner};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;

pub struct App {
    /// Customer data and search query
    pub store: EntryStore,

    /// Background fetches
    pub fetch_runner: FetchRunner,

    pub modals: ModalStack,

    pub should_quit: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub customers: CustomersComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    pub fn new(fetcher: Arc<dyn EntryFetcher>) -> App {
        App {
            store: EntryStore::new(),
            fetch_runner: FetchRunner::new(fetcher),
            modals: ModalStack::new(),
            should_quit: false,
            customers: CustomersComponent::new(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
        }
    }

    /// Re-anchor the list selection after entries or query changed
    fn sync_selection(&mut self) {
        let filtered = self.store.filtered();
        self.customers.reconcile(&filtered);
    }
}

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.store.activate(&mut self.fetch_runner);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.handle_key_event(key),
            Some(Modal::Help) => self.help_dialog.handle_key_event(key),
            None if self.customers.search_mode => self.handle_search_key_event(key),
            None => self.customers.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action != Action::Tick {
            tracing::debug!(action = %action, "update");
        }

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.store.is_loading() {
                    self.customers.advance_spinner();
                }
                if self.fetch_runner.poll(&mut self.store) {
                    self.sync_selection();
                }
            }
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                self.should_quit = true;
            }

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::Refresh => {
                tracing::info!(in_flight = self.fetch_runner.in_flight(), "manual refresh");
                self.store.refresh(&mut self.fetch_runner);
            }

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => self.customers.next(&self.store.filtered()),
            Action::PrevItem => self.customers.previous(&self.store.filtered()),
            Action::FirstItem => self.customers.select_first(&self.store.filtered()),
            Action::LastItem => self.customers.select_last(&self.store.filtered()),

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode => self.customers.enter_search_mode(),
            Action::ExitSearchMode => self.customers.exit_search_mode(),
            Action::SearchInput(c) => {
                self.store.push_query_char(c);
                self.sync_selection();
            }
            Action::SearchBackspace => {
                self.store.pop_query_char();
                self.sync_selection();
            }
            Action::ClearSearch => {
                self.store.clear_query();
                self.sync_selection();
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.toggle(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if self.modals.top() == Some(Modal::QuitConfirm) {
                    self.should_quit = true;
                }
                self.modals.pop();
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        draw_customers_screen(frame, area, &mut self.customers, &self.store)?;

        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.draw(frame, area)?,
            Some(Modal::Help) => self.help_dialog.draw(frame, area)?,
            None => {}
        }
        Ok(())
    }
}

impl App {
    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl/Alt chords are not text
        let typed = matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT);
        let action = match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ClearSearch)
            }
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) if typed => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::FETCH_FAILED_MESSAGE;
    use crate::model::DisplayState;
    use crate::services::fetcher::FetchError;
    use ratatui::{backend::TestBackend, Terminal};
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(body: Value) -> App {
        App::new(Arc::new(move || -> Result<Value, FetchError> {
            Ok(body.clone())
        }))
    }

    fn sample_app() -> App {
        app_with(json!([
            {"id": 1, "name": "Rahul Shah", "mobile": "9000011111"},
            {"id": 2, "name": "Asha Rao", "mobile": "9000022222"}
        ]))
    }

    /// Feed a key through the same path the main loop uses
    fn send_key(app: &mut App, key: KeyEvent) {
        let mut next = app.handle_key_event(key).unwrap();
        while let Some(action) = next {
            next = app.update(action).unwrap();
        }
    }

    /// Tick until the pending fetch has been applied
    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.fetch_runner.in_flight() > 0 {
            assert!(Instant::now() < deadline, "fetch did not finish");
            app.update(Action::Tick).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_init_fetches_once_and_loads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut app = App::new(Arc::new(move || -> Result<Value, FetchError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!([{"id": 1, "name": "Rahul Shah"}]))
        }));

        app.init().unwrap();
        assert!(app.store.is_loading());
        app.init().unwrap();
        settle(&mut app);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.store.total(), 1);
        assert_eq!(app.customers.list_state.selected(), Some(0));
    }

    #[test]
    fn test_search_typing_filters() {
        let mut app = sample_app();
        app.init().unwrap();
        settle(&mut app);

        send_key(&mut app, press(KeyCode::Char('/')));
        assert!(app.customers.search_mode);
        for c in "RAO".chars() {
            send_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.store.query(), "RAO");
        assert_eq!(app.store.showing(), 1);

        // 'q' is text while searching, not quit
        send_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.modals.is_empty());
        send_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.store.query(), "RAO");

        send_key(&mut app, press(KeyCode::Enter));
        assert!(!app.customers.search_mode);
        assert_eq!(app.store.query(), "RAO");

        send_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.store.query(), "");
        assert_eq!(app.store.showing(), 2);
    }

    #[test]
    fn test_refresh_after_failure_recovers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut app = App::new(Arc::new(move || -> Result<Value, FetchError> {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))
            } else {
                Ok(json!([{"id": "a", "name": "Asha"}]))
            }
        }));

        app.init().unwrap();
        settle(&mut app);
        assert_eq!(
            app.store.display_state(),
            DisplayState::Error(FETCH_FAILED_MESSAGE)
        );

        send_key(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.store.display_state(), DisplayState::Loading);
        settle(&mut app);

        assert_eq!(app.store.display_state(), DisplayState::List);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_search_ignores_modified_chords() {
        let mut app = sample_app();
        send_key(&mut app, press(KeyCode::Char('/')));

        send_key(&mut app, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        send_key(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        assert_eq!(app.store.query(), "");

        send_key(&mut app, KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT));
        send_key(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.store.query(), "Ra");
    }

    #[test]
    fn test_quit_flow() {
        let mut app = sample_app();

        send_key(&mut app, press(KeyCode::Char('q')));
        assert_eq!(app.modals.top(), Some(Modal::QuitConfirm));

        send_key(&mut app, press(KeyCode::Char('n')));
        assert!(app.modals.is_empty());
        assert!(!app.should_quit);

        send_key(&mut app, press(KeyCode::Char('q')));
        send_key(&mut app, press(KeyCode::Char('y')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let mut app = sample_app();
        send_key(&mut app, press(KeyCode::Char('/')));
        send_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_toggles() {
        let mut app = sample_app();
        send_key(&mut app, press(KeyCode::Char('?')));
        assert_eq!(app.modals.top(), Some(Modal::Help));
        send_key(&mut app, press(KeyCode::Char('?')));
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_draw_with_modal() {
        let mut app = sample_app();
        app.update(Action::OpenQuitDialog).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                app.draw(frame, area).unwrap();
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Close the customers dashboard?"));
    }
}

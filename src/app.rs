use anyhow::Result;
use ratatui::Frame;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::Receiver;
use std::time::Instant;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::logging::FlashMessage;
use crate::models::{Field, FormState, INVALID_EMAIL_MESSAGE};
use crate::storage::{Config, KeyValueStore};
use crate::store::{RecordStore, StoreError, Submitted};
use crate::ui;
use crate::ui::Theme;

/// Application mode determines which keybindings are active
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Page navigation and list actions
    #[default]
    Normal,
    /// Create/edit form is open
    Form,
    /// Blocking validation alert over the form
    Alert,
    /// Help overlay (activated with '?')
    Help,
}

/// Pages of the navigation shell
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    Periods,
    About,
}

impl Route {
    pub fn all() -> &'static [Route] {
        &[Route::Home, Route::Periods, Route::About]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Periods => "Periods",
            Route::About => "About",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Route::Home => 0,
            Route::Periods => 1,
            Route::About => 2,
        }
    }

    pub fn next(&self) -> Route {
        let all = Route::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> Route {
        let all = Route::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// Main application state
pub struct App<S: KeyValueStore = Box<dyn KeyValueStore>> {
    /// Current interaction mode
    pub mode: AppMode,

    /// Current page
    pub route: Route,

    /// Records, draft and form state
    pub store: RecordStore<S>,

    /// Application configuration
    pub config: Config,

    theme: Theme,

    /// Selected row in the period table
    pub selected_index: usize,

    /// Text inputs mirroring the draft fields
    pub name_input: Input,
    pub email_input: Input,

    /// Focused form field
    pub focus: Field,

    /// Validation alert shown over the form
    pub alert: Option<String>,

    /// Error message (shown in modal, dismissible with any key)
    pub error: Option<String>,

    /// Flag to request application exit
    pub should_quit: bool,

    /// Flash messages displayed above the hints bar
    pub flash_messages: Vec<FlashMessage>,

    /// Receiver for flash messages from logger
    flash_rx: Option<Receiver<FlashMessage>>,

    /// Scroll offset for help modal (0 = top)
    help_scroll: usize,

    /// Maximum scroll value for help modal (updated each frame)
    help_max_scroll: usize,
}

impl<S: KeyValueStore> App<S> {
    /// Create the app around an initialized store
    pub fn new(
        store: RecordStore<S>,
        config: Config,
        flash_rx: Option<Receiver<FlashMessage>>,
        startup_error: Option<String>,
    ) -> Self {
        let (theme, theme_error) = match Theme::load(&config.general.theme) {
            Ok(t) => (t, None),
            Err(e) => {
                log::error!("Failed to load theme '{}': {}", config.general.theme, e);
                (Theme::default(), Some(e.to_string()))
            }
        };

        App {
            mode: AppMode::default(),
            route: Route::default(),
            store,
            config,
            theme,
            selected_index: 0,
            name_input: Input::default(),
            email_input: Input::default(),
            focus: Field::Name,
            alert: None,
            error: startup_error.or(theme_error),
            should_quit: false,
            flash_messages: Vec::new(),
            flash_rx,
            help_scroll: 0,
            help_max_scroll: 0,
        }
    }

    /// Poll flash message receiver and add to queue
    pub fn poll_flash_messages(&mut self) {
        if let Some(rx) = &self.flash_rx {
            while let Ok(msg) = rx.try_recv() {
                self.flash_messages.push(msg);
            }
        }
    }

    /// Remove expired flash messages (based on config duration)
    pub fn prune_flash_messages(&mut self) {
        if self.flash_messages.is_empty() {
            return;
        }

        let now = Instant::now();
        let duration_ms = self.config.general.flash_message_duration_ms;
        self.flash_messages
            .retain(|msg| now.duration_since(msg.timestamp).as_millis() < duration_ms as u128);
    }

    /// Id of the record in the selected row
    pub fn selected_record_id(&self) -> Option<u64> {
        self.store.records().get(self.selected_index).map(|r| r.id)
    }

    pub fn move_up(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let count = self.store.records().len();
        if count > 0 {
            self.selected_index = (self.selected_index + n).min(count - 1);
        }
    }

    pub fn jump_to_bottom(&mut self) {
        self.selected_index = self.store.records().len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let count = self.store.records().len();
        if count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= count {
            self.selected_index = count - 1;
        }
    }

    /// Copy the store's draft into the text inputs
    fn sync_inputs_from_draft(&mut self) {
        let draft = self.store.draft();
        self.name_input = Input::new(draft.name.clone());
        self.email_input = Input::new(draft.email.clone());
        self.focus = Field::Name;
    }

    fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            Field::Name => &mut self.name_input,
            Field::Email => &mut self.email_input,
        }
    }

    /// Open the form in create mode
    pub fn open_create_form(&mut self) {
        self.store.open_create_form();
        self.sync_inputs_from_draft();
        self.mode = AppMode::Form;
    }

    /// Open the form for the selected record
    pub fn open_edit_form(&mut self) {
        let Some(id) = self.selected_record_id() else {
            return;
        };
        if self.store.open_edit_form(id) {
            self.sync_inputs_from_draft();
            self.mode = AppMode::Form;
        }
    }

    /// Close the form, discarding the draft
    pub fn close_form(&mut self) {
        self.store.close_form();
        self.mode = AppMode::Normal;
    }

    fn show_alert(&mut self, message: String) {
        self.alert = Some(message);
        self.mode = AppMode::Alert;
    }

    /// Submit the draft and react to the outcome
    pub fn submit_form(&mut self) {
        match self.store.submit() {
            Ok(Submitted::Created(_)) => {
                self.jump_to_bottom();
                self.mode = AppMode::Normal;
            }
            Ok(Submitted::Updated(_)) | Ok(Submitted::Missing(_)) => {
                self.mode = AppMode::Normal;
            }
            Err(StoreError::Validation(e)) => {
                log::debug!("Submit rejected: {}", e);
                // One fixed alert text for every validation failure
                self.show_alert(INVALID_EMAIL_MESSAGE.to_string());
            }
            Err(e @ StoreError::DuplicateId(_)) => {
                log::warn!("Submit rejected: {}", e);
                self.show_alert(e.to_string());
            }
            Err(StoreError::FormClosed) => {
                self.mode = AppMode::Normal;
            }
            Err(e) => {
                // Change is kept in memory; only the write failed
                self.error = Some(e.to_string());
                self.mode = AppMode::Normal;
            }
        }
        self.clamp_selection();
    }

    /// Delete the selected record
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_record_id() else {
            return;
        };
        if let Err(e) = self.store.delete(id) {
            self.error = Some(e.to_string());
        }
        self.clamp_selection();
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => {
                self.help_scroll = 0;
                self.help_max_scroll = 0;
                AppMode::Help
            }
        };
    }

    pub fn navigate(&mut self, route: Route) {
        self.route = route;
    }

    /// Request application exit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle keyboard event based on current mode
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // If there's an error modal, any key dismisses it
        if self.error.is_some() {
            self.error = None;
            return Ok(());
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Form => self.handle_form_key(key),
            AppMode::Alert => self.handle_alert_key(key),
            AppMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab => self.navigate(self.route.next()),
            KeyCode::BackTab => self.navigate(self.route.previous()),
            KeyCode::Char('1') => self.navigate(Route::Home),
            KeyCode::Char('2') => self.navigate(Route::Periods),
            KeyCode::Char('3') => self.navigate(Route::About),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('c') => self.flash_messages.clear(),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ if self.route == Route::Periods => self.handle_periods_key(key),
            _ => {}
        }
        Ok(())
    }

    /// List actions, only active on the Periods page
    fn handle_periods_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::Home | KeyCode::Char('g') => self.selected_index = 0,
            KeyCode::End | KeyCode::Char('G') => self.jump_to_bottom(),
            KeyCode::Char('a') => self.open_create_form(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = self.focus.next();
            }
            _ => {
                // Delegate editing keys to tui-input, then mirror into the draft
                let event = Event::Key(key);
                if self.focused_input().handle_event(&event).is_some() {
                    let value = self.focused_input().value().to_string();
                    self.store.update_draft_field(self.focus, value);
                }
            }
        }
        Ok(())
    }

    /// Any key dismisses the alert and returns to the still-open form
    fn handle_alert_key(&mut self, _key: KeyEvent) -> Result<()> {
        self.alert = None;
        self.mode = if self.store.form().is_visible() {
            AppMode::Form
        } else {
            AppMode::Normal
        };
        Ok(())
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.help_scroll = (self.help_scroll + 1).min(self.help_max_scroll);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.help_scroll = self.help_scroll.saturating_sub(1);
            }
            _ => self.toggle_help(),
        }
        Ok(())
    }

    /// Render the TUI
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        frame.render_widget(
            ratatui::widgets::Block::default()
                .style(ratatui::prelude::Style::default().bg(self.theme.default_bg)),
            size,
        );

        // [tabs, content, flash, keyboard_hints]
        let chunks = ui::create_main_layout(size);

        ui::render_tabs(frame, chunks[0], self.route, &self.theme);

        match self.route {
            Route::Home => ui::render_home(frame, chunks[1], self.store.records().len(), &self.theme),
            Route::Periods => ui::render_record_table(
                frame,
                chunks[1],
                self.store.records(),
                self.selected_index,
                &self.theme,
            ),
            Route::About => ui::render_about(
                frame,
                chunks[1],
                &self.store.repository().kv().describe(),
                &self.theme,
            ),
        }

        ui::render_flash_messages(frame, chunks[2], &self.flash_messages, &self.theme);
        ui::render_keyboard_hints(frame, chunks[3], self.mode, self.route, &self.theme);

        if let FormState::Visible(_) = self.store.form() {
            ui::render_form_modal(
                frame,
                size,
                ui::FormRenderContext {
                    state: self.store.form(),
                    name_input: &self.name_input,
                    email_input: &self.email_input,
                    focus: self.focus,
                    theme: &self.theme,
                },
            );
        }

        if let Some(ref message) = self.alert {
            ui::render_alert(frame, size, message, &self.theme);
        }

        if matches!(self.mode, AppMode::Help) {
            (self.help_scroll, self.help_max_scroll) =
                ui::render_help_overlay(frame, size, &self.theme, self.help_scroll);
        }

        // Error modal takes precedence over other overlays
        if let Some(ref error_msg) = self.error {
            ui::render_error_modal(frame, size, error_msg, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IdGenerator, IdStrategy, INVALID_EMAIL_MESSAGE, Record};
    use crate::storage::{CorruptPolicy, MemoryKeyValueStore, RecordRepository};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app_with(kv: MemoryKeyValueStore) -> App<MemoryKeyValueStore> {
        let repo = RecordRepository::new(kv, "alunos", CorruptPolicy::Backup);
        let mut store = RecordStore::new(repo, IdGenerator::new(IdStrategy::Monotonic));
        store.initialize().unwrap();
        App::new(store, Config::default(), None, None)
    }

    fn press(app: &mut App<MemoryKeyValueStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App<MemoryKeyValueStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App<MemoryKeyValueStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_route_cycle() {
        assert_eq!(Route::Home.next(), Route::Periods);
        assert_eq!(Route::About.next(), Route::Home);
        assert_eq!(Route::Home.previous(), Route::About);
    }

    #[test]
    fn test_add_through_keyboard() {
        let mut app = app_with(MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, AppMode::Form);

        type_text(&mut app, "2024.1");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "coord@uni.edu");
        assert_eq!(app.store.draft().email, "coord@uni.edu");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.records().len(), 1);
        assert_eq!(app.store.records()[0].name, "2024.1");
        assert_eq!(app.store.repository().kv().writes(), 1);
    }

    #[test]
    fn test_empty_label_uses_fixed_alert() {
        let mut app = app_with(MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "coord@uni.edu");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Alert);
        assert_eq!(app.alert.as_deref(), Some(INVALID_EMAIL_MESSAGE));
        assert!(app.store.records().is_empty());
        assert_eq!(app.store.repository().kv().writes(), 0);
    }

    #[test]
    fn test_invalid_email_shows_alert_then_returns_to_form() {
        let mut app = app_with(MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "2024.1");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "bad-email");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Alert);
        assert_eq!(app.alert.as_deref(), Some(INVALID_EMAIL_MESSAGE));
        assert!(screen(&mut app).contains("the supplied email is not valid"));

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.alert.is_none());
        assert_eq!(app.email_input.value(), "bad-email");
        assert_eq!(app.store.draft().email, "bad-email");
        assert!(app.store.records().is_empty());
    }

    #[test]
    fn test_edit_and_delete_selected() {
        let blob = r#"[{"id":1,"name":"2023.1","email":"a@uni.edu"},{"id":2,"name":"2023.2","email":"b@uni.edu"}]"#;
        let mut app = app_with(MemoryKeyValueStore::new().with_blob("alunos", blob));
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.name_input.value(), "2023.2");
        assert!(screen(&mut app).contains("Edit period"));

        type_text(&mut app, "b");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.records()[1], Record::new(2, "2023.2b", "b@uni.edu"));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store.records(), &[Record::new(1, "2023.1", "a@uni.edu")]);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_escape_discards_draft() {
        let mut app = app_with(MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "draft");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.store.form().is_visible());

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.name_input.value(), "");
        assert_eq!(app.store.draft().name, "");
        assert_eq!(app.store.repository().kv().writes(), 0);
    }

    #[test]
    fn test_list_keys_ignored_off_periods_page() {
        let mut app = app_with(MemoryKeyValueStore::new());
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.route, Route::Home);
    }

    #[test]
    fn test_error_modal_dismissed_by_any_key() {
        let mut app = app_with(MemoryKeyValueStore::new());
        app.error = Some("boom".to_string());
        assert!(screen(&mut app).contains("Error"));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.error.is_none());
        assert!(!app.should_quit);
    }
}

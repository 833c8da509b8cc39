//! Main TUI application state and logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info};

use super::components::StatusDisplay;
use super::screens::*;
use super::traits::{Screen as ScreenView, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::config::Config;
use crate::forms::{Navigator, SubmissionError, Submitted};
use crate::graphql::GraphQLApi;
use crate::route::Route;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Invoices,
    Classpasses,
    ClassTeachers,
    RecordForm,
    Help,
}

impl Screen {
    pub fn title(&self) -> &str {
        match self {
            Screen::MainMenu => "Main Menu",
            Screen::Invoices => "Finance Invoices",
            Screen::Classpasses => "Shop Classpasses",
            Screen::ClassTeachers => "Class Teachers",
            Screen::RecordForm => "Edit Record",
            Screen::Help => "Help",
        }
    }
}

/// Path requested by a finished save, followed on the next tick
#[derive(Debug, Default)]
pub struct PendingNavigation {
    path: Option<String>,
}

impl Navigator for PendingNavigation {
    fn navigate_to(&mut self, path: &str) {
        self.path = Some(path.to_string());
    }
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    /// Screens to return to on Esc
    history: Vec<Screen>,
    /// Application configuration
    pub config: Config,

    // Screen states
    pub main_menu: MainMenuScreen,
    pub invoices: InvoicesScreen,
    pub classpasses: ClasspassesScreen,
    pub class_teachers: ClassTeachersScreen,
    pub record_form: RecordFormScreen,
    pub help: HelpScreen,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status: StatusDisplay,
    navigation: PendingNavigation,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: Config, api: Arc<dyn GraphQLApi>) -> Self {
        let page_size = config.page_size;
        Self {
            current_screen: Screen::MainMenu,
            history: Vec::new(),
            config,

            main_menu: MainMenuScreen::new(),
            invoices: InvoicesScreen::new(Arc::clone(&api), page_size),
            classpasses: ClasspassesScreen::new(Arc::clone(&api), page_size),
            class_teachers: ClassTeachersScreen::new(Arc::clone(&api), page_size),
            record_form: RecordFormScreen::new(api),
            help: HelpScreen::new(),

            should_quit: false,
            show_help_popup: false,
            status: StatusDisplay::new().with_timestamps(),
            navigation: PendingNavigation::default(),
        }
    }

    fn screen_mut(&mut self, screen: Screen) -> &mut dyn ScreenView {
        match screen {
            Screen::MainMenu => &mut self.main_menu,
            Screen::Invoices => &mut self.invoices,
            Screen::Classpasses => &mut self.classpasses,
            Screen::ClassTeachers => &mut self.class_teachers,
            Screen::RecordForm => &mut self.record_form,
            Screen::Help => &mut self.help,
        }
    }

    fn current(&mut self) -> &mut dyn ScreenView {
        self.screen_mut(self.current_screen)
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.current().on_enter();

        loop {
            self.tick();

            terminal.draw(|f| self.draw(f))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }

            // Give background fetches a chance to run between frames
            tokio::task::yield_now().await;
        }

        self.current().on_exit();
        Ok(())
    }

    /// Apply finished background work of the active screen
    pub fn tick(&mut self) {
        let action = self.current().tick();
        self.apply_action(action);

        if let Some(result) = self.record_form.poll_submission(&mut self.status, &mut self.navigation) {
            self.after_submission(result);
        }
    }

    fn after_submission(&mut self, result: Result<Submitted, SubmissionError>) {
        match result {
            Ok(submitted) => {
                for query in &submitted.refetch_queries {
                    self.invoices.refetch(query);
                    self.classpasses.refetch(query);
                    self.class_teachers.refetch(query);
                }
                if let Some(path) = self.navigation.path.take() {
                    self.follow(&path);
                }
            }
            // The notifier already reported server errors
            Err(SubmissionError::Server(_)) | Err(SubmissionError::Cancelled) => {}
            Err(e) => self.status.set_error(e.to_string()),
        }
    }

    /// Go to the screen a path names, starting a fresh history
    pub fn follow(&mut self, path: &str) {
        let route = Route::parse(path);
        debug!("Following {} to {:?}", path, route);

        let screen = match route {
            Route::Invoices => Screen::Invoices,
            Route::Classpasses => Screen::Classpasses,
            Route::ClassTeachers { schedule_item_id } => {
                self.class_teachers.open(&schedule_item_id);
                Screen::ClassTeachers
            }
            Route::MainMenu | Route::Locations | Route::SubscriptionGroups | Route::AccountSubscriptions { .. } => {
                Screen::MainMenu
            }
        };
        self.history.clear();
        self.switch_to(screen);
    }

    fn switch_to(&mut self, screen: Screen) {
        self.current().on_exit();
        self.current_screen = screen;
        self.current().on_enter();
    }

    /// Navigate to a different screen, remembering the current one
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        if screen == self.current_screen {
            return;
        }
        info!("Navigating to {}", screen.title());
        self.history.push(self.current_screen);
        self.switch_to(screen);
    }

    /// Go back to the previous screen, or the main menu
    pub fn navigate_back(&mut self) {
        let previous = self.history.pop().unwrap_or(Screen::MainMenu);
        self.switch_to(previous);
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::OpenClassTeachers(schedule_item_id) => {
                self.class_teachers.open(&schedule_item_id);
                self.history.push(self.current_screen);
                self.switch_to(Screen::ClassTeachers);
            }
            ScreenAction::OpenForm(target) => {
                self.record_form.open(target);
                self.history.push(self.current_screen);
                self.switch_to(Screen::RecordForm);
            }
            ScreenAction::NavigateBack => {
                if self.current_screen == Screen::MainMenu {
                    return;
                }
                self.status.clear();
                self.navigate_back();
            }
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetLoading(message) => self.status.set_loading(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::None => {}
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let editing = self.current().is_editing();

        // Global shortcuts; text entry keeps everything but F1
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') if !editing => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return;
            }
            KeyCode::Char('q') if !editing && !self.show_help_popup => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        if self.show_help_popup {
            return;
        }

        let action = self.current().handle_key_event(key);
        self.apply_action(action);
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.current().draw(f, chunks[0]);

        let hint = format!(
            "Studio Admin - {} | ESC: Back | Q: Quit | F1/?: Help",
            self.current_screen.title()
        );
        self.status.render(f, chunks[1], &hint);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 70, area);
        f.render_widget(Clear, popup_area);

        let global_help = "Global Shortcuts:\n\
            ESC - Go back\n\
            Q - Quit application (not while typing)\n\
            F1 / ? - Toggle this help\n\n";
        let content = format!("{}{}", global_help, self.current().help_text());

        let help_popup = Paragraph::new(content)
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .border_style(Styles::warning()),
            )
            .style(Styles::default())
            .wrap(Wrap { trim: false });

        f.render_widget(help_popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin_tui::components::status_display::StatusType;
    use crate::graphql::PageInfo;
    use crate::testing::{connection_json, FakeApi};
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    async fn tick_until(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..200 {
            app.tick();
            if done(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_saved_location_returns_to_menu_with_message() {
        let api = Arc::new(FakeApi::new());
        api.push_data("createSchoolLocation", json!({ "schoolLocation": { "id": "TG9jOjE=" } }));

        let mut app = App::new(Config::default(), api.clone());
        app.handle_key_event(key(KeyCode::Char('l')));
        assert_eq!(app.current_screen, Screen::RecordForm);

        tick_until(&mut app, |app| app.record_form.is_editing()).await;
        // 'q' is typed into the form rather than quitting
        type_text(&mut app, "Aqua hall");
        assert!(!app.should_quit);
        app.handle_key_event(key(KeyCode::Enter));

        tick_until(&mut app, |app| app.current_screen == Screen::MainMenu).await;
        let message = app.status.get_current().unwrap();
        assert_eq!(message.message, "Location added");
        assert_eq!(api.requests()[0].variable("name"), Some(&json!("Aqua hall")));
    }

    #[tokio::test]
    async fn test_saved_teacher_returns_to_class_list() {
        let api = Arc::new(FakeApi::new());
        api.push_data("scheduleItemTeachers", connection_json(&[], PageInfo::last(None)));
        api.push_data(
            "scheduleItemTeacher",
            json!({
                "id": "U0lUOjE=",
                "account": { "id": "QTox", "fullName": "Ann" },
                "role": null,
                "account2": null,
                "role2": null,
                "dateStart": "2024-01-01",
                "dateEnd": null
            }),
        );
        api.push_data("updateScheduleItemTeacher", json!({ "scheduleItemTeacher": { "id": "U0lUOjE=" } }));
        api.push_data("scheduleItemTeachers", connection_json(&[], PageInfo::last(None)));

        let mut app = App::new(Config::default(), api.clone());
        app.apply_action(ScreenAction::OpenClassTeachers("U0k6MQ==".to_string()));
        tick_until(&mut app, |app| !app.class_teachers.list.is_fetching()).await;

        app.apply_action(ScreenAction::OpenForm(FormTarget::EditClassTeacher {
            schedule_item_id: "U0k6MQ==".to_string(),
            id: "U0lUOjE=".to_string(),
        }));
        tick_until(&mut app, |app| app.record_form.is_editing()).await;
        app.handle_key_event(key(KeyCode::Enter));

        tick_until(&mut app, |app| app.current_screen == Screen::ClassTeachers).await;
        assert_eq!(app.class_teachers.schedule_item_id(), Some("U0k6MQ=="));
        assert_eq!(app.status.get_current().unwrap().message, "Teacher saved");

        tick_until(&mut app, |app| !app.class_teachers.list.is_fetching()).await;
        assert_eq!(api.request_count(), 4);

        // history restarts at the followed screen
        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Screen::MainMenu);
    }

    #[tokio::test]
    async fn test_back_and_quit() {
        let api = Arc::new(FakeApi::new());
        api.push_data("organizationClasspasses", connection_json(&[], PageInfo::last(None)));

        let mut app = App::new(Config::default(), api);
        app.handle_key_event(key(KeyCode::Char('c')));
        assert_eq!(app.current_screen, Screen::Classpasses);
        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Screen::MainMenu);
        assert!(!app.classpasses.list.is_mounted());

        app.handle_key_event(key(KeyCode::Char('?')));
        assert!(app.show_help_popup);
        app.handle_key_event(key(KeyCode::Esc));
        assert!(!app.show_help_popup);

        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_load_more_shows_loading_status() {
        let api = Arc::new(FakeApi::new());
        api.push_data(
            "organizationClasspasses",
            json!({
                "pageInfo": { "hasNextPage": true, "endCursor": "c1" },
                "edges": [{ "node": { "id": "Q1A6MQ==", "name": "10 class card" } }],
            }),
        );
        api.push_data("organizationClasspasses", connection_json(&[], PageInfo::last(Some("c1"))));

        let mut app = App::new(Config::default(), api);
        app.handle_key_event(key(KeyCode::Char('c')));
        tick_until(&mut app, |app| !app.classpasses.list.is_fetching()).await;

        app.handle_key_event(key(KeyCode::Char('m')));
        let message = app.status.get_current().unwrap();
        assert_eq!(message.status_type, StatusType::Loading);
        assert_eq!(message.message, "Loading more...");
    }

    #[test]
    fn test_follow_unknown_path_goes_home() {
        let api = Arc::new(FakeApi::new());
        let mut app = App::new(Config::default(), api);
        app.follow("/school/locations");
        assert_eq!(app.current_screen, Screen::MainMenu);
    }
}

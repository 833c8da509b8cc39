//! Teachers assigned to one class

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::admin_tui::components::{render_list, Selection, TableSpec};
use crate::admin_tui::screens::{handle_list_key, poll_list, FormTarget};
use crate::admin_tui::traits::{Screen, ScreenAction};
use crate::admin_tui::ui::Styles;
use crate::graphql::GraphQLApi;
use crate::listing::class_teachers::{class_teachers_query, TeacherRow};
use crate::listing::ListScreen;
use crate::models::ScheduleItemTeacher;
use crate::paging::Keyed;

const HEADERS: &[&str] = &["Start", "End", "Teacher", "Second teacher"];
const WIDTHS: &[Constraint] = &[
    Constraint::Length(11),
    Constraint::Length(11),
    Constraint::Percentage(40),
    Constraint::Percentage(40),
];

pub struct ClassTeachersScreen {
    page_size: usize,
    schedule_item_id: Option<String>,
    pub list: ListScreen<ScheduleItemTeacher>,
    pub selection: Selection,
}

impl ClassTeachersScreen {
    pub fn new(api: Arc<dyn GraphQLApi>, page_size: usize) -> Self {
        Self {
            page_size,
            schedule_item_id: None,
            list: ListScreen::new(api, class_teachers_query("", page_size)),
            selection: Selection::default(),
        }
    }

    /// Point the screen at another class; the list loads on enter
    pub fn open(&mut self, schedule_item_id: &str) {
        self.list.unmount();
        self.list.set_query(class_teachers_query(schedule_item_id, self.page_size));
        self.schedule_item_id = Some(schedule_item_id.to_string());
        self.selection.select(None);
    }

    pub fn schedule_item_id(&self) -> Option<&str> {
        self.schedule_item_id.as_deref()
    }

    fn selected(&self) -> Option<&ScheduleItemTeacher> {
        let index = self.selection.selected()?;
        self.list.accumulator()?.get(index)
    }
}

impl Screen for ClassTeachersScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("Class: ", Styles::info()),
            Span::styled(self.schedule_item_id.clone().unwrap_or_default(), Styles::title()),
            Span::raw("   a: add  e/Enter: edit  m: load more  r: refresh  Esc: back"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(header, chunks[0]);

        let spec = TableSpec {
            title: "Teachers",
            headers: HEADERS,
            widths: WIDTHS,
            empty_message: "No teachers assigned to this class",
        };
        render_list(f, chunks[1], &self.list, &mut self.selection.state, &spec, |assignment| {
            let row = TeacherRow::from(assignment);
            vec![row.date_start, row.date_end, row.teacher, row.teacher2]
        });
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        let Some(schedule_item_id) = self.schedule_item_id.clone() else {
            return match key.code {
                KeyCode::Esc => ScreenAction::NavigateBack,
                _ => ScreenAction::None,
            };
        };

        match key.code {
            KeyCode::Char('a') => ScreenAction::OpenForm(FormTarget::AddClassTeacher { schedule_item_id }),
            KeyCode::Char('e') | KeyCode::Enter => match self.selected() {
                Some(assignment) => ScreenAction::OpenForm(FormTarget::EditClassTeacher {
                    schedule_item_id,
                    id: assignment.key().to_string(),
                }),
                None => ScreenAction::SetError("Select a teacher first".to_string()),
            },
            _ => handle_list_key(&mut self.list, &mut self.selection, key).unwrap_or(ScreenAction::None),
        }
    }

    fn help_text(&self) -> &'static str {
        "Class Teachers:\n\
        ↑/↓ - Select assignment\n\
        a - Add a teacher\n\
        e/Enter - Edit selected assignment\n\
        m - Load more\n\
        r - Refresh\n\
        Esc - Back"
    }

    fn on_enter(&mut self) {
        if self.schedule_item_id.is_some() {
            self.list.mount();
        }
    }

    fn on_exit(&mut self) {
        self.list.unmount();
    }

    fn tick(&mut self) -> ScreenAction {
        poll_list(&mut self.list, &mut self.selection)
    }

    fn refetch(&mut self, operation_name: &str) {
        if self.list.is_mounted() && self.list.operation_name() == operation_name {
            self.list.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::queries::SCHEDULE_ITEM_TEACHERS;
    use crate::graphql::PageInfo;
    use crate::testing::FakeApi;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn teachers_page() -> serde_json::Value {
        json!({
            "pageInfo": serde_json::to_value(PageInfo::last(Some("c1"))).unwrap(),
            "edges": [{ "node": {
                "id": "U0lUOjE=",
                "account": { "id": "a1", "fullName": "Ann" },
                "role": "SUB",
                "account2": null,
                "role2": null,
                "dateStart": "2024-01-01",
                "dateEnd": null
            }}]
        })
    }

    async fn wait_loaded(screen: &mut ClassTeachersScreen) {
        for _ in 0..200 {
            screen.tick();
            if !screen.list.is_fetching() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("list did not load");
    }

    #[tokio::test]
    async fn test_open_scopes_list_and_edit_targets_selection() {
        let api = Arc::new(FakeApi::new());
        api.push_data("scheduleItemTeachers", teachers_page());

        let mut screen = ClassTeachersScreen::new(api.clone(), 15);
        screen.open("U0k6MQ==");
        screen.on_enter();
        wait_loaded(&mut screen).await;

        assert_eq!(api.requests()[0].variable("scheduleItem"), Some(&json!("U0k6MQ==")));
        assert_eq!(screen.selection.selected(), Some(0));

        let action = screen.handle_key_event(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));
        assert_eq!(
            action,
            ScreenAction::OpenForm(FormTarget::EditClassTeacher {
                schedule_item_id: "U0k6MQ==".to_string(),
                id: "U0lUOjE=".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_refetch_only_matches_own_query() {
        let api = Arc::new(FakeApi::new());
        api.push_data("scheduleItemTeachers", teachers_page());
        api.push_data("scheduleItemTeachers", teachers_page());

        let mut screen = ClassTeachersScreen::new(api.clone(), 15);
        screen.open("U0k6MQ==");
        screen.on_enter();
        screen.list.settle().await;

        screen.refetch("FinanceInvoices");
        assert!(!screen.list.is_fetching());

        screen.refetch(SCHEDULE_ITEM_TEACHERS);
        screen.list.settle().await;
        assert_eq!(api.request_count(), 2);
    }

    #[test]
    fn test_without_class_nothing_loads() {
        let api = Arc::new(FakeApi::new());
        let mut screen = ClassTeachersScreen::new(api.clone(), 15);
        screen.on_enter();
        assert!(!screen.list.is_mounted());
        assert_eq!(api.request_count(), 0);
    }
}

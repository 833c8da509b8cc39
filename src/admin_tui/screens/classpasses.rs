//! Classpasses offered in the shop

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::admin_tui::components::{render_list, Selection, TableSpec};
use crate::admin_tui::screens::{handle_list_key, poll_list};
use crate::admin_tui::traits::{Screen, ScreenAction};
use crate::admin_tui::ui::Styles;
use crate::graphql::GraphQLApi;
use crate::listing::classpasses::classpasses_query;
use crate::listing::{truncate, ListScreen};
use crate::models::Classpass;

const HEADERS: &[&str] = &["Name", "Price", "Validity", "Classes"];
const WIDTHS: &[Constraint] = &[
    Constraint::Min(20),
    Constraint::Length(12),
    Constraint::Length(16),
    Constraint::Length(12),
];

pub struct ClasspassesScreen {
    pub list: ListScreen<Classpass>,
    pub selection: Selection,
}

impl ClasspassesScreen {
    pub fn new(api: Arc<dyn GraphQLApi>, page_size: usize) -> Self {
        Self {
            list: ListScreen::new(api, classpasses_query(page_size)),
            selection: Selection::default(),
        }
    }

    fn selected(&self) -> Option<&Classpass> {
        let index = self.selection.selected()?;
        self.list.accumulator()?.get(index)
    }
}

impl Screen for ClasspassesScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(area);

        let spec = TableSpec {
            title: "Shop Classpasses",
            headers: HEADERS,
            widths: WIDTHS,
            empty_message: "No classpasses found",
        };
        render_list(f, chunks[0], &self.list, &mut self.selection.state, &spec, |pass| {
            vec![
                truncate(&pass.name, 40),
                pass.price_display.clone(),
                format!("{} {}", pass.validity, pass.validity_unit_display),
                pass.classes_display(),
            ]
        });

        let description = self.selected().map(|pass| pass.description.clone()).unwrap_or_default();
        let details = Paragraph::new(description)
            .style(Styles::default())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Description")
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            );
        f.render_widget(details, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        handle_list_key(&mut self.list, &mut self.selection, key).unwrap_or(ScreenAction::None)
    }

    fn help_text(&self) -> &'static str {
        "Shop Classpasses:\n\
        ↑/↓ - Select classpass\n\
        m - Load more\n\
        r - Refresh\n\
        Esc - Back"
    }

    fn on_enter(&mut self) {
        self.list.mount();
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

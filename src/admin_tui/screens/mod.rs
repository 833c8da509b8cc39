//! Screen modules for the admin TUI

pub mod class_teachers;
pub mod classpasses;
pub mod help;
pub mod invoices;
pub mod main_menu;
pub mod record_form;

pub use class_teachers::ClassTeachersScreen;
pub use classpasses::ClasspassesScreen;
pub use help::HelpScreen;
pub use invoices::InvoicesScreen;
pub use main_menu::MainMenuScreen;
pub use record_form::{FormTarget, RecordFormScreen};

use crossterm::event::{KeyCode, KeyEvent};
use serde::de::DeserializeOwned;

use crate::admin_tui::components::Selection;
use crate::admin_tui::traits::ScreenAction;
use crate::listing::{ListScreen, LoadMore};

/// Keys every list screen shares. Returns `None` when the key is not a list key.
pub(crate) fn handle_list_key<T>(
    list: &mut ListScreen<T>,
    selection: &mut Selection,
    key: KeyEvent,
) -> Option<ScreenAction>
where
    T: DeserializeOwned + Send + 'static,
{
    let len = list.accumulator().map_or(0, |acc| acc.len());
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            selection.step(len, false);
            ScreenAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            selection.step(len, true);
            ScreenAction::None
        }
        KeyCode::Home => {
            if len > 0 {
                selection.select(Some(0));
            }
            ScreenAction::None
        }
        KeyCode::End => {
            if len > 0 {
                selection.select(Some(len - 1));
            }
            ScreenAction::None
        }
        KeyCode::Char('m') => match list.load_more() {
            LoadMore::Started => ScreenAction::SetLoading("Loading more...".to_string()),
            LoadMore::InFlight => ScreenAction::SetStatus("Already loading".to_string()),
            LoadMore::Exhausted => ScreenAction::SetStatus("Everything is loaded".to_string()),
            LoadMore::NotLoaded => ScreenAction::SetError("The list has not loaded yet".to_string()),
        },
        KeyCode::Char('r') => {
            list.refresh();
            selection.select(None);
            ScreenAction::SetLoading("Refreshing...".to_string())
        }
        KeyCode::Esc => ScreenAction::NavigateBack,
        _ => return None,
    };
    Some(action)
}

/// Apply a finished fetch and keep the selection on an existing row
pub(crate) fn poll_list<T>(list: &mut ListScreen<T>, selection: &mut Selection) -> ScreenAction
where
    T: DeserializeOwned + Send + 'static,
{
    if list.poll() {
        selection.clamp(list.accumulator().map_or(0, |acc| acc.len()));
    }
    ScreenAction::None
}

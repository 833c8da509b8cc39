//! Core traits shared by the admin TUI screens

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::admin_tui::app::Screen as ScreenType;
use crate::admin_tui::screens::record_form::FormTarget;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Navigate to a different screen
    NavigateTo(ScreenType),
    /// Show the teachers of one class
    OpenClassTeachers(String),
    /// Open a create or edit form
    OpenForm(FormTarget),
    /// Go back to previous screen
    NavigateBack,
    /// Quit the application
    Quit,
    /// Set status message
    SetStatus(String),
    /// Show that background work has started
    SetLoading(String),
    /// Set error message
    SetError(String),
    /// No action taken
    None,
}

/// Core trait for all TUI screens
pub trait Screen {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action for the app
    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction;

    /// Context help shown in the help popup
    fn help_text(&self) -> &'static str;

    /// Called when screen becomes active
    fn on_enter(&mut self) {}

    /// Called when screen becomes inactive
    fn on_exit(&mut self) {}

    /// Apply finished background work
    fn tick(&mut self) -> ScreenAction {
        ScreenAction::None
    }

    /// Refetch if this screen shows the named list query
    fn refetch(&mut self, _operation_name: &str) {}

    /// Whether the screen is capturing text input (global shortcuts are suspended)
    fn is_editing(&self) -> bool {
        false
    }
}

/// Trait for form handling
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let total = self.get_field_count();
        if total > 0 {
            self.set_current_field((self.get_current_field() + 1) % total);
        }
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        if total > 0 {
            self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
        }
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);
}

//! Reusable UI components for the admin TUI

pub mod form_field;
pub mod record_table;
pub mod status_display;

pub use form_field::{Form, FormField};
pub use record_table::{render_list, Selection, TableSpec};
pub use status_display::StatusDisplay;

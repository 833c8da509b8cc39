//! Editable form fields bound to record form declarations

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::admin_tui::{traits::FormHandler, ui::Styles};
use crate::forms::fields::{format_bool, parse_bool};
use crate::forms::{FieldErrors, FieldKind, FieldSpec, FormValues};

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            value: String::new(),
            is_focused: false,
            cursor_position: 0,
            validation_error: None,
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    /// Whether the field takes free text rather than a toggle or choice
    pub fn is_typed(&self) -> bool {
        !matches!(self.spec.kind, FieldKind::Bool | FieldKind::Choice(_))
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.is_typed() {
            if c == ' ' {
                self.toggle();
            }
            return;
        }
        let at = self.byte_index(self.cursor_position);
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.is_typed() && self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.is_typed() && self.cursor_position < self.value.chars().count() {
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        match self.spec.kind {
            FieldKind::Choice(options) => self.cycle_choice(options, false),
            _ => self.cursor_position = self.cursor_position.saturating_sub(1),
        }
    }

    pub fn move_cursor_right(&mut self) {
        match self.spec.kind {
            FieldKind::Choice(options) => self.cycle_choice(options, true),
            _ => {
                if self.cursor_position < self.value.chars().count() {
                    self.cursor_position += 1;
                }
            }
        }
    }

    /// Flip a yes/no field
    pub fn toggle(&mut self) {
        match self.spec.kind {
            FieldKind::Bool => {
                let current = parse_bool(self.value.trim()).unwrap_or(false);
                self.set_value(&format_bool(!current));
                self.validation_error = None;
            }
            FieldKind::Choice(options) => self.cycle_choice(options, true),
            _ => {}
        }
    }

    /// Step through the options; optional choices include an empty entry
    fn cycle_choice(&mut self, options: &[&str], forward: bool) {
        let mut choices: Vec<&str> = Vec::with_capacity(options.len() + 1);
        if !self.spec.required {
            choices.push("");
        }
        choices.extend_from_slice(options);

        let current = choices
            .iter()
            .position(|option| option.eq_ignore_ascii_case(self.value.trim()));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(0), false) => choices.len() - 1,
            (Some(i), false) => i - 1,
        };
        self.set_value(choices[next]);
        self.validation_error = None;
    }

    fn hint(&self) -> &'static str {
        match self.spec.kind {
            FieldKind::Date => "YYYY-MM-DD",
            FieldKind::Bool => "space to toggle",
            FieldKind::Choice(_) => "←/→ to choose",
            FieldKind::Reference => "record id",
            FieldKind::Text | FieldKind::TextArea => "",
        }
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let border_style = if self.validation_error.is_some() {
            Styles::error()
        } else if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let marker = if self.spec.required { " *" } else { "" };
        let title = match &self.validation_error {
            Some(error) => format!("{}{} - Error: {}", self.spec.label, marker, error),
            None => format!("{}{}", self.spec.label, marker),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let (text, style) = if self.value.is_empty() {
            (self.hint().to_string(), Styles::inactive())
        } else {
            (self.value.clone(), Styles::default())
        };

        f.render_widget(Paragraph::new(text).style(style).block(block), area);

        if self.is_focused && self.is_typed() {
            let cursor_x = area.x + 1 + self.cursor_position as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// Form container that manages multiple fields
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    pub fn new(specs: &[FieldSpec]) -> Self {
        let mut form = Self {
            fields: specs.iter().copied().map(FormField::new).collect(),
            current_field: 0,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn get_current_field(&self) -> Option<&FormField> {
        self.fields.get(self.current_field)
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Fill every field from loaded values
    pub fn set_values(&mut self, values: &FormValues) {
        for field in &mut self.fields {
            field.set_value(values.get(field.spec.name));
            field.validation_error = None;
        }
    }

    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.spec.name, field.value.as_str()))
            .collect()
    }

    /// Attach validation messages and focus the first failing field
    pub fn apply_errors(&mut self, errors: &FieldErrors) {
        let mut first = None;
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.validation_error = errors.get(field.spec.name).map(str::to_string);
            if field.validation_error.is_some() && first.is_none() {
                first = Some(i);
            }
        }
        if let Some(i) = first {
            self.set_current_field(i);
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        if self.fields.is_empty() {
            return;
        }
        let mut constraints = vec![Constraint::Length(3); self.fields.len()];
        constraints.push(Constraint::Min(0));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (field, chunk) in self.fields.iter().zip(chunks.iter()) {
            field.render(f, *chunk);
        }
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }
}

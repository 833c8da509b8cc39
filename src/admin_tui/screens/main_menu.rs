//! Main menu screen for the admin TUI

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::admin_tui::app::Screen as ScreenType;
use crate::admin_tui::components::Form;
use crate::admin_tui::screens::FormTarget;
use crate::admin_tui::traits::{FormHandler, Screen, ScreenAction};
use crate::admin_tui::ui::{centered_rect, step_selection, Styles};
use crate::forms::fields::validate;
use crate::forms::{FieldKind, FieldSpec, FormValues};

const NO_PROMPT: &[FieldSpec] = &[];
const CLASS_PROMPT: &[FieldSpec] = &[FieldSpec::new("scheduleItem", "Class id", FieldKind::Reference).required()];
const RECORD_PROMPT: &[FieldSpec] = &[FieldSpec::new("id", "Record id", FieldKind::Reference).required()];
const ACCOUNT_SUBSCRIPTION_PROMPT: &[FieldSpec] = &[
    FieldSpec::new("account", "Account id", FieldKind::Reference).required(),
    FieldSpec::new("id", "Subscription id", FieldKind::Reference).required(),
];

/// What a menu entry opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Invoices,
    Classpasses,
    ClassTeachers,
    AddLocation,
    EditPaymentBatchCategory,
    EditSubscriptionGroup,
    EditAccountSubscription,
    Help,
}

impl MenuTarget {
    /// Ids the user must enter before the target can open
    fn prompt(&self) -> &'static [FieldSpec] {
        match self {
            MenuTarget::ClassTeachers => CLASS_PROMPT,
            MenuTarget::EditPaymentBatchCategory | MenuTarget::EditSubscriptionGroup => RECORD_PROMPT,
            MenuTarget::EditAccountSubscription => ACCOUNT_SUBSCRIPTION_PROMPT,
            MenuTarget::Invoices | MenuTarget::Classpasses | MenuTarget::AddLocation | MenuTarget::Help => {
                NO_PROMPT
            }
        }
    }

    fn action(&self, values: &FormValues) -> ScreenAction {
        let value = |name: &str| values.get(name).trim().to_string();
        match self {
            MenuTarget::Invoices => ScreenAction::NavigateTo(ScreenType::Invoices),
            MenuTarget::Classpasses => ScreenAction::NavigateTo(ScreenType::Classpasses),
            MenuTarget::Help => ScreenAction::NavigateTo(ScreenType::Help),
            MenuTarget::ClassTeachers => ScreenAction::OpenClassTeachers(value("scheduleItem")),
            MenuTarget::AddLocation => ScreenAction::OpenForm(FormTarget::AddLocation),
            MenuTarget::EditPaymentBatchCategory => {
                ScreenAction::OpenForm(FormTarget::EditPaymentBatchCategory { id: value("id") })
            }
            MenuTarget::EditSubscriptionGroup => {
                ScreenAction::OpenForm(FormTarget::EditSubscriptionGroup { id: value("id") })
            }
            MenuTarget::EditAccountSubscription => ScreenAction::OpenForm(FormTarget::EditAccountSubscription {
                account_id: value("account"),
                id: value("id"),
            }),
        }
    }
}

/// Main menu options
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub title: String,
    pub description: String,
    pub shortcut: char,
    pub target: MenuTarget,
}

impl MenuOption {
    pub fn new(title: &str, description: &str, shortcut: char, target: MenuTarget) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            shortcut,
            target,
        }
    }
}

/// Id entry popup shown before opening a record-scoped screen
struct Prompt {
    target: MenuTarget,
    form: Form,
}

/// Main menu screen state
pub struct MainMenuScreen {
    pub menu_state: ListState,
    pub menu_options: Vec<MenuOption>,
    prompt: Option<Prompt>,
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenuScreen {
    pub fn new() -> Self {
        let menu_options = vec![
            MenuOption::new("Invoices", "Browse, filter and delete finance invoices", 'I', MenuTarget::Invoices),
            MenuOption::new("Classpasses", "Classpasses offered in the shop", 'C', MenuTarget::Classpasses),
            MenuOption::new(
                "Class Teachers",
                "Teachers assigned to one class, with add and edit",
                'T',
                MenuTarget::ClassTeachers,
            ),
            MenuOption::new("Add Location", "Create a school location", 'L', MenuTarget::AddLocation),
            MenuOption::new(
                "Edit Payment Batch Category",
                "Change a finance payment batch category",
                'B',
                MenuTarget::EditPaymentBatchCategory,
            ),
            MenuOption::new(
                "Edit Subscription Group",
                "Rename or describe a subscription group",
                'G',
                MenuTarget::EditSubscriptionGroup,
            ),
            MenuOption::new(
                "Edit Account Subscription",
                "Change a subscription held by an account",
                'S',
                MenuTarget::EditAccountSubscription,
            ),
            MenuOption::new("Help", "View help and keyboard shortcuts", 'H', MenuTarget::Help),
        ];

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            menu_state,
            menu_options,
            prompt: None,
        }
    }

    fn activate(&mut self, target: MenuTarget) -> ScreenAction {
        let specs = target.prompt();
        if specs.is_empty() {
            return target.action(&FormValues::new());
        }
        self.prompt = Some(Prompt {
            target,
            form: Form::new(specs),
        });
        ScreenAction::None
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> ScreenAction {
        let Some(prompt) = self.prompt.as_mut() else {
            return ScreenAction::None;
        };

        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
            }
            KeyCode::Enter => {
                let values = prompt.form.values();
                match validate(prompt.target.prompt(), &values) {
                    Ok(_) => {
                        let action = prompt.target.action(&values);
                        self.prompt = None;
                        return action;
                    }
                    Err(errors) => prompt.form.apply_errors(&errors),
                }
            }
            KeyCode::Tab | KeyCode::Down => prompt.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => prompt.form.previous_field(),
            KeyCode::Left => {
                if let Some(field) = prompt.form.get_current_field_mut() {
                    field.move_cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(field) = prompt.form.get_current_field_mut() {
                    field.move_cursor_right();
                }
            }
            KeyCode::Backspace => prompt.form.handle_backspace(),
            KeyCode::Delete => prompt.form.handle_delete(),
            KeyCode::Char(c) => prompt.form.handle_char_input(c),
            _ => {}
        }
        ScreenAction::None
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new("Studio Administration")
            .style(Styles::title().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_menu(&mut self, f: &mut Frame, area: Rect) {
        let selected = self.menu_state.selected();
        let items: Vec<ListItem> = self
            .menu_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == selected {
                    Styles::selected()
                } else {
                    Style::default()
                };

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", option.shortcut), Styles::info()),
                        Span::styled(option.title.clone(), style.add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", option.description),
                        if Some(i) == selected { style } else { Styles::inactive() },
                    )),
                ])
            })
            .collect();

        let menu = List::new(items)
            .block(
                Block::default()
                    .title("Main Menu")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(menu, area, &mut self.menu_state);
    }

    fn draw_instructions(&self, f: &mut Frame, area: Rect) {
        let instructions = vec![
            Line::from(vec![
                Span::styled("Navigation: ", Styles::info()),
                Span::raw("↑/↓ to move, "),
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to select"),
            ]),
            Line::from(vec![
                Span::styled("Global: ", Styles::info()),
                Span::styled("F1/?", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" for help, "),
                Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to quit"),
            ]),
        ];

        let paragraph = Paragraph::new(instructions).block(
            Block::default()
                .title("Instructions")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(paragraph, area);
    }

    fn draw_prompt(&self, f: &mut Frame, area: Rect) {
        let Some(prompt) = &self.prompt else {
            return;
        };
        let popup = centered_rect(50, 40, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title("Enter ids (Enter: open, Esc: cancel)")
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup);
        f.render_widget(block, popup);
        prompt.form.render(f, inner);
    }
}

impl Screen for MainMenuScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(4)])
            .split(area);

        self.draw_title(f, chunks[0]);
        self.draw_menu(f, chunks[1]);
        self.draw_instructions(f, chunks[2]);
        self.draw_prompt(f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        match key.code {
            KeyCode::Up | KeyCode::Down => {
                let next = step_selection(
                    self.menu_state.selected(),
                    self.menu_options.len(),
                    key.code == KeyCode::Down,
                );
                self.menu_state.select(next);
                ScreenAction::None
            }
            KeyCode::Enter => {
                let target = self
                    .menu_state
                    .selected()
                    .and_then(|i| self.menu_options.get(i))
                    .map(|option| option.target);
                match target {
                    Some(target) => self.activate(target),
                    None => ScreenAction::None,
                }
            }
            KeyCode::Char(c) => {
                let upper = c.to_ascii_uppercase();
                let target = self
                    .menu_options
                    .iter()
                    .find(|option| option.shortcut == upper)
                    .map(|option| option.target);
                match target {
                    Some(target) => self.activate(target),
                    None => ScreenAction::None,
                }
            }
            _ => ScreenAction::None,
        }
    }

    fn help_text(&self) -> &'static str {
        "Main Menu:\n\
        ↑/↓ - Navigate menu\n\
        Enter - Select option\n\
        I/C/T/L/B/G/S/H - Jump to option\n\
        q - Quit"
    }

    fn on_exit(&mut self) {
        self.prompt = None;
    }

    fn is_editing(&self) -> bool {
        self.prompt.is_some()
    }
}

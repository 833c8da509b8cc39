//! Create and edit screen shared by every record form

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::admin_tui::components::Form;
use crate::admin_tui::traits::{FormHandler, Screen, ScreenAction};
use crate::admin_tui::ui::Styles;
use crate::forms::{
    open_form, AddLocationForm, ClassTeacherForm, EditAccountSubscriptionForm, EditPaymentBatchCategoryForm,
    EditSubscriptionGroupForm, FormValues, Navigator, Notifier, RecordForm, SubmissionError, Submitted, Submitter,
};
use crate::graphql::{ApiError, GraphQLApi};

/// Which form to open, and for which record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    AddLocation,
    EditPaymentBatchCategory { id: String },
    EditSubscriptionGroup { id: String },
    EditAccountSubscription { account_id: String, id: String },
    AddClassTeacher { schedule_item_id: String },
    EditClassTeacher { schedule_item_id: String, id: String },
}

impl FormTarget {
    pub fn build(&self) -> Arc<dyn RecordForm> {
        match self.clone() {
            FormTarget::AddLocation => Arc::new(AddLocationForm),
            FormTarget::EditPaymentBatchCategory { id } => Arc::new(EditPaymentBatchCategoryForm::new(id)),
            FormTarget::EditSubscriptionGroup { id } => Arc::new(EditSubscriptionGroupForm::new(id)),
            FormTarget::EditAccountSubscription { account_id, id } => {
                Arc::new(EditAccountSubscriptionForm::new(account_id, id))
            }
            FormTarget::AddClassTeacher { schedule_item_id } => Arc::new(ClassTeacherForm::add(schedule_item_id)),
            FormTarget::EditClassTeacher { schedule_item_id, id } => {
                Arc::new(ClassTeacherForm::edit(schedule_item_id, id))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Closed,
    Loading,
    Ready,
    LoadFailed(String),
}

struct PendingLoad {
    receiver: oneshot::Receiver<Result<FormValues, ApiError>>,
    handle: JoinHandle<()>,
}

pub struct RecordFormScreen {
    api: Arc<dyn GraphQLApi>,
    target: Option<FormTarget>,
    form: Option<Arc<dyn RecordForm>>,
    pub fields: Form,
    pub state: FormState,
    loader: Option<PendingLoad>,
    submitter: Submitter,
}

impl RecordFormScreen {
    pub fn new(api: Arc<dyn GraphQLApi>) -> Self {
        Self {
            submitter: Submitter::new(Arc::clone(&api)),
            api,
            target: None,
            form: None,
            fields: Form::default(),
            state: FormState::Closed,
            loader: None,
        }
    }

    /// Select the form to show; loading starts when the screen is entered
    pub fn open(&mut self, target: FormTarget) {
        self.stop();
        let form = target.build();
        self.fields = Form::new(form.fields());
        self.form = Some(form);
        self.target = Some(target);
        self.state = FormState::Closed;
    }

    pub fn target(&self) -> Option<&FormTarget> {
        self.target.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.submitter.is_in_flight()
    }

    fn start_load(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        if let Some(loader) = self.loader.take() {
            loader.handle.abort();
        }
        debug!("Opening form: {}", form.title());

        let api = Arc::clone(&self.api);
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = open_form(api.as_ref(), form.as_ref()).await;
            tx.send(result).ok();
        });

        self.loader = Some(PendingLoad { receiver: rx, handle });
        self.state = FormState::Loading;
    }

    fn poll_load(&mut self) -> ScreenAction {
        let Some(loader) = self.loader.as_mut() else {
            return ScreenAction::None;
        };
        let result = match loader.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return ScreenAction::None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.loader = None;
                return ScreenAction::None;
            }
        };
        self.loader = None;

        match result {
            Ok(values) => {
                self.fields.set_values(&values);
                self.state = FormState::Ready;
                ScreenAction::None
            }
            Err(e) => {
                warn!("Failed to load record: {}", e);
                let message = format!("Failed to load record: {}", e);
                self.state = FormState::LoadFailed(message.clone());
                ScreenAction::SetError(message)
            }
        }
    }

    /// Report a finished save through the given notifier and navigator
    pub fn poll_submission(
        &mut self,
        notifier: &mut dyn Notifier,
        navigator: &mut dyn Navigator,
    ) -> Option<Result<Submitted, SubmissionError>> {
        self.submitter.poll(notifier, navigator)
    }

    fn save(&mut self) -> ScreenAction {
        let Some(form) = self.form.as_ref() else {
            return ScreenAction::None;
        };
        match self.submitter.begin(form.as_ref(), &self.fields.values()) {
            Ok(()) => ScreenAction::SetLoading("Saving...".to_string()),
            Err(SubmissionError::Invalid(errors)) => {
                self.fields.apply_errors(&errors);
                ScreenAction::SetError(format!("Please correct: {}", errors))
            }
            Err(SubmissionError::InFlight) => ScreenAction::SetStatus("Already saving".to_string()),
            Err(e) => ScreenAction::SetError(e.to_string()),
        }
    }

    fn stop(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.handle.abort();
        }
        self.submitter.cancel();
    }

    fn draw_hints(&self, f: &mut Frame, area: Rect) {
        let status = if self.is_saving() {
            Span::styled("Saving...  ", Styles::warning())
        } else {
            Span::raw("")
        };
        let hints = Paragraph::new(Line::from(vec![
            status,
            Span::styled("Tab/↑↓", Styles::info()),
            Span::raw(" field  "),
            Span::styled("Enter", Styles::info()),
            Span::raw(" save  "),
            Span::styled("Esc", Styles::info()),
            Span::raw(" cancel"),
        ]))
        .block(Block::default().borders(Borders::TOP).border_style(Styles::inactive_border()));
        f.render_widget(hints, area);
    }
}

impl Screen for RecordFormScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let title = self.form.as_ref().map(|form| form.title()).unwrap_or_default();
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(inner);

        match &self.state {
            FormState::Closed | FormState::Loading => {
                f.render_widget(Paragraph::new("Loading...").style(Styles::warning()), chunks[0]);
            }
            FormState::LoadFailed(message) => {
                let text = vec![
                    Line::from(Span::styled(message.clone(), Styles::error())),
                    Line::from(""),
                    Line::from("r: retry  Esc: back"),
                ];
                f.render_widget(Paragraph::new(text), chunks[0]);
            }
            FormState::Ready => self.fields.render(f, chunks[0]),
        }

        self.draw_hints(f, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if key.code == KeyCode::Esc {
            return ScreenAction::NavigateBack;
        }

        match &self.state {
            FormState::Ready => {}
            FormState::LoadFailed(_) => {
                if key.code == KeyCode::Char('r') {
                    self.start_load();
                }
                return ScreenAction::None;
            }
            _ => return ScreenAction::None,
        }

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.save(),
            KeyCode::Enter => self.save(),
            KeyCode::Tab | KeyCode::Down => {
                self.fields.next_field();
                ScreenAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.fields.previous_field();
                ScreenAction::None
            }
            KeyCode::Left => {
                if let Some(field) = self.fields.get_current_field_mut() {
                    field.move_cursor_left();
                }
                ScreenAction::None
            }
            KeyCode::Right => {
                if let Some(field) = self.fields.get_current_field_mut() {
                    field.move_cursor_right();
                }
                ScreenAction::None
            }
            KeyCode::Backspace => {
                self.fields.handle_backspace();
                ScreenAction::None
            }
            KeyCode::Delete => {
                self.fields.handle_delete();
                ScreenAction::None
            }
            KeyCode::Char(c) => {
                self.fields.handle_char_input(c);
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    fn help_text(&self) -> &'static str {
        "Record Form:\n\
        Tab/↓ - Next field\n\
        Shift+Tab/↑ - Previous field\n\
        Space - Toggle yes/no fields\n\
        ←/→ - Move cursor or change choice\n\
        Enter or Ctrl+S - Save\n\
        Esc - Cancel"
    }

    fn on_enter(&mut self) {
        self.start_load();
    }

    fn on_exit(&mut self) {
        self.stop();
        self.state = FormState::Closed;
    }

    fn tick(&mut self) -> ScreenAction {
        self.poll_load()
    }

    fn is_editing(&self) -> bool {
        self.state == FormState::Ready
    }
}

//! Help screen for the admin TUI

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::admin_tui::traits::{Screen, ScreenAction};
use crate::admin_tui::ui::Styles;

/// Help sections
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HelpSection {
    Overview,
    Lists,
    Forms,
    Shortcuts,
}

impl HelpSection {
    pub const ALL: [HelpSection; 4] = [
        HelpSection::Overview,
        HelpSection::Lists,
        HelpSection::Forms,
        HelpSection::Shortcuts,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            HelpSection::Overview => "Overview",
            HelpSection::Lists => "Paginated Lists",
            HelpSection::Forms => "Editing Records",
            HelpSection::Shortcuts => "Keyboard Shortcuts",
        }
    }

    fn content(&self) -> Vec<Line<'static>> {
        match self {
            HelpSection::Overview => vec![
                Line::from(Span::styled("Studio Administration", Styles::title())),
                Line::from(""),
                Line::from("A terminal client for the studio management GraphQL backend."),
                Line::from(""),
                Line::from(Span::styled("Features:", Styles::info())),
                Line::from("• Finance invoices with status filter and delete"),
                Line::from("• Shop classpasses"),
                Line::from("• Teachers assigned to a class"),
                Line::from("• Forms for locations, payment batch categories,"),
                Line::from("  subscription groups and account subscriptions"),
                Line::from(""),
                Line::from("Set STUDIO_ADMIN_API_URL and STUDIO_ADMIN_TOKEN before starting."),
            ],
            HelpSection::Lists => vec![
                Line::from(Span::styled("Paginated Lists", Styles::title())),
                Line::from(""),
                Line::from("Lists load their first page when opened. Further pages are"),
                Line::from("appended below the rows already shown."),
                Line::from(""),
                Line::from(Span::styled("Footer:", Styles::info())),
                Line::from("• m: load more - another page is available"),
                Line::from("• end of list - every row is loaded"),
                Line::from("• load more failed - press m to retry; loaded rows are kept"),
                Line::from(""),
                Line::from("Leaving a list discards it; it reloads from the first page"),
                Line::from("the next time it is opened."),
            ],
            HelpSection::Forms => vec![
                Line::from(Span::styled("Editing Records", Styles::title())),
                Line::from(""),
                Line::from("Edit forms load the record first. Fields marked * are required."),
                Line::from(""),
                Line::from(Span::styled("Field types:", Styles::info())),
                Line::from("• Dates are entered as YYYY-MM-DD"),
                Line::from("• Yes/no fields toggle with space"),
                Line::from("• Choice fields change with ←/→"),
                Line::from(""),
                Line::from("Enter saves. Invalid fields are highlighted and nothing is sent."),
                Line::from("After a successful save you return to the related list."),
            ],
            HelpSection::Shortcuts => vec![
                Line::from(Span::styled("Keyboard Shortcuts Reference", Styles::title())),
                Line::from(""),
                Line::from(Span::styled("Global Shortcuts:", Styles::info())),
                Line::from("┌─────────────┬─────────────────────────────────┐"),
                Line::from("│ ESC         │ Go back / Main menu             │"),
                Line::from("│ q           │ Quit (not while typing)         │"),
                Line::from("│ F1 or ?     │ Toggle help popup               │"),
                Line::from("└─────────────┴─────────────────────────────────┘"),
                Line::from(""),
                Line::from(Span::styled("Lists:", Styles::info())),
                Line::from("┌─────────────┬─────────────────────────────────┐"),
                Line::from("│ ↑/↓ j/k     │ Select row                      │"),
                Line::from("│ m           │ Load more                       │"),
                Line::from("│ r           │ Refresh                         │"),
                Line::from("│ f           │ Invoice status filter           │"),
                Line::from("│ d           │ Delete invoice                  │"),
                Line::from("│ a / e       │ Add / edit class teacher        │"),
                Line::from("└─────────────┴─────────────────────────────────┘"),
            ],
        }
    }
}

/// Help screen state
pub struct HelpScreen {
    pub current_section: usize,
    pub section_state: ListState,
    pub scroll_offset: usize,
}

impl Default for HelpScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpScreen {
    pub fn new() -> Self {
        let mut section_state = ListState::default();
        section_state.select(Some(0));

        Self {
            current_section: 0,
            section_state,
            scroll_offset: 0,
        }
    }

    fn select(&mut self, section: usize) {
        self.current_section = section;
        self.section_state.select(Some(section));
        self.scroll_offset = 0;
    }

    fn draw_section_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = HelpSection::ALL
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let style = if i == self.current_section {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(section.as_str().to_string(), style)))
            })
            .collect();

        let section_list = List::new(items)
            .block(
                Block::default()
                    .title("Help Sections")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(section_list, area, &mut self.section_state);
    }

    fn draw_content(&self, f: &mut Frame, area: Rect) {
        let section = HelpSection::ALL[self.current_section];
        let visible_lines: Vec<Line> = section.content().into_iter().skip(self.scroll_offset).collect();

        let content = Paragraph::new(visible_lines)
            .block(
                Block::default()
                    .title(format!("Help - {}", section.as_str()))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(content, area);
    }
}

impl Screen for HelpScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(area);

        self.draw_section_list(f, chunks[0]);
        self.draw_content(f, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up if self.current_section > 0 => self.select(self.current_section - 1),
            KeyCode::Down if self.current_section + 1 < HelpSection::ALL.len() => {
                self.select(self.current_section + 1)
            }
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            KeyCode::PageDown => self.scroll_offset += 10,
            KeyCode::Home => self.scroll_offset = 0,
            KeyCode::Esc => return ScreenAction::NavigateBack,
            _ => {}
        }
        ScreenAction::None
    }

    fn help_text(&self) -> &'static str {
        "Help:\n\
        ↑/↓ - Select section\n\
        PgUp/PgDn - Scroll\n\
        Esc - Back"
    }

    fn on_enter(&mut self) {
        self.select(0);
    }
}

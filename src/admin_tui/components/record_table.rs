//! Table rendering for paginated list screens

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::admin_tui::ui::{step_selection, Styles};
use crate::listing::{ListScreen, ListState};

/// Row selection over a table whose length changes as pages arrive
#[derive(Debug, Default)]
pub struct Selection {
    pub state: TableState,
}

impl Selection {
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    pub fn step(&mut self, len: usize, forward: bool) {
        let next = step_selection(self.state.selected(), len, forward);
        self.state.select(next);
    }

    /// Keep the selection on an existing row after the list changed
    pub fn clamp(&mut self, len: usize) {
        let selected = match (self.state.selected(), len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.state.select(selected);
    }
}

/// Static description of a table's columns
pub struct TableSpec<'a> {
    pub title: &'a str,
    pub headers: &'a [&'a str],
    pub widths: &'a [Constraint],
    pub empty_message: &'a str,
}

/// Render every state of a list screen: loading, error, empty or the rows
/// accumulated so far, with a footer describing pagination.
pub fn render_list<T, F>(
    f: &mut Frame,
    area: Rect,
    screen: &ListScreen<T>,
    table_state: &mut TableState,
    spec: &TableSpec<'_>,
    to_cells: F,
) where
    T: serde::de::DeserializeOwned + Send + 'static,
    F: Fn(&T) -> Vec<String>,
{
    let block = Block::default()
        .title(spec.title)
        .borders(Borders::ALL)
        .border_style(Styles::active_border());

    match screen.state() {
        ListState::Unmounted | ListState::Loading => {
            let loading = Paragraph::new("Loading...").style(Styles::warning()).block(block);
            f.render_widget(loading, area);
        }
        ListState::Failed(e) => {
            let error = Paragraph::new(format!("Failed to load: {}", e))
                .style(Styles::error())
                .block(block);
            f.render_widget(error, area);
        }
        ListState::Empty => {
            let empty = Paragraph::new(spec.empty_message).style(Styles::inactive()).block(block);
            f.render_widget(empty, area);
        }
        ListState::Populated(acc) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);

            let header = Row::new(spec.headers.iter().map(|h| h.to_string())).style(Styles::header());
            let rows: Vec<Row> = acc.nodes().map(|node| Row::new(to_cells(node))).collect();

            let table = Table::new(rows, spec.widths.to_vec())
                .header(header)
                .block(block)
                .highlight_style(Styles::selected());
            f.render_stateful_widget(table, chunks[0], table_state);

            f.render_widget(Paragraph::new(footer(screen, acc.len())), chunks[1]);
        }
    }
}

fn footer<T>(screen: &ListScreen<T>, loaded: usize) -> Line<'static>
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    let mut spans = vec![Span::styled(format!(" {} loaded ", loaded), Styles::info())];

    if screen.is_fetching() {
        spans.push(Span::styled("| loading more...", Styles::warning()));
    } else if let Some(e) = screen.last_error() {
        spans.push(Span::styled(format!("| load more failed: {} (m to retry)", e), Styles::error()));
    } else if screen.can_load_more() {
        spans.push(Span::styled("| m: load more", Styles::default()));
    } else {
        spans.push(Span::styled("| end of list", Styles::inactive()));
    }

    Line::from(spans)
}

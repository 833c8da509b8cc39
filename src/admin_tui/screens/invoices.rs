//! Finance invoices screen: paginated list with status filter and delete

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

use crate::admin_tui::components::{render_list, Selection, TableSpec};
use crate::admin_tui::screens::{handle_list_key, poll_list};
use crate::admin_tui::traits::{Screen, ScreenAction};
use crate::admin_tui::ui::Styles;
use crate::graphql::{ApiError, GraphQLApi};
use crate::listing::invoices::{delete_invoice, invoices_query, InvoiceFilter, InvoiceRow};
use crate::listing::ListScreen;
use crate::models::Invoice;
use crate::paging::Keyed;

const HEADERS: &[&str] = &["Status", "Number", "Relation", "Summary", "Sent", "Due", "Total", "Balance"];
const WIDTHS: &[Constraint] = &[
    Constraint::Length(10),
    Constraint::Length(14),
    Constraint::Min(16),
    Constraint::Length(21),
    Constraint::Length(11),
    Constraint::Length(11),
    Constraint::Length(12),
    Constraint::Length(12),
];

struct PendingDelete {
    invoice_number: String,
    receiver: oneshot::Receiver<Result<(), ApiError>>,
    handle: JoinHandle<()>,
}

pub struct InvoicesScreen {
    api: Arc<dyn GraphQLApi>,
    page_size: usize,
    pub filter: InvoiceFilter,
    pub list: ListScreen<Invoice>,
    pub selection: Selection,
    /// Invoice (id, number) waiting for delete confirmation
    confirm_delete: Option<(String, String)>,
    pending_delete: Option<PendingDelete>,
}

impl InvoicesScreen {
    pub fn new(api: Arc<dyn GraphQLApi>, page_size: usize) -> Self {
        let filter = InvoiceFilter::default();
        Self {
            list: ListScreen::new(Arc::clone(&api), invoices_query(filter, page_size)),
            api,
            page_size,
            filter,
            selection: Selection::default(),
            confirm_delete: None,
            pending_delete: None,
        }
    }

    pub fn selected_invoice(&self) -> Option<&Invoice> {
        let index = self.selection.selected()?;
        self.list.accumulator()?.get(index)
    }

    /// Show the next status filter and refetch from the first page
    pub fn cycle_filter(&mut self) -> ScreenAction {
        self.filter = self.filter.next();
        self.list.set_query(invoices_query(self.filter, self.page_size));
        self.selection.select(None);
        ScreenAction::SetStatus(format!("Showing {} invoices", self.filter.label().to_lowercase()))
    }

    fn start_delete(&mut self, invoice_id: String, invoice_number: String) -> ScreenAction {
        if self.pending_delete.is_some() {
            return ScreenAction::SetStatus("A delete is already in progress".to_string());
        }
        info!("Deleting invoice {}", invoice_number);

        let api = Arc::clone(&self.api);
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = delete_invoice(api.as_ref(), &invoice_id).await;
            tx.send(result).ok();
        });

        self.pending_delete = Some(PendingDelete {
            invoice_number: invoice_number.clone(),
            receiver: rx,
            handle,
        });
        ScreenAction::SetLoading(format!("Deleting invoice {}...", invoice_number))
    }

    fn poll_delete(&mut self) -> ScreenAction {
        let Some(pending) = self.pending_delete.as_mut() else {
            return ScreenAction::None;
        };
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return ScreenAction::None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending_delete = None;
                return ScreenAction::None;
            }
        };
        let number = std::mem::take(&mut pending.invoice_number);
        self.pending_delete = None;

        match result {
            Ok(()) => {
                self.list.refresh();
                ScreenAction::SetStatus(format!("Invoice {} deleted", number))
            }
            Err(e) => ScreenAction::SetError(format!("Server error: {}", e)),
        }
    }

    fn draw_filter_bar(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Status: ", Styles::info()),
            Span::styled(self.filter.label().to_string(), Styles::title()),
            Span::raw("   f: filter  m: load more  r: refresh  d: delete  Esc: back"),
        ];
        if let Some((_, number)) = &self.confirm_delete {
            spans = vec![Span::styled(
                format!("Delete invoice {}? (y/n)", number),
                Styles::error(),
            )];
        }
        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(bar, area);
    }
}

impl Screen for InvoicesScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.draw_filter_bar(f, chunks[0]);

        let spec = TableSpec {
            title: "Finance Invoices",
            headers: HEADERS,
            widths: WIDTHS,
            empty_message: "No invoices found",
        };
        render_list(f, chunks[1], &self.list, &mut self.selection.state, &spec, |invoice| {
            let row = InvoiceRow::from(invoice);
            vec![
                row.status,
                row.invoice_number,
                row.relation,
                row.summary,
                row.date_sent,
                row.date_due,
                row.total,
                row.balance,
            ]
        });
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if let Some((id, number)) = self.confirm_delete.take() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.start_delete(id, number),
                _ => ScreenAction::SetStatus("Delete cancelled".to_string()),
            };
        }

        match key.code {
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('d') | KeyCode::Delete => match self.selected_invoice() {
                Some(invoice) => {
                    self.confirm_delete = Some((invoice.key().to_string(), invoice.invoice_number.clone()));
                    ScreenAction::None
                }
                None => ScreenAction::SetError("Select an invoice first".to_string()),
            },
            _ => handle_list_key(&mut self.list, &mut self.selection, key).unwrap_or(ScreenAction::None),
        }
    }

    fn help_text(&self) -> &'static str {
        "Finance Invoices:\n\
        ↑/↓ - Select invoice\n\
        m - Load more\n\
        f - Cycle status filter\n\
        r - Refresh from the first page\n\
        d - Delete selected invoice\n\
        Esc - Back"
    }

    fn on_enter(&mut self) {
        self.list.mount();
    }

    fn on_exit(&mut self) {
        self.list.unmount();
        self.selection.select(None);
        self.confirm_delete = None;
        if let Some(pending) = self.pending_delete.take() {
            pending.handle.abort();
        }
    }

    fn tick(&mut self) -> ScreenAction {
        poll_list(&mut self.list, &mut self.selection);
        self.poll_delete()
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
    use crate::graphql::PageInfo;
    use crate::listing::ListState;
    use crate::testing::FakeApi;
    use crossterm::event::KeyModifiers;
    use serde_json::json;
    use std::time::Duration;

    fn invoice_json(id: &str) -> serde_json::Value {
        json!({
            "node": {
                "id": id,
                "invoiceNumber": format!("INV-{}", id),
                "relationCompany": "",
                "relationContactName": "Jane Doe",
                "status": "SENT",
                "summary": "Membership",
                "dateSent": "2024-01-01",
                "dateDue": "2024-01-15",
                "totalDisplay": "€ 10.00",
                "balanceDisplay": "€ 10.00"
            }
        })
    }

    fn page(ids: &[&str], page_info: PageInfo) -> serde_json::Value {
        json!({
            "pageInfo": serde_json::to_value(page_info).unwrap(),
            "edges": ids.iter().map(|id| invoice_json(id)).collect::<Vec<_>>(),
        })
    }

    fn row_count(screen: &InvoicesScreen) -> usize {
        screen.list.accumulator().map_or(0, |acc| acc.len())
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    async fn settle(screen: &mut InvoicesScreen) -> ScreenAction {
        for _ in 0..200 {
            let action = screen.tick();
            if !screen.list.is_fetching() && screen.pending_delete.is_none() {
                return action;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("background work did not finish");
    }

    #[tokio::test]
    async fn test_load_more_appends_next_page() {
        let api = Arc::new(FakeApi::new());
        api.push_data("financeInvoices", page(&["1", "2"], PageInfo::more("c1")));
        api.push_data("financeInvoices", page(&["3"], PageInfo::last(Some("c2"))));

        let mut screen = InvoicesScreen::new(api.clone(), 2);
        screen.on_enter();
        settle(&mut screen).await;
        assert_eq!(row_count(&screen), 2);
        assert_eq!(screen.selection.selected(), Some(0));

        screen.handle_key_event(key('m'));
        settle(&mut screen).await;
        assert_eq!(row_count(&screen), 3);
        assert_eq!(api.requests()[1].variable("after"), Some(&json!("c1")));
        assert_eq!(api.requests()[1].variable("first"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_filter_refetches_with_status() {
        let api = Arc::new(FakeApi::new());
        api.push_data("financeInvoices", page(&["1"], PageInfo::last(None)));
        api.push_data("financeInvoices", page(&[], PageInfo::last(None)));

        let mut screen = InvoicesScreen::new(api.clone(), 15);
        screen.on_enter();
        settle(&mut screen).await;

        screen.handle_key_event(key('f'));
        settle(&mut screen).await;
        assert!(matches!(screen.list.state(), ListState::Empty));
        assert_eq!(api.requests()[1].variable("status"), Some(&json!("DRAFT")));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_then_refreshes() {
        let api = Arc::new(FakeApi::new());
        api.push_data("financeInvoices", page(&["1", "2"], PageInfo::last(None)));
        api.push_data("deleteFinanceInvoice", json!({ "ok": true }));
        api.push_data("financeInvoices", page(&["2"], PageInfo::last(None)));

        let mut screen = InvoicesScreen::new(api.clone(), 15);
        screen.on_enter();
        settle(&mut screen).await;

        screen.handle_key_event(key('d'));
        assert_eq!(api.request_count(), 1);
        screen.handle_key_event(key('y'));

        let mut action = ScreenAction::None;
        for _ in 0..200 {
            action = screen.tick();
            if action != ScreenAction::None {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(action, ScreenAction::SetStatus("Invoice INV-1 deleted".to_string()));
        settle(&mut screen).await;
        assert_eq!(row_count(&screen), 1);
        assert_eq!(api.requests()[1].variable("input"), Some(&json!({ "id": "1" })));
    }

    #[tokio::test]
    async fn test_leaving_discards_in_flight_page() {
        let (api, gate) = FakeApi::gated();
        let api = Arc::new(api);
        api.push_data("financeInvoices", page(&["1"], PageInfo::last(None)));

        let mut screen = InvoicesScreen::new(api, 15);
        screen.on_enter();
        screen.on_exit();
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(10)).await;

        screen.tick();
        assert!(matches!(screen.list.state(), ListState::Unmounted));
    }
}

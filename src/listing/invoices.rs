//! Finance invoice listing, deletion and export

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::graphql::client::mutate;
use crate::graphql::queries::{
    DELETE_FINANCE_INVOICE, DELETE_FINANCE_INVOICE_MUTATION, FINANCE_INVOICES, FINANCE_INVOICES_QUERY,
};
use crate::graphql::{ApiError, GraphQLApi, GraphQLRequest};
use crate::listing::{truncate, ListQuery};
use crate::models::{Invoice, InvoiceStatus};

pub const SUMMARY_WIDTH: usize = 20;

/// Status filter applied to the invoice list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
}

impl InvoiceFilter {
    pub fn status(status: InvoiceStatus) -> Self {
        Self { status: Some(status) }
    }

    /// Cycle through "all" and each status in turn
    pub fn next(self) -> Self {
        let status = match self.status {
            None => Some(InvoiceStatus::ALL[0]),
            Some(current) => InvoiceStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| InvoiceStatus::ALL.get(i + 1).copied()),
        };
        Self { status }
    }

    pub fn label(&self) -> &str {
        self.status.as_ref().map_or("All", InvoiceStatus::label)
    }
}

pub fn invoices_query(filter: InvoiceFilter, page_size: usize) -> ListQuery<Invoice> {
    let status = filter
        .status
        .map_or(Value::Null, |s| Value::String(s.as_str().to_string()));
    ListQuery::new(FINANCE_INVOICES, FINANCE_INVOICES_QUERY, "financeInvoices")
        .with_variable("status", status)
        .with_page_size(page_size)
}

/// Display columns for one invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub status: String,
    pub invoice_number: String,
    pub relation: String,
    pub summary: String,
    pub date_sent: String,
    pub date_due: String,
    pub total: String,
    pub balance: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(invoice: &Invoice) -> Self {
        Self {
            status: invoice.status.label().to_string(),
            invoice_number: invoice.invoice_number.clone(),
            relation: invoice.relation().to_string(),
            summary: truncate(&invoice.summary, SUMMARY_WIDTH),
            date_sent: invoice.date_sent.format("%Y-%m-%d").to_string(),
            date_due: invoice.date_due.format("%Y-%m-%d").to_string(),
            total: invoice.total_display.clone(),
            balance: invoice.balance_display.clone(),
        }
    }
}

pub fn delete_request(invoice_id: &str) -> GraphQLRequest {
    let mut input = Map::new();
    input.insert("id".to_string(), Value::String(invoice_id.to_string()));
    GraphQLRequest::new(DELETE_FINANCE_INVOICE, DELETE_FINANCE_INVOICE_MUTATION).with_input(input)
}

/// Delete one invoice; the server answers `{ ok }`
pub async fn delete_invoice(api: &dyn GraphQLApi, invoice_id: &str) -> Result<(), ApiError> {
    info!("Deleting invoice {}", invoice_id);
    let payload = mutate(api, &delete_request(invoice_id), "deleteFinanceInvoice").await?;
    if payload.get("ok").and_then(Value::as_bool) == Some(true) {
        Ok(())
    } else {
        Err(ApiError::MissingData("deleteFinanceInvoice.ok".to_string()))
    }
}

/// Write one CSV record per invoice, with a header row
pub fn write_csv<'a, W: Write>(writer: W, invoices: impl IntoIterator<Item = &'a Invoice>) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut count = 0;
    for invoice in invoices {
        let row = CsvRecord {
            id: &invoice.id,
            invoice_number: &invoice.invoice_number,
            status: invoice.status.as_str(),
            relation: invoice.relation(),
            summary: &invoice.summary,
            date_sent: invoice.date_sent.format("%Y-%m-%d").to_string(),
            date_due: invoice.date_due.format("%Y-%m-%d").to_string(),
            total: &invoice.total_display,
            balance: &invoice.balance_display,
        };
        csv_writer.serialize(row).context("Failed to write invoice row")?;
        count += 1;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(count)
}

#[derive(Serialize)]
struct CsvRecord<'a> {
    id: &'a str,
    invoice_number: &'a str,
    status: &'a str,
    relation: &'a str,
    summary: &'a str,
    date_sent: String,
    date_due: String,
    total: &'a str,
    balance: &'a str,
}

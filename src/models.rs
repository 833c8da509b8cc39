use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::paging::Keyed;

/// Minimal account reference embedded in other records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
}

/// Minimal reference to a named organization record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Cancelled,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Cancelled,
        InvoiceStatus::Overdue,
    ];

    /// Value sent as the `status` filter variable
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Cancelled => "CANCELLED",
            InvoiceStatus::Overdue => "OVERDUE",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub account: Option<AccountRef>,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub relation_company: String,
    #[serde(default)]
    pub relation_contact_name: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub summary: String,
    pub date_sent: NaiveDate,
    pub date_due: NaiveDate,
    #[serde(default)]
    pub total_display: String,
    #[serde(default)]
    pub balance_display: String,
}

impl Invoice {
    /// Company name when set, otherwise the contact name
    pub fn relation(&self) -> &str {
        if self.relation_company.is_empty() {
            &self.relation_contact_name
        } else {
            &self.relation_company
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItemTeacher {
    pub id: String,
    pub account: AccountRef,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub account2: Option<AccountRef>,
    #[serde(default)]
    pub role2: Option<String>,
    pub date_start: NaiveDate,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classpass {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_display: String,
    #[serde(default)]
    pub validity: i64,
    #[serde(default)]
    pub validity_unit_display: String,
    #[serde(default)]
    pub classes: Option<i64>,
    #[serde(default)]
    pub unlimited: bool,
}

impl Classpass {
    pub fn classes_display(&self) -> String {
        match (self.unlimited, self.classes) {
            (true, _) => "Unlimited".to_string(),
            (false, Some(n)) => format!("{} classes", n),
            (false, None) => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBatchCategory {
    pub id: String,
    pub name: String,
    pub batch_category_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSubscription {
    pub id: String,
    #[serde(default)]
    pub account: Option<AccountRef>,
    pub organization_subscription: NamedRef,
    #[serde(default)]
    pub finance_payment_method: Option<NamedRef>,
    pub date_start: NaiveDate,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub registration_fee_paid: bool,
}

impl Keyed for Invoice {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ScheduleItemTeacher {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Classpass {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_deserialization() {
        let json = r#"{
            "id": "RmluYW5jZUludm9pY2VOb2RlOjE=",
            "account": { "id": "QWNjb3VudE5vZGU6MQ==", "fullName": "Jane Doe" },
            "invoiceNumber": "INV20240001",
            "relationCompany": "",
            "relationContactName": "Jane Doe",
            "status": "SENT",
            "summary": "Monthly subscription",
            "dateSent": "2024-01-01",
            "dateDue": "2024-01-15",
            "totalDisplay": "€ 50.00",
            "balanceDisplay": "€ 50.00"
        }"#;

        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.relation(), "Jane Doe");
        assert_eq!(invoice.date_due, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(invoice.key(), "RmluYW5jZUludm9pY2VOb2RlOjE=");
    }

    #[test]
    fn test_invoice_relation_prefers_company() {
        let invoice = Invoice {
            id: "1".to_string(),
            account: None,
            invoice_number: "INV1".to_string(),
            relation_company: "Acme".to_string(),
            relation_contact_name: "John".to_string(),
            status: InvoiceStatus::Draft,
            summary: String::new(),
            date_sent: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_due: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            total_display: String::new(),
            balance_display: String::new(),
        };
        assert_eq!(invoice.relation(), "Acme");
    }

    #[test]
    fn test_invoice_status_parse() {
        assert_eq!(InvoiceStatus::parse("paid"), Some(InvoiceStatus::Paid));
        assert_eq!(InvoiceStatus::parse("OVERDUE"), Some(InvoiceStatus::Overdue));
        assert_eq!(InvoiceStatus::parse("refunded"), None);
    }

    #[test]
    fn test_classpass_classes_display() {
        let mut pass = Classpass {
            id: "1".to_string(),
            name: "10 class card".to_string(),
            description: String::new(),
            price_display: "€ 100.00".to_string(),
            validity: 3,
            validity_unit_display: "Months".to_string(),
            classes: Some(10),
            unlimited: false,
        };
        assert_eq!(pass.classes_display(), "10 classes");
        pass.unlimited = true;
        assert_eq!(pass.classes_display(), "Unlimited");
    }
}

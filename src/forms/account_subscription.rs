//! Edit a subscription held by an account

use serde_json::{Map, Value};

use crate::forms::fields::{format_bool, format_date, FieldKind, FieldSpec, FormValues};
use crate::forms::submission::{Operation, RecordForm};
use crate::forms::{decode_record, with_id};
use crate::graphql::queries::{
    ACCOUNT_SUBSCRIPTION, ACCOUNT_SUBSCRIPTION_QUERY, UPDATE_ACCOUNT_SUBSCRIPTION,
    UPDATE_ACCOUNT_SUBSCRIPTION_MUTATION,
};
use crate::graphql::{ApiError, GraphQLRequest};
use crate::models::AccountSubscription;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("organizationSubscription", "Subscription", FieldKind::Reference).required(),
    FieldSpec::new("financePaymentMethod", "Payment method", FieldKind::Reference),
    FieldSpec::new("dateStart", "Start date", FieldKind::Date).required(),
    FieldSpec::new("dateEnd", "End date", FieldKind::Date),
    FieldSpec::new("note", "Note", FieldKind::TextArea),
    FieldSpec::new("registrationFeePaid", "Registration fee paid", FieldKind::Bool),
];

pub fn account_subscriptions_path(account_id: &str) -> String {
    format!("/relations/accounts/{}/subscriptions", account_id)
}

#[derive(Debug, Clone)]
pub struct EditAccountSubscriptionForm {
    account_id: String,
    id: String,
}

impl EditAccountSubscriptionForm {
    pub fn new(account_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            id: id.into(),
        }
    }
}

impl RecordForm for EditAccountSubscriptionForm {
    fn title(&self) -> String {
        "Edit subscription".to_string()
    }

    fn fields(&self) -> &[FieldSpec] {
        FIELDS
    }

    fn record_query(&self) -> Option<Operation> {
        Some(Operation::new(
            GraphQLRequest::new(ACCOUNT_SUBSCRIPTION, ACCOUNT_SUBSCRIPTION_QUERY).with_variable("id", self.id.as_str()),
            "accountSubscription",
        ))
    }

    fn initial_values(&self, record: Option<&Value>) -> Result<FormValues, ApiError> {
        let subscription: AccountSubscription = decode_record(record, "accountSubscription")?;
        let payment_method = subscription
            .finance_payment_method
            .map(|method| method.id)
            .unwrap_or_default();

        Ok(FormValues::new()
            .with("organizationSubscription", subscription.organization_subscription.id)
            .with("financePaymentMethod", payment_method)
            .with("dateStart", format_date(Some(subscription.date_start)))
            .with("dateEnd", format_date(subscription.date_end))
            .with("note", subscription.note.unwrap_or_default())
            .with("registrationFeePaid", format_bool(subscription.registration_fee_paid)))
    }

    fn mutation(&self, input: Map<String, Value>) -> Operation {
        Operation::new(
            GraphQLRequest::new(UPDATE_ACCOUNT_SUBSCRIPTION, UPDATE_ACCOUNT_SUBSCRIPTION_MUTATION)
                .with_input(with_id(input, &self.id)),
            "updateAccountSubscription",
        )
    }

    fn success_message(&self) -> &str {
        "Subscription saved"
    }

    fn return_path(&self) -> Option<String> {
        Some(account_subscriptions_path(&self.account_id))
    }
}

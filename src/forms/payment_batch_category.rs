//! Edit a finance payment batch category

use serde_json::{Map, Value};

use crate::forms::fields::{FieldKind, FieldSpec, FormValues};
use crate::forms::submission::{Operation, RecordForm};
use crate::forms::{decode_record, with_id};
use crate::graphql::queries::{
    FINANCE_PAYMENT_BATCH_CATEGORY, FINANCE_PAYMENT_BATCH_CATEGORY_QUERY, UPDATE_FINANCE_PAYMENT_BATCH_CATEGORY,
    UPDATE_FINANCE_PAYMENT_BATCH_CATEGORY_MUTATION,
};
use crate::graphql::{ApiError, GraphQLRequest};
use crate::models::PaymentBatchCategory;

pub const BATCH_CATEGORY_TYPES: &[&str] = &["CREDIT", "DEBIT"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", FieldKind::Text).required(),
    FieldSpec::new("batchCategoryType", "Type", FieldKind::Choice(BATCH_CATEGORY_TYPES)).required(),
    FieldSpec::new("description", "Description", FieldKind::TextArea),
];

/// Saving keeps the user on this form
#[derive(Debug, Clone)]
pub struct EditPaymentBatchCategoryForm {
    id: String,
}

impl EditPaymentBatchCategoryForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl RecordForm for EditPaymentBatchCategoryForm {
    fn title(&self) -> String {
        "Edit payment batch category".to_string()
    }

    fn fields(&self) -> &[FieldSpec] {
        FIELDS
    }

    fn record_query(&self) -> Option<Operation> {
        Some(Operation::new(
            GraphQLRequest::new(FINANCE_PAYMENT_BATCH_CATEGORY, FINANCE_PAYMENT_BATCH_CATEGORY_QUERY)
                .with_variable("id", self.id.as_str()),
            "financePaymentBatchCategory",
        ))
    }

    fn initial_values(&self, record: Option<&Value>) -> Result<FormValues, ApiError> {
        let category: PaymentBatchCategory = decode_record(record, "financePaymentBatchCategory")?;
        Ok(FormValues::new()
            .with("name", category.name)
            .with("batchCategoryType", category.batch_category_type)
            .with("description", category.description.unwrap_or_default()))
    }

    fn mutation(&self, input: Map<String, Value>) -> Operation {
        Operation::new(
            GraphQLRequest::new(
                UPDATE_FINANCE_PAYMENT_BATCH_CATEGORY,
                UPDATE_FINANCE_PAYMENT_BATCH_CATEGORY_MUTATION,
            )
            .with_input(with_id(input, &self.id)),
            "updateFinancePaymentBatchCategory",
        )
    }

    fn success_message(&self) -> &str {
        "Payment batch category saved"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::submission::{open_form, submit};
    use crate::testing::{FakeApi, RecordingNavigator, RecordingNotifier};
    use serde_json::json;

    fn record() -> Value {
        json!({
            "id": "UEJDOjE=",
            "name": "Rent",
            "batchCategoryType": "DEBIT",
            "description": null,
            "archived": false
        })
    }

    #[tokio::test]
    async fn test_open_prefills_from_record() {
        let api = FakeApi::new();
        api.push_data("financePaymentBatchCategory", record());

        let values = open_form(&api, &EditPaymentBatchCategoryForm::new("UEJDOjE="))
            .await
            .unwrap();
        assert_eq!(values.get("name"), "Rent");
        assert_eq!(values.get("batchCategoryType"), "DEBIT");
        assert_eq!(values.get("description"), "");
        assert_eq!(api.requests()[0].variable("id"), Some(&json!("UEJDOjE=")));
    }

    #[test]
    fn test_missing_record_is_an_error() {
        let form = EditPaymentBatchCategoryForm::new("UEJDOjE=");
        assert!(matches!(form.initial_values(None), Err(ApiError::MissingData(_))));
    }

    #[tokio::test]
    async fn test_save_uses_batch_category_mutation_and_stays() {
        let api = FakeApi::new();
        api.push_data(
            "updateFinancePaymentBatchCategory",
            json!({ "financePaymentBatchCategory": { "id": "UEJDOjE=" } }),
        );
        let mut notifier = RecordingNotifier::default();
        let mut navigator = RecordingNavigator::default();

        let form = EditPaymentBatchCategoryForm::new("UEJDOjE=");
        let values = form
            .initial_values(Some(&record()))
            .unwrap()
            .with("batchCategoryType", "credit");
        submit(&api, &form, &values, &mut notifier, &mut navigator)
            .await
            .unwrap();

        let request = &api.requests()[0];
        assert_eq!(request.operation_name, UPDATE_FINANCE_PAYMENT_BATCH_CATEGORY);
        assert_eq!(
            request.variable("input"),
            Some(&json!({
                "id": "UEJDOjE=",
                "name": "Rent",
                "batchCategoryType": "CREDIT",
                "description": ""
            }))
        );
        assert_eq!(notifier.successes.len(), 1);
        assert!(navigator.paths.is_empty());
    }
}

//! Record create/edit forms and their submission pipeline

pub mod account_subscription;
pub mod class_teacher;
pub mod fields;
pub mod location;
pub mod payment_batch_category;
pub mod submission;
pub mod subscription_group;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::graphql::ApiError;

pub use account_subscription::EditAccountSubscriptionForm;
pub use class_teacher::ClassTeacherForm;
pub use fields::{FieldErrors, FieldKind, FieldSpec, FormValues};
pub use location::AddLocationForm;
pub use payment_batch_category::EditPaymentBatchCategoryForm;
pub use submission::{
    load_record, open_form, submit, Navigator, Notifier, Operation, RecordForm, SubmissionError, Submitted,
    Submitter,
};
pub use subscription_group::EditSubscriptionGroupForm;

/// Decode the loaded record an edit form starts from
pub(crate) fn decode_record<T: DeserializeOwned>(record: Option<&Value>, field: &str) -> Result<T, ApiError> {
    let record = record.ok_or_else(|| ApiError::MissingData(field.to_string()))?;
    Ok(serde_json::from_value(record.clone())?)
}

/// Add the edited record's id to a validated input object
pub(crate) fn with_id(mut input: Map<String, Value>, id: &str) -> Map<String, Value> {
    input.insert("id".to_string(), Value::String(id.to_string()));
    input
}

/// One empty value per field
pub fn blank_values(fields: &[FieldSpec]) -> FormValues {
    fields.iter().map(|field| (field.name, "")).collect()
}

//! Edit an organization subscription group

use serde_json::{Map, Value};

use crate::forms::fields::{FieldKind, FieldSpec, FormValues};
use crate::forms::submission::{Operation, RecordForm};
use crate::forms::{decode_record, with_id};
use crate::graphql::queries::{
    ORGANIZATION_SUBSCRIPTION_GROUP, ORGANIZATION_SUBSCRIPTION_GROUP_QUERY, UPDATE_ORGANIZATION_SUBSCRIPTION_GROUP,
    UPDATE_ORGANIZATION_SUBSCRIPTION_GROUP_MUTATION,
};
use crate::graphql::{ApiError, GraphQLRequest};
use crate::models::SubscriptionGroup;

pub const SUBSCRIPTION_GROUPS_PATH: &str = "/organization/subscriptions/groups";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", FieldKind::Text).required(),
    FieldSpec::new("description", "Description", FieldKind::TextArea),
];

#[derive(Debug, Clone)]
pub struct EditSubscriptionGroupForm {
    id: String,
}

impl EditSubscriptionGroupForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl RecordForm for EditSubscriptionGroupForm {
    fn title(&self) -> String {
        "Edit subscription group".to_string()
    }

    fn fields(&self) -> &[FieldSpec] {
        FIELDS
    }

    fn record_query(&self) -> Option<Operation> {
        Some(Operation::new(
            GraphQLRequest::new(ORGANIZATION_SUBSCRIPTION_GROUP, ORGANIZATION_SUBSCRIPTION_GROUP_QUERY)
                .with_variable("id", self.id.as_str()),
            "organizationSubscriptionGroup",
        ))
    }

    fn initial_values(&self, record: Option<&Value>) -> Result<FormValues, ApiError> {
        let group: SubscriptionGroup = decode_record(record, "organizationSubscriptionGroup")?;
        Ok(FormValues::new()
            .with("name", group.name)
            .with("description", group.description.unwrap_or_default()))
    }

    fn mutation(&self, input: Map<String, Value>) -> Operation {
        Operation::new(
            GraphQLRequest::new(
                UPDATE_ORGANIZATION_SUBSCRIPTION_GROUP,
                UPDATE_ORGANIZATION_SUBSCRIPTION_GROUP_MUTATION,
            )
            .with_input(with_id(input, &self.id)),
            "updateOrganizationSubscriptionGroup",
        )
    }

    fn success_message(&self) -> &str {
        "Subscription group saved"
    }

    fn return_path(&self) -> Option<String> {
        Some(SUBSCRIPTION_GROUPS_PATH.to_string())
    }
}

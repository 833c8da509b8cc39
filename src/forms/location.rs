//! Add a school location

use serde_json::{Map, Value};

use crate::forms::fields::{FieldKind, FieldSpec, FormValues};
use crate::forms::submission::{Operation, RecordForm};
use crate::graphql::queries::{CREATE_SCHOOL_LOCATION, CREATE_SCHOOL_LOCATION_MUTATION};
use crate::graphql::{ApiError, GraphQLRequest};

pub const LOCATIONS_PATH: &str = "/school/locations";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", FieldKind::Text).required().min_length(3),
    FieldSpec::new("displayPublic", "Public", FieldKind::Bool),
];

#[derive(Debug, Clone, Default)]
pub struct AddLocationForm;

impl RecordForm for AddLocationForm {
    fn title(&self) -> String {
        "Add location".to_string()
    }

    fn fields(&self) -> &[FieldSpec] {
        FIELDS
    }

    fn initial_values(&self, _record: Option<&Value>) -> Result<FormValues, ApiError> {
        Ok(FormValues::new().with("name", "").with("displayPublic", "yes"))
    }

    // This mutation takes its arguments as top-level variables, not `$input`.
    fn mutation(&self, input: Map<String, Value>) -> Operation {
        Operation::new(
            GraphQLRequest::new(CREATE_SCHOOL_LOCATION, CREATE_SCHOOL_LOCATION_MUTATION).with_variables(input),
            "createSchoolLocation",
        )
    }

    fn success_message(&self) -> &str {
        "Location added"
    }

    fn return_path(&self) -> Option<String> {
        Some(LOCATIONS_PATH.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::submission::{submit, SubmissionError};
    use crate::testing::{FakeApi, RecordingNavigator, RecordingNotifier};
    use serde_json::json;

    #[test]
    fn test_defaults_to_public() {
        let values = AddLocationForm.initial_values(None).unwrap();
        assert_eq!(values.get("displayPublic"), "yes");
        assert_eq!(values.get("name"), "");
    }

    #[tokio::test]
    async fn test_short_name_is_rejected() {
        let api = FakeApi::new();
        let mut notifier = RecordingNotifier::default();
        let mut navigator = RecordingNavigator::default();

        let values = AddLocationForm.initial_values(None).unwrap().with("name", "HQ");
        let result = submit(&api, &AddLocationForm, &values, &mut notifier, &mut navigator).await;

        match result {
            Err(SubmissionError::Invalid(errors)) => {
                assert_eq!(errors.get("name"), Some("Minimum length is 3 characters"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_returns_to_location_list() {
        let api = FakeApi::new();
        api.push_data(
            "createSchoolLocation",
            json!({ "id": "TDox", "name": "Main studio", "displayPublic": true }),
        );
        let mut notifier = RecordingNotifier::default();
        let mut navigator = RecordingNavigator::default();

        let values = AddLocationForm.initial_values(None).unwrap().with("name", "Main studio");
        submit(&api, &AddLocationForm, &values, &mut notifier, &mut navigator)
            .await
            .unwrap();

        let request = &api.requests()[0];
        assert_eq!(request.operation_name, CREATE_SCHOOL_LOCATION);
        assert_eq!(request.variable("name"), Some(&json!("Main studio")));
        assert_eq!(request.variable("displayPublic"), Some(&json!(true)));
        assert_eq!(notifier.successes, vec!["Location added".to_string()]);
        assert_eq!(navigator.paths, vec![LOCATIONS_PATH.to_string()]);
    }
}

//! GraphQL client seam and its HTTP implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::graphql::{ApiError, Connection, GraphQLErrorMessage};

/// A single query or mutation with its variables
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub operation_name: String,
    pub query: String,
    pub variables: Map<String, Value>,
}

impl GraphQLRequest {
    pub fn new(operation_name: &str, query: &str) -> Self {
        Self {
            operation_name: operation_name.to_string(),
            query: query.to_string(),
            variables: Map::new(),
        }
    }

    pub fn with_variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Mutation taking a single `$input` object, the shape most update mutations use
    pub fn with_input(self, input: Map<String, Value>) -> Self {
        self.with_variable("input", Value::Object(input))
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Executes GraphQL operations against the backend.
///
/// Implementations return the `data` object of a successful response; any
/// transport failure, non-2xx status or non-empty `errors` array is an error.
#[async_trait]
pub trait GraphQLApi: Send + Sync {
    async fn execute(&self, request: &GraphQLRequest) -> Result<Value, ApiError>;
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQLErrorMessage>,
}

/// reqwest-backed GraphQL client
pub struct HttpGraphQLClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpGraphQLClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_url.clone(),
            token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphQLApi for HttpGraphQLClient {
    async fn execute(&self, request: &GraphQLRequest) -> Result<Value, ApiError> {
        debug!("Executing {} against {}", request.operation_name, self.endpoint);

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(token) = &self.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("JWT {}", token));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("{} failed with status {}", request.operation_name, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }
}

/// Turn a raw response body into its `data` object
pub fn parse_response(body: &str) -> Result<Value, ApiError> {
    let response: GraphQLResponse = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        return Err(ApiError::GraphQL(response.errors));
    }

    match response.data {
        Some(Value::Null) | None => Err(ApiError::MissingData("data".to_string())),
        Some(data) => Ok(data),
    }
}

/// Pull a non-null root field out of a `data` object
pub fn root_field(data: Value, field: &str) -> Result<Value, ApiError> {
    match data {
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Null) | None => Err(ApiError::MissingData(field.to_string())),
            Some(value) => Ok(value),
        },
        _ => Err(ApiError::MissingData(field.to_string())),
    }
}

/// Run a list query and decode the connection under `field`
pub async fn query_connection<T: DeserializeOwned>(
    api: &dyn GraphQLApi,
    request: &GraphQLRequest,
    field: &str,
) -> Result<Connection<T>, ApiError> {
    let data = api.execute(request).await?;
    let connection = root_field(data, field)?;
    Ok(serde_json::from_value(connection)?)
}

/// Run a single-record query and decode the node under `field`
pub async fn query_node<T: DeserializeOwned>(
    api: &dyn GraphQLApi,
    request: &GraphQLRequest,
    field: &str,
) -> Result<T, ApiError> {
    let data = api.execute(request).await?;
    let node = root_field(data, field)?;
    Ok(serde_json::from_value(node)?)
}

/// Run a mutation and return the payload under `field`
pub async fn mutate(
    api: &dyn GraphQLApi,
    request: &GraphQLRequest,
    field: &str,
) -> Result<Value, ApiError> {
    let data = api.execute(request).await?;
    root_field(data, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_operation_name_in_camel_case() {
        let request = GraphQLRequest::new("Invoices", "query Invoices { x }")
            .with_variable("first", 15);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["operationName"], "Invoices");
        assert_eq!(body["variables"]["first"], 15);
    }

    #[test]
    fn test_parse_response_returns_data() {
        let data = parse_response(r#"{"data": {"organizationClasspasses": {"edges": []}}}"#).unwrap();
        assert_eq!(data, json!({"organizationClasspasses": {"edges": []}}));
    }

    #[test]
    fn test_parse_response_surfaces_graphql_errors() {
        let body = r#"{"errors": [{"message": "User not logged in"}], "data": null}"#;
        match parse_response(body) {
            Err(ApiError::GraphQL(errors)) => assert_eq!(errors[0].message, "User not logged in"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_response_rejects_null_data() {
        assert!(matches!(
            parse_response(r#"{"data": null}"#),
            Err(ApiError::MissingData(_))
        ));
    }

    #[test]
    fn test_root_field_rejects_null_node() {
        let data = json!({"organizationSubscriptionGroup": null});
        assert!(matches!(
            root_field(data, "organizationSubscriptionGroup"),
            Err(ApiError::MissingData(field)) if field == "organizationSubscriptionGroup"
        ));
    }
}

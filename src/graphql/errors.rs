//! GraphQL transport error types

use serde::Deserialize;
use thiserror::Error;

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQLErrorMessage {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{}", join_messages(.0))]
    GraphQL(Vec<GraphQLErrorMessage>),

    #[error("Response is missing field '{0}'")]
    MissingData(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the server rejected the request (as opposed to a transport failure)
    pub fn is_server_rejection(&self) -> bool {
        matches!(self, ApiError::GraphQL(_) | ApiError::Status { .. })
    }
}

fn join_messages(errors: &[GraphQLErrorMessage]) -> String {
    if errors.is_empty() {
        return "GraphQL error".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_display_joins_messages() {
        let err = ApiError::GraphQL(vec![
            GraphQLErrorMessage { message: "Permission denied".to_string(), path: None },
            GraphQLErrorMessage { message: "Invalid id".to_string(), path: None },
        ]);
        assert_eq!(err.to_string(), "Permission denied; Invalid id");
        assert!(err.is_server_rejection());
    }

    #[test]
    fn test_missing_data_is_not_a_rejection() {
        let err = ApiError::MissingData("financeInvoices".to_string());
        assert_eq!(err.to_string(), "Response is missing field 'financeInvoices'");
        assert!(!err.is_server_rejection());
    }
}

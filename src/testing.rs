//! In-memory GraphQL backend for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::forms::{Navigator, Notifier};
use crate::graphql::{ApiError, GraphQLApi, GraphQLErrorMessage, GraphQLRequest, PageInfo};

/// Replays queued responses in order and records every request
#[derive(Default)]
pub struct FakeApi {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    requests: Mutex<Vec<GraphQLRequest>>,
    gate: Option<Arc<Notify>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// An API whose calls block until the returned `Notify` fires
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let api = Self {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        };
        (api, gate)
    }

    pub fn push_data(&self, field: &str, value: Value) {
        let mut data = serde_json::Map::new();
        data.insert(field.to_string(), value);
        self.responses.lock().unwrap().push_back(Ok(Value::Object(data)));
    }

    pub fn push_graphql_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::GraphQL(vec![GraphQLErrorMessage {
                message: message.to_string(),
                path: None,
            }])));
    }

    pub fn requests(&self) -> Vec<GraphQLRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GraphQLApi for FakeApi {
    async fn execute(&self, request: &GraphQLRequest) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::MissingData("no queued response".to_string())))
    }
}

/// Connection JSON with one `{ id }` node per entry
pub fn connection_json(ids: &[&str], page_info: PageInfo) -> Value {
    let edges: Vec<Value> = ids.iter().map(|id| json!({ "node": { "id": id } })).collect();
    json!({
        "pageInfo": serde_json::to_value(page_info).unwrap(),
        "edges": edges,
    })
}

/// Notifier that records every message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub successes: Vec<String>,
    pub failures: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify_success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn notify_failure(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}

/// Navigator that records every path
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub paths: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, path: &str) {
        self.paths.push(path.to_string());
    }
}

//! Record edit pipeline: load, derive initial values, validate and submit

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::forms::fields::{validate, FieldErrors, FieldSpec, FormValues};
use crate::graphql::client::{mutate, query_node};
use crate::graphql::{ApiError, GraphQLApi, GraphQLRequest};

/// Surfaces the outcome of a submission to the user
pub trait Notifier {
    fn notify_success(&mut self, message: &str);
    fn notify_failure(&mut self, message: &str);
}

/// Moves the user to another screen by path
pub trait Navigator {
    fn navigate_to(&mut self, path: &str);
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Validation failed: {0}")]
    Invalid(FieldErrors),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Server error: {0}")]
    Server(ApiError),

    #[error("Submission was cancelled")]
    Cancelled,
}

/// A request paired with the root field its result lives under
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub request: GraphQLRequest,
    pub field: &'static str,
}

impl Operation {
    pub fn new(request: GraphQLRequest, field: &'static str) -> Self {
        Self { request, field }
    }
}

/// One create or edit screen for a single record type
pub trait RecordForm: Send + Sync {
    fn title(&self) -> String;

    fn fields(&self) -> &[FieldSpec];

    /// Query for the record being edited; creation forms have none
    fn record_query(&self) -> Option<Operation> {
        None
    }

    /// Values shown when the form opens
    fn initial_values(&self, record: Option<&Value>) -> Result<FormValues, ApiError>;

    /// Mutation carrying the validated input
    fn mutation(&self, input: Map<String, Value>) -> Operation;

    fn success_message(&self) -> &str;

    /// Where to go after a successful save; `None` keeps the user on the form
    fn return_path(&self) -> Option<String> {
        None
    }

    /// List queries made stale by a successful save
    fn refetch_queries(&self) -> &[&'static str] {
        &[]
    }
}

/// A validated mutation ready to send, with everything needed to report it
#[derive(Debug, Clone)]
pub struct PreparedMutation {
    pub operation: Operation,
    pub success_message: String,
    pub return_path: Option<String>,
    pub refetch_queries: Vec<String>,
}

/// Successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub payload: Value,
    pub refetch_queries: Vec<String>,
}

/// Fetch the record an edit form starts from
pub async fn load_record(api: &dyn GraphQLApi, form: &dyn RecordForm) -> Result<Option<Value>, ApiError> {
    let Some(query) = form.record_query() else {
        return Ok(None);
    };
    debug!("Loading record via {}", query.request.operation_name);
    query_node::<Value>(api, &query.request, query.field).await.map(Some)
}

/// Load the record (if any) and derive the form's starting values
pub async fn open_form(api: &dyn GraphQLApi, form: &dyn RecordForm) -> Result<FormValues, ApiError> {
    let record = load_record(api, form).await?;
    form.initial_values(record.as_ref())
}

/// Validate values and build the mutation without touching the network
pub fn prepare(form: &dyn RecordForm, values: &FormValues) -> Result<PreparedMutation, FieldErrors> {
    let input = validate(form.fields(), values)?;
    Ok(PreparedMutation {
        operation: form.mutation(input),
        success_message: form.success_message().to_string(),
        return_path: form.return_path(),
        refetch_queries: form.refetch_queries().iter().map(|q| q.to_string()).collect(),
    })
}

/// Send the single mutation of a prepared submission
pub async fn send(api: &dyn GraphQLApi, prepared: &PreparedMutation) -> Result<Value, ApiError> {
    info!("Submitting {}", prepared.operation.request.operation_name);
    mutate(api, &prepared.operation.request, prepared.operation.field).await
}

/// Notify and navigate according to the mutation result
pub fn report(
    prepared: &PreparedMutation,
    result: Result<Value, ApiError>,
    notifier: &mut dyn Notifier,
    navigator: &mut dyn Navigator,
) -> Result<Submitted, SubmissionError> {
    match result {
        Ok(payload) => {
            notifier.notify_success(&prepared.success_message);
            if let Some(path) = &prepared.return_path {
                navigator.navigate_to(path);
            }
            Ok(Submitted {
                payload,
                refetch_queries: prepared.refetch_queries.clone(),
            })
        }
        Err(e) => {
            if e.is_server_rejection() {
                warn!("{} rejected: {}", prepared.operation.request.operation_name, e);
            } else {
                error!("{} failed: {}", prepared.operation.request.operation_name, e);
            }
            notifier.notify_failure(&format!("Server error: {}", e));
            Err(SubmissionError::Server(e))
        }
    }
}

/// Validate, send one mutation, then notify and navigate
pub async fn submit(
    api: &dyn GraphQLApi,
    form: &dyn RecordForm,
    values: &FormValues,
    notifier: &mut dyn Notifier,
    navigator: &mut dyn Navigator,
) -> Result<Submitted, SubmissionError> {
    let prepared = prepare(form, values).map_err(SubmissionError::Invalid)?;
    let result = send(api, &prepared).await;
    report(&prepared, result, notifier, navigator)
}

struct PendingSubmission {
    prepared: PreparedMutation,
    receiver: oneshot::Receiver<Result<Value, ApiError>>,
    handle: JoinHandle<()>,
}

/// Runs submissions in the background, one at a time
pub struct Submitter {
    api: Arc<dyn GraphQLApi>,
    pending: Option<PendingSubmission>,
}

impl Submitter {
    pub fn new(api: Arc<dyn GraphQLApi>) -> Self {
        Self { api, pending: None }
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate and start sending. A second call while one is outstanding is refused.
    pub fn begin(&mut self, form: &dyn RecordForm, values: &FormValues) -> Result<(), SubmissionError> {
        if self.pending.is_some() {
            return Err(SubmissionError::InFlight);
        }
        let prepared = prepare(form, values).map_err(SubmissionError::Invalid)?;

        let api = Arc::clone(&self.api);
        let task_prepared = prepared.clone();
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = send(api.as_ref(), &task_prepared).await;
            tx.send(result).ok();
        });

        self.pending = Some(PendingSubmission {
            prepared,
            receiver: rx,
            handle,
        });
        Ok(())
    }

    /// Report a finished submission, if there is one
    pub fn poll(
        &mut self,
        notifier: &mut dyn Notifier,
        navigator: &mut dyn Navigator,
    ) -> Option<Result<Submitted, SubmissionError>> {
        let pending = self.pending.as_mut()?;
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                return Some(Err(SubmissionError::Cancelled));
            }
        };
        let pending = self.pending.take()?;
        Some(report(&pending.prepared, result, notifier, navigator))
    }

    /// Wait for the outstanding submission and report it
    pub async fn settle(
        &mut self,
        notifier: &mut dyn Notifier,
        navigator: &mut dyn Navigator,
    ) -> Option<Result<Submitted, SubmissionError>> {
        let pending = self.pending.take()?;
        match pending.receiver.await {
            Ok(result) => Some(report(&pending.prepared, result, notifier, navigator)),
            Err(_) => Some(Err(SubmissionError::Cancelled)),
        }
    }

    /// Drop the outstanding submission without reporting it
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}

impl Drop for Submitter {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Paginated list screen controller
//!
//! `ListScreen` owns one accumulator for the lifetime of a mounted screen. It
//! starts fetches on background tasks, applies their results when polled and
//! drops in-flight results when the screen is unmounted.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::graphql::client::query_connection;
use crate::graphql::{ApiError, Connection, GraphQLApi, GraphQLRequest};
use crate::paging::Accumulator;

pub const DEFAULT_PAGE_SIZE: usize = 15;

#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("{0}")]
    Api(Arc<ApiError>),

    #[error("Request was cancelled before completing")]
    Cancelled,
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        FetchError::Api(Arc::new(err))
    }
}

/// Declarative description of a paginated list query
#[derive(Debug, Clone)]
pub struct ListQuery<T> {
    pub operation_name: String,
    pub document: String,
    pub root_field: String,
    pub variables: Map<String, Value>,
    pub page_size: usize,
    _node: PhantomData<fn() -> T>,
}

impl<T> ListQuery<T> {
    pub fn new(operation_name: &str, document: &str, root_field: &str) -> Self {
        Self {
            operation_name: operation_name.to_string(),
            document: document.to_string(),
            root_field: root_field.to_string(),
            variables: Map::new(),
            page_size: DEFAULT_PAGE_SIZE,
            _node: PhantomData,
        }
    }

    pub fn with_variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Request for the page following `after` (or the first page)
    pub fn page_request(&self, after: Option<&str>) -> GraphQLRequest {
        let after = after.map_or(Value::Null, |cursor| Value::String(cursor.to_string()));
        GraphQLRequest::new(&self.operation_name, &self.document)
            .with_variables(self.variables.clone())
            .with_variable("first", self.page_size as u64)
            .with_variable("after", after)
    }
}

/// What the view should render
#[derive(Debug)]
pub enum ListState<T> {
    Unmounted,
    Loading,
    Failed(FetchError),
    Empty,
    Populated(Accumulator<T>),
}

impl<T> ListState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }
}

/// Result of asking for the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Started,
    InFlight,
    Exhausted,
    NotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    First,
    Next,
}

struct PendingFetch<T> {
    kind: FetchKind,
    receiver: oneshot::Receiver<Result<Connection<T>, FetchError>>,
    handle: JoinHandle<()>,
}

pub struct ListScreen<T> {
    api: Arc<dyn GraphQLApi>,
    query: ListQuery<T>,
    state: ListState<T>,
    pending: Option<PendingFetch<T>>,
    last_error: Option<FetchError>,
}

impl<T> ListScreen<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn new(api: Arc<dyn GraphQLApi>, query: ListQuery<T>) -> Self {
        Self {
            api,
            query,
            state: ListState::Unmounted,
            pending: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn query(&self) -> &ListQuery<T> {
        &self.query
    }

    pub fn operation_name(&self) -> &str {
        &self.query.operation_name
    }

    pub fn accumulator(&self) -> Option<&Accumulator<T>> {
        match &self.state {
            ListState::Populated(acc) => Some(acc),
            _ => None,
        }
    }

    /// Error of the most recent failed load-more, if any
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        !matches!(self.state, ListState::Unmounted)
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_load_more(&self) -> bool {
        self.accumulator().map_or(false, Accumulator::can_load_more)
    }

    /// Start the first-page fetch in the background
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }
        debug!("Mounting list {}", self.query.operation_name);
        self.state = ListState::Loading;
        self.spawn_fetch(FetchKind::First, None);
    }

    /// Drop the accumulated list and discard any in-flight result
    pub fn unmount(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
        self.state = ListState::Unmounted;
        self.last_error = None;
    }

    /// Refetch from the first page, discarding the accumulated list
    pub fn refresh(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
        info!("Refreshing list {}", self.query.operation_name);
        self.state = ListState::Loading;
        self.last_error = None;
        self.spawn_fetch(FetchKind::First, None);
    }

    /// Replace the query (e.g. a new filter) and refetch
    pub fn set_query(&mut self, query: ListQuery<T>) {
        self.query = query;
        if self.is_mounted() {
            self.refresh();
        }
    }

    /// Start fetching the page after the current end cursor
    pub fn load_more(&mut self) -> LoadMore {
        if self.pending.is_some() {
            return LoadMore::InFlight;
        }
        let cursor = match &self.state {
            ListState::Populated(acc) if acc.can_load_more() => acc.next_cursor().map(str::to_string),
            ListState::Populated(_) | ListState::Empty => return LoadMore::Exhausted,
            _ => return LoadMore::NotLoaded,
        };
        self.last_error = None;
        self.spawn_fetch(FetchKind::Next, cursor);
        LoadMore::Started
    }

    /// Apply a completed background fetch. Returns true when state changed.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => Err(FetchError::Cancelled),
        };
        let kind = pending.kind;
        self.pending = None;
        self.apply(kind, result);
        true
    }

    /// Wait for the in-flight fetch (if any) and apply it
    pub async fn settle(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let result = pending.receiver.await.unwrap_or(Err(FetchError::Cancelled));
        self.apply(pending.kind, result);
    }

    /// Fetch the first page inline, without a background task
    pub async fn fetch_first(&mut self) -> Result<(), FetchError> {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
        self.state = ListState::Loading;
        self.last_error = None;
        let request = self.query.page_request(None);
        let result = query_connection(self.api.as_ref(), &request, &self.query.root_field)
            .await
            .map_err(FetchError::from);
        self.apply(FetchKind::First, result);
        match &self.state {
            ListState::Failed(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    /// Fetch the next page inline. Returns false when there was nothing to fetch
    /// or the cursor did not move, so callers looping on it always stop.
    pub async fn fetch_next(&mut self) -> Result<bool, FetchError> {
        if self.pending.is_some() {
            return Ok(false);
        }
        let cursor = match &self.state {
            ListState::Populated(acc) if acc.can_load_more() => acc.next_cursor().map(str::to_string),
            _ => return Ok(false),
        };
        self.last_error = None;
        let request = self.query.page_request(cursor.as_deref());
        let result = query_connection(self.api.as_ref(), &request, &self.query.root_field)
            .await
            .map_err(FetchError::from);
        self.apply(FetchKind::Next, result);
        if let Some(e) = &self.last_error {
            return Err(e.clone());
        }

        let next = self.accumulator().and_then(|acc| acc.next_cursor());
        if next == cursor.as_deref() {
            warn!(
                "{}: cursor {:?} did not advance, stopping",
                self.query.operation_name, cursor
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Fetch pages until the collection is exhausted
    pub async fn fetch_all(&mut self) -> Result<(), FetchError> {
        self.fetch_first().await?;
        while self.fetch_next().await? {}
        Ok(())
    }

    fn spawn_fetch(&mut self, kind: FetchKind, after: Option<String>) {
        let api = Arc::clone(&self.api);
        let request = self.query.page_request(after.as_deref());
        let field = self.query.root_field.clone();
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let result = query_connection::<T>(api.as_ref(), &request, &field)
                .await
                .map_err(FetchError::from);
            // The receiver is gone once the screen unmounts; the result is discarded.
            tx.send(result).ok();
        });

        self.pending = Some(PendingFetch {
            kind,
            receiver: rx,
            handle,
        });
    }

    fn apply(&mut self, kind: FetchKind, result: Result<Connection<T>, FetchError>) {
        if !self.is_mounted() {
            return;
        }

        match (kind, result) {
            (FetchKind::First, Ok(page)) => {
                debug!("{}: first page with {} items", self.query.operation_name, page.len());
                self.state = if page.is_empty() {
                    ListState::Empty
                } else {
                    ListState::Populated(Accumulator::initialize(page))
                };
            }
            (FetchKind::First, Err(e)) => {
                warn!("{}: loading failed: {}", self.query.operation_name, e);
                self.state = ListState::Failed(e);
            }
            (FetchKind::Next, Ok(page)) => {
                debug!("{}: next page with {} items", self.query.operation_name, page.len());
                let state = std::mem::replace(&mut self.state, ListState::Loading);
                self.state = match state {
                    ListState::Populated(acc) => ListState::Populated(acc.load_more(page)),
                    other => other,
                };
            }
            (FetchKind::Next, Err(e)) => {
                warn!("{}: loading more failed: {}", self.query.operation_name, e);
                self.last_error = Some(e);
            }
        }
    }
}

impl<T> Drop for ListScreen<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::PageInfo;
    use crate::paging::Keyed;
    use crate::testing::{connection_json, FakeApi};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Row {
        id: String,
    }

    impl Keyed for Row {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn rows_query() -> ListQuery<Row> {
        ListQuery::new("Rows", "query Rows { rows }", "rows")
    }

    fn keys(screen: &ListScreen<Row>) -> Vec<String> {
        screen
            .accumulator()
            .map(|acc| acc.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_page_request_variables() {
        let query = rows_query().with_variable("status", "SENT").with_page_size(20);
        let first = query.page_request(None);
        assert_eq!(first.variable("first"), Some(&Value::from(20u64)));
        assert_eq!(first.variable("after"), Some(&Value::Null));
        assert_eq!(first.variable("status"), Some(&Value::from("SENT")));

        let next = query.page_request(Some("c1"));
        assert_eq!(next.variable("after"), Some(&Value::from("c1")));
    }

    #[tokio::test]
    async fn test_mount_and_load_more() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&["A", "B"], PageInfo::more("c1")));
        api.push_data("rows", connection_json(&["C"], PageInfo::last(Some("c2"))));

        let mut screen = ListScreen::new(api.clone(), rows_query());
        screen.mount();
        assert!(screen.state().is_loading());
        screen.settle().await;
        assert_eq!(keys(&screen), vec!["A", "B"]);
        assert!(screen.can_load_more());

        assert_eq!(screen.load_more(), LoadMore::Started);
        assert_eq!(screen.load_more(), LoadMore::InFlight);
        screen.settle().await;

        assert_eq!(keys(&screen), vec!["A", "B", "C"]);
        assert_eq!(screen.accumulator().unwrap().page_info(), &PageInfo::last(Some("c2")));
        assert!(!screen.can_load_more());
        assert_eq!(screen.load_more(), LoadMore::Exhausted);

        let requests = api.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].variable("after"), Some(&Value::from("c1")));
    }

    #[tokio::test]
    async fn test_empty_first_page_renders_empty_state() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&[], PageInfo::last(None)));

        let mut screen = ListScreen::new(api, rows_query());
        screen.fetch_first().await.unwrap();
        assert!(matches!(screen.state(), ListState::Empty));
        assert_eq!(screen.load_more(), LoadMore::Exhausted);
    }

    #[tokio::test]
    async fn test_failed_first_fetch_renders_error() {
        let api = Arc::new(FakeApi::new());
        api.push_graphql_error("Permission denied");

        let mut screen = ListScreen::new(api, rows_query());
        screen.mount();
        screen.settle().await;
        match screen.state() {
            ListState::Failed(e) => assert_eq!(e.to_string(), "Permission denied"),
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(screen.load_more(), LoadMore::NotLoaded);
    }

    #[tokio::test]
    async fn test_failed_load_more_leaves_state_unchanged() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&["A", "B"], PageInfo::more("c1")));
        api.push_graphql_error("Server exploded");

        let mut screen = ListScreen::new(api, rows_query());
        screen.fetch_first().await.unwrap();
        let before = screen.accumulator().cloned().unwrap();

        assert_eq!(screen.load_more(), LoadMore::Started);
        screen.settle().await;

        assert_eq!(screen.accumulator(), Some(&before));
        assert!(screen.last_error().is_some());
        assert!(screen.can_load_more());
    }

    #[tokio::test]
    async fn test_unmount_discards_in_flight_result() {
        let (api, gate) = FakeApi::gated();
        let api = Arc::new(api);
        api.push_data("rows", connection_json(&["A"], PageInfo::last(None)));

        let mut screen = ListScreen::new(api.clone(), rows_query());
        screen.mount();
        screen.unmount();

        gate.notify_one();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        assert!(!screen.poll());
        assert!(matches!(screen.state(), ListState::Unmounted));
        assert!(screen.accumulator().is_none());
    }

    #[tokio::test]
    async fn test_poll_applies_completed_fetch() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&["A"], PageInfo::last(None)));

        let mut screen = ListScreen::new(api, rows_query());
        screen.mount();

        let mut applied = false;
        for _ in 0..100 {
            if screen.poll() {
                applied = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert!(applied);
        assert_eq!(keys(&screen), vec!["A"]);
        assert!(!screen.is_fetching());
    }

    #[tokio::test]
    async fn test_fetch_all_walks_every_page() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&["A"], PageInfo::more("c1")));
        api.push_data("rows", connection_json(&["B"], PageInfo::more("c2")));
        api.push_data("rows", connection_json(&["C"], PageInfo::last(Some("c3"))));

        let mut screen = ListScreen::new(api.clone(), rows_query());
        screen.fetch_all().await.unwrap();
        assert_eq!(keys(&screen), vec!["A", "B", "C"]);
        assert_eq!(api.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_stops_when_cursor_stalls() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&["A"], PageInfo::more("c1")));
        for _ in 0..10 {
            api.push_data("rows", connection_json(&[], PageInfo::more("c1")));
        }

        let mut screen = ListScreen::new(api.clone(), rows_query());
        screen.fetch_all().await.unwrap();

        assert_eq!(keys(&screen), vec!["A"]);
        assert_eq!(api.requests().len(), 2);
        assert_eq!(api.requests()[1].variable("after"), Some(&Value::from("c1")));
    }

    #[tokio::test]
    async fn test_fetch_next_reports_stalled_page() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&["A"], PageInfo::more("c1")));
        api.push_data("rows", connection_json(&["B"], PageInfo::more("c1")));

        let mut screen = ListScreen::new(api.clone(), rows_query());
        screen.fetch_first().await.unwrap();

        assert!(!screen.fetch_next().await.unwrap());
        assert_eq!(keys(&screen), vec!["A", "B"]);
        assert_eq!(api.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_restarts_from_first_page() {
        let api = Arc::new(FakeApi::new());
        api.push_data("rows", connection_json(&["A"], PageInfo::more("c1")));
        api.push_data("rows", connection_json(&["Z"], PageInfo::last(None)));

        let mut screen = ListScreen::new(api.clone(), rows_query());
        screen.fetch_first().await.unwrap();
        screen.refresh();
        screen.settle().await;

        assert_eq!(keys(&screen), vec!["Z"]);
        assert_eq!(api.requests()[1].variable("after"), Some(&Value::Null));
    }
}

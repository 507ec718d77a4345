//! Tests for GraphExplorer load/search/reset/suggest and observable state

use async_trait::async_trait;
use kmap_client::{ClientError, GraphSource};
use kmap_explorer::{ErrorKind, ExplorerConfig, ExplorerError, ExplorerEvent, GraphExplorer};
use kmap_protocol::RawGraphPayload;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

fn payload(names: &[&str], links: &[(usize, usize)]) -> RawGraphPayload {
    let nodes: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"_id": format!("t/{i}"), "label_en": name, "_key": i.to_string()}))
        .collect();
    let links: Vec<_> = links
        .iter()
        .map(|(from, to)| json!({"_from": format!("t/{from}"), "_to": format!("t/{to}")}))
        .collect();
    serde_json::from_value(json!({"nodes": nodes, "links": links})).unwrap()
}

fn docs(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("doc-{i}")).collect()
}

/// Returns the same payload on every call and counts fetches.
struct StaticSource {
    payload: RawGraphPayload,
    calls: AtomicUsize,
}

impl StaticSource {
    fn new(payload: RawGraphPayload) -> Arc<Self> {
        Arc::new(Self {
            payload,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl GraphSource for StaticSource {
    async fn fetch_graph(
        &self,
        _workspace_id: &str,
        _document_ids: &[String],
    ) -> kmap_client::Result<RawGraphPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

/// Succeeds on the first call, then fails with the given error.
struct FlakySource {
    payload: RawGraphPayload,
    calls: AtomicUsize,
    fail_with: fn() -> ClientError,
}

#[async_trait]
impl GraphSource for FlakySource {
    async fn fetch_graph(
        &self,
        _workspace_id: &str,
        _document_ids: &[String],
    ) -> kmap_client::Result<RawGraphPayload> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(self.payload.clone())
        } else {
            Err((self.fail_with)())
        }
    }
}

/// First call blocks until released, later calls return immediately.
struct GatedSource {
    started: Notify,
    release: Notify,
    calls: AtomicUsize,
    first_fails: bool,
}

impl GatedSource {
    fn new() -> Arc<Self> {
        Self::build(false)
    }

    fn failing() -> Arc<Self> {
        Self::build(true)
    }

    fn build(first_fails: bool) -> Arc<Self> {
        Arc::new(Self {
            started: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
            first_fails,
        })
    }
}

#[async_trait]
impl GraphSource for GatedSource {
    async fn fetch_graph(
        &self,
        _workspace_id: &str,
        _document_ids: &[String],
    ) -> kmap_client::Result<RawGraphPayload> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.started.notify_one();
            self.release.notified().await;
            if self.first_fails {
                return Err(ClientError::FetchFailed("backend returned 502".into()));
            }
            Ok(payload(&["Stale"], &[]))
        } else {
            Ok(payload(&["Fresh"], &[]))
        }
    }
}

fn explorer_with(source: Arc<dyn GraphSource>) -> GraphExplorer {
    let _ = env_logger::builder().is_test(true).try_init();
    GraphExplorer::new(source, ExplorerConfig::default())
}

#[tokio::test]
async fn test_empty_selection_short_circuits() {
    let source = StaticSource::new(payload(&["A"], &[]));
    let explorer = explorer_with(source.clone());

    let applied = explorer.load("ws-1", &[]).await.unwrap();

    assert!(applied);
    assert_eq!(explorer.node_count(), 0);
    assert!(explorer.current_view().is_empty());
    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "no network call");
}

#[tokio::test]
async fn test_load_adopts_full_graph_as_view() {
    let source = StaticSource::new(payload(&["A", "B", "C"], &[(0, 1), (1, 2)]));
    let explorer = explorer_with(source);

    explorer.load("ws-1", &docs(2)).await.unwrap();

    let view = explorer.current_view();
    assert_eq!(view.node_count(), 3);
    assert_eq!(view.edge_count(), 2);
    assert_eq!(explorer.node_count(), 3);
    assert!(!explorer.is_loading());
    assert_eq!(explorer.last_error(), None);
}

#[tokio::test]
async fn test_failed_load_leaves_prior_state_untouched() {
    let source = Arc::new(FlakySource {
        payload: payload(&["A", "B"], &[(0, 1)]),
        calls: AtomicUsize::new(0),
        fail_with: || ClientError::FetchFailed("backend returned 502".into()),
    });
    let explorer = explorer_with(source);

    explorer.load("ws-1", &docs(1)).await.unwrap();
    let before = explorer.current_view();

    let result = explorer.load("ws-1", &docs(2)).await;

    assert!(matches!(result, Err(ExplorerError::FetchFailed(_))));
    assert_eq!(*explorer.current_view(), *before);
    assert_eq!(explorer.last_error(), Some(ErrorKind::FetchFailed));
    assert!(!explorer.is_loading());
}

#[tokio::test]
async fn test_timeout_is_reported_distinctly() {
    let source = Arc::new(FlakySource {
        payload: payload(&["A"], &[]),
        calls: AtomicUsize::new(0),
        fail_with: || ClientError::Timeout,
    });
    let explorer = explorer_with(source);

    explorer.load("ws-1", &docs(1)).await.unwrap();
    let result = explorer.load("ws-1", &docs(1)).await;

    assert!(matches!(result, Err(ExplorerError::Timeout)));
    assert_eq!(explorer.last_error(), Some(ErrorKind::Timeout));
    assert_eq!(explorer.node_count(), 1);
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let source = GatedSource::new();
    let explorer = Arc::new(explorer_with(source.clone()));

    let background = {
        let explorer = Arc::clone(&explorer);
        tokio::spawn(async move { explorer.load("ws-1", &docs(1)).await })
    };
    source.started.notified().await;

    // Second load supersedes the blocked one and completes first.
    let applied = explorer.load("ws-1", &docs(1)).await.unwrap();
    assert!(applied);

    source.release.notify_one();
    let stale_applied = background.await.unwrap().unwrap();

    assert!(!stale_applied);
    let view = explorer.current_view();
    assert_eq!(view.nodes[0].display_name, "Fresh");
}

#[tokio::test]
async fn test_stale_failure_does_not_mask_newer_success() {
    let source = GatedSource::failing();
    let explorer = Arc::new(explorer_with(source.clone()));

    let events: Arc<Mutex<Vec<ExplorerEvent>>> = Arc::default();
    let sink = Arc::clone(&events);
    explorer.subscribe(move |event| sink.lock().unwrap().push(*event));

    let background = {
        let explorer = Arc::clone(&explorer);
        tokio::spawn(async move { explorer.load("ws-1", &docs(1)).await })
    };
    source.started.notified().await;

    let applied = explorer.load("ws-1", &docs(1)).await.unwrap();
    assert!(applied);

    // The superseded load now fails; it must neither set last_error nor
    // flip the loading flag back, and must not emit a Failed event.
    source.release.notify_one();
    let stale_applied = background.await.unwrap().unwrap();

    assert!(!stale_applied);
    assert_eq!(explorer.last_error(), None);
    assert!(!explorer.is_loading());
    assert_eq!(explorer.current_view().nodes[0].display_name, "Fresh");
    assert!(!events
        .lock()
        .unwrap()
        .iter()
        .any(|event| matches!(event, ExplorerEvent::Failed(_))));
}

#[tokio::test]
async fn test_source_init_error_maps_to_fetch_failed_everywhere() {
    let source = Arc::new(FlakySource {
        payload: payload(&["A"], &[]),
        calls: AtomicUsize::new(0),
        fail_with: || ClientError::Init("tls backend unavailable".into()),
    });
    let explorer = explorer_with(source);

    explorer.load("ws-1", &docs(1)).await.unwrap();
    let result = explorer.load("ws-1", &docs(1)).await;

    // Returned error and observable state agree on the failure family.
    assert!(matches!(result, Err(ExplorerError::FetchFailed(_))));
    assert_eq!(explorer.last_error(), Some(ErrorKind::FetchFailed));
}

#[tokio::test]
async fn test_empty_selection_supersedes_inflight_load() {
    let source = GatedSource::new();
    let explorer = Arc::new(explorer_with(source.clone()));

    let background = {
        let explorer = Arc::clone(&explorer);
        tokio::spawn(async move { explorer.load("ws-1", &docs(1)).await })
    };
    source.started.notified().await;

    // Deselecting every document while a fetch is in flight must win.
    explorer.load("ws-1", &[]).await.unwrap();

    source.release.notify_one();
    let stale_applied = background.await.unwrap().unwrap();

    assert!(!stale_applied);
    assert!(explorer.current_view().is_empty());
}

#[tokio::test]
async fn test_search_filters_and_reset_restores() {
    let source = StaticSource::new(payload(&["A", "B", "C", "D", "E"], &[(0, 1), (1, 2), (2, 3), (3, 4)]));
    let explorer = explorer_with(source);
    explorer.load("ws-1", &docs(1)).await.unwrap();

    explorer.search("A", 1).unwrap();
    assert_eq!(explorer.node_count(), 2);

    explorer.search("A", 2).unwrap();
    assert_eq!(explorer.node_count(), 3);

    explorer.reset();
    assert_eq!(explorer.node_count(), 5);

    // Reset is idempotent.
    let once = explorer.current_view();
    explorer.reset();
    assert_eq!(*explorer.current_view(), *once);
}

#[tokio::test]
async fn test_no_results_leaves_view_unchanged() {
    let source = StaticSource::new(payload(&["A", "B"], &[(0, 1)]));
    let explorer = explorer_with(source);
    explorer.load("ws-1", &docs(1)).await.unwrap();

    explorer.search("A", 1).unwrap();
    let before = explorer.current_view();

    let result = explorer.search("zzz_no_such_node", 1);

    assert!(matches!(result, Err(ExplorerError::NoResults)));
    assert_eq!(*explorer.current_view(), *before);
    assert_eq!(explorer.last_error(), Some(ErrorKind::NoResults));
}

#[tokio::test]
async fn test_empty_query_is_rejected_before_traversal() {
    let source = StaticSource::new(payload(&["A"], &[]));
    let explorer = explorer_with(source);
    explorer.load("ws-1", &docs(1)).await.unwrap();

    assert!(matches!(explorer.search("  ", 1), Err(ExplorerError::EmptyQuery)));
    assert_eq!(explorer.last_error(), None);
}

#[tokio::test]
async fn test_non_positive_depth_is_clamped() {
    let source = StaticSource::new(payload(&["A", "B", "C"], &[(0, 1), (1, 2)]));
    let explorer = explorer_with(source);
    explorer.load("ws-1", &docs(1)).await.unwrap();

    explorer.search("A", 0).unwrap();
    assert_eq!(explorer.node_count(), 2);
}

#[tokio::test]
async fn test_suggest_uses_configured_limit() {
    let source = StaticSource::new(payload(&["Alpha", "Alpine", "Alloy", "Beta"], &[]));
    let _ = env_logger::builder().is_test(true).try_init();
    let explorer = GraphExplorer::new(
        source,
        ExplorerConfig::from_toml_str("suggest_limit = 2").unwrap(),
    );
    explorer.load("ws-1", &docs(1)).await.unwrap();

    assert_eq!(explorer.suggest("al"), vec!["Alpha", "Alpine"]);
    assert!(explorer.suggest("").is_empty());
}

#[tokio::test]
async fn test_listeners_observe_load_and_search() {
    let source = StaticSource::new(payload(&["A", "B"], &[(0, 1)]));
    let explorer = explorer_with(source);

    let events: Arc<Mutex<Vec<ExplorerEvent>>> = Arc::default();
    let sink = Arc::clone(&events);
    let token = explorer.subscribe(move |event| sink.lock().unwrap().push(*event));

    explorer.load("ws-1", &docs(1)).await.unwrap();
    let _ = explorer.search("zzz", 1);

    let seen = events.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ExplorerEvent::LoadingChanged(true),
            ExplorerEvent::LoadingChanged(false),
            ExplorerEvent::ViewReplaced,
            ExplorerEvent::Failed(ErrorKind::NoResults),
        ]
    );

    explorer.unsubscribe(token);
    explorer.reset();
    assert_eq!(events.lock().unwrap().len(), 4);
}

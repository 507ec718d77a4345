use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use crate::event::{ErrorKind, ExplorerEvent};
use kmap_client::{ClientError, GraphSource, HttpGraphSource};
use kmap_graph::{FilteredView, GraphSnapshot, QueryPattern};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Listener = Box<dyn Fn(&ExplorerEvent) + Send + Sync>;

struct ExplorerState {
    snapshot: Arc<GraphSnapshot>,
    view: Arc<FilteredView>,
    loading: bool,
    last_error: Option<ErrorKind>,
}

/// Client-side owner of the workspace graph viewer's state.
///
/// All operations take `&self`; snapshot/view replacement is serialized
/// through an internal mutex so the atomic-replace guarantee holds under any
/// threading model. `load` is the only suspending operation.
pub struct GraphExplorer {
    source: Arc<dyn GraphSource>,
    config: ExplorerConfig,
    state: Mutex<ExplorerState>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    load_seq: AtomicU64,
}

impl GraphExplorer {
    pub fn new(source: Arc<dyn GraphSource>, config: ExplorerConfig) -> Self {
        Self {
            source,
            config,
            state: Mutex::new(ExplorerState {
                snapshot: Arc::new(GraphSnapshot::empty()),
                view: Arc::new(FilteredView::default()),
                loading: false,
                last_error: None,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
            load_seq: AtomicU64::new(0),
        }
    }

    /// Convenience constructor wiring an [`HttpGraphSource`] against
    /// `base_url` with the configured request timeout.
    pub fn connect(base_url: impl Into<String>, config: ExplorerConfig) -> Result<Self> {
        let source = HttpGraphSource::new(base_url, config.request_timeout())?;
        Ok(Self::new(Arc::new(source), config))
    }

    /// Fetch and adopt the graph for a workspace.
    ///
    /// An empty `document_ids` short-circuits to an empty snapshot and view
    /// without touching the network: no selected documents means an empty
    /// graph, not "everything". Fetch failures leave the previous snapshot
    /// and view untouched and surface through `last_error`.
    ///
    /// Returns `Ok(true)` when the response was adopted and `Ok(false)` when
    /// it was discarded because a newer load had been issued in the meantime.
    pub async fn load(&self, workspace_id: &str, document_ids: &[String]) -> Result<bool> {
        if document_ids.is_empty() {
            log::debug!("empty document selection; adopting empty graph");
            // Supersede any in-flight fetch so its response cannot clobber
            // the deliberately empty view.
            self.load_seq.fetch_add(1, Ordering::SeqCst);
            {
                let mut state = self.state();
                state.snapshot = Arc::new(GraphSnapshot::empty());
                state.view = Arc::new(FilteredView::default());
                state.loading = false;
                state.last_error = None;
            }
            self.notify(&ExplorerEvent::ViewReplaced);
            return Ok(true);
        }

        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state();
            state.loading = true;
        }
        self.notify(&ExplorerEvent::LoadingChanged(true));

        let outcome = self.source.fetch_graph(workspace_id, document_ids).await;

        // The staleness check must share the lock acquisition with the state
        // mutation: checked outside it, another thread's newer load could
        // complete between check and apply and then be clobbered here.
        match outcome {
            Ok(payload) => {
                let snapshot = Arc::new(GraphSnapshot::from_payload(&payload));
                let view = Arc::new(snapshot.full_view());
                {
                    let mut state = self.state();
                    if self.is_stale(seq) {
                        return Ok(false);
                    }
                    state.snapshot = snapshot;
                    state.view = view;
                    state.loading = false;
                    state.last_error = None;
                }
                self.notify(&ExplorerEvent::LoadingChanged(false));
                self.notify(&ExplorerEvent::ViewReplaced);
                Ok(true)
            }
            Err(err) => {
                let (kind, err) = match err {
                    ClientError::Timeout => (ErrorKind::Timeout, ExplorerError::Timeout),
                    other => (
                        ErrorKind::FetchFailed,
                        ExplorerError::FetchFailed(other.to_string()),
                    ),
                };
                log::warn!("graph fetch failed: {err}");
                {
                    let mut state = self.state();
                    if self.is_stale(seq) {
                        return Ok(false);
                    }
                    state.loading = false;
                    state.last_error = Some(kind);
                }
                self.notify(&ExplorerEvent::LoadingChanged(false));
                self.notify(&ExplorerEvent::Failed(kind));
                Err(err)
            }
        }
    }

    /// Whether a newer load has been issued since `seq`. Only meaningful
    /// while holding the state lock, so the caller's check and apply are one
    /// atomic step.
    fn is_stale(&self, seq: u64) -> bool {
        let stale = seq != self.load_seq.load(Ordering::SeqCst);
        if stale {
            log::debug!("discarding stale graph response (seq {seq})");
        }
        stale
    }

    /// Filter the view to the `depth`-hop neighborhood of every node whose
    /// display name matches `query` (substring, or anchored glob when the
    /// query contains `*`).
    ///
    /// Non-positive depth is clamped to 1. A query matching zero nodes
    /// returns [`ExplorerError::NoResults`] and leaves the view unchanged.
    pub fn search(&self, query: &str, depth: usize) -> Result<()> {
        let pattern = QueryPattern::parse(query)?;

        let mut state = self.state();
        match state.snapshot.filter(&pattern, depth) {
            Some(view) => {
                state.view = Arc::new(view);
                state.last_error = None;
                drop(state);
                self.notify(&ExplorerEvent::ViewReplaced);
                Ok(())
            }
            None => {
                state.last_error = Some(ErrorKind::NoResults);
                drop(state);
                self.notify(&ExplorerEvent::Failed(ErrorKind::NoResults));
                Err(ExplorerError::NoResults)
            }
        }
    }

    /// Re-adopt the full snapshot as the view. Idempotent.
    pub fn reset(&self) {
        {
            let mut state = self.state();
            state.view = Arc::new(state.snapshot.full_view());
            state.last_error = None;
        }
        self.notify(&ExplorerEvent::ViewReplaced);
    }

    /// Autocomplete over the current snapshot; recomputed fresh per call.
    #[must_use]
    pub fn suggest(&self, partial: &str) -> Vec<String> {
        self.state().snapshot.suggest(partial, self.config.suggest_limit)
    }

    /// Current filtered subgraph, for the renderer.
    #[must_use]
    pub fn current_view(&self) -> Arc<FilteredView> {
        Arc::clone(&self.state().view)
    }

    /// Number of nodes in the current view.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state().view.node_count()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.state().last_error
    }

    /// Register a listener; returns a token for [`unsubscribe`].
    ///
    /// Listeners run synchronously on the thread that triggered the event and
    /// must not call back into subscribe/unsubscribe.
    ///
    /// [`unsubscribe`]: GraphExplorer::unsubscribe
    pub fn subscribe(&self, listener: impl Fn(&ExplorerEvent) + Send + Sync + 'static) -> u64 {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.listeners().retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self, event: &ExplorerEvent) {
        for (_, listener) in self.listeners().iter() {
            listener(event);
        }
    }

    fn state(&self) -> MutexGuard<'_, ExplorerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

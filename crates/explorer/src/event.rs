/// Last failure class, exposed for UI binding (`last_error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The graph fetch exceeded its deadline.
    Timeout,
    /// Non-timeout transport failure or non-2xx response.
    FetchFailed,
    /// A search matched zero nodes; the view was left unchanged.
    NoResults,
}

/// Notification delivered to subscribed listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerEvent {
    /// Snapshot and/or view were replaced; re-read `current_view`.
    ViewReplaced,
    /// The loading flag flipped.
    LoadingChanged(bool),
    /// An operation failed; `last_error` carries the same kind.
    Failed(ErrorKind),
}

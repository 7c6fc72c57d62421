//! Remote mirrors: client-held copies of server-owned lists.
//!
//! A mirror is replaced wholesale by each successful fetch and never merged.
//! A failed fetch records the error and keeps the previous items. Every fetch
//! takes a ticket when it starts; when it resolves, its result is applied only
//! if no newer fetch has been started since, so a slow stale response can
//! never overwrite a newer one.

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::api::types::Page;

/// Point-in-time view of a mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Page count reported by the server, for paginated resources.
    pub total_pages: u32,
}

/// What happened to a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The result replaced the mirror's items.
    Applied,
    /// A newer fetch was started meanwhile; the result was dropped.
    Stale,
}

struct MirrorState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    total_pages: u32,
    /// Newest ticket handed out.
    issued: u64,
}

/// A shared, cloneable mirror of one remote list.
pub struct RemoteMirror<T> {
    name: &'static str,
    state: Arc<RwLock<MirrorState<T>>>,
}

impl<T> Clone for RemoteMirror<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> std::fmt::Debug for RemoteMirror<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteMirror")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T: Clone> RemoteMirror<T> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(MirrorState {
                items: Vec::new(),
                loading: false,
                error: None,
                total_pages: 0,
                issued: 0,
            })),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn snapshot(&self) -> MirrorSnapshot<T> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        MirrorSnapshot {
            items: state.items.clone(),
            loading: state.loading,
            error: state.error.clone(),
            total_pages: state.total_pages,
        }
    }

    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .clone()
    }

    /// Run `f` against the current items without cloning them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner).items)
    }

    /// Append one item in place. Used by the one list that is patched locally
    /// after a create instead of being refetched.
    pub fn append(&self, item: T) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .push(item);
    }

    /// Start a fetch: mark loading, clear the error and issue a ticket.
    fn begin(&self) -> u64 {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.issued += 1;
        state.loading = true;
        state.error = None;
        state.issued
    }

    fn apply<E: Display>(
        &self,
        ticket: u64,
        result: Result<(Vec<T>, u32), E>,
    ) -> Result<RefreshOutcome, E> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if ticket != state.issued {
            debug!(
                mirror = self.name,
                ticket,
                newest = state.issued,
                "Discarding stale response"
            );
            return Ok(RefreshOutcome::Stale);
        }

        state.loading = false;
        match result {
            Ok((items, total_pages)) => {
                debug!(mirror = self.name, count = items.len(), "Mirror refreshed");
                state.items = items;
                state.total_pages = total_pages;
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Replace the items with the result of `fetch`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when this was the newest fetch; the previous
    /// items are kept and the error is recorded in the mirror.
    pub async fn refresh<F, E>(&self, fetch: F) -> Result<RefreshOutcome, E>
    where
        F: Future<Output = Result<Vec<T>, E>>,
        E: Display,
    {
        let ticket = self.begin();
        let result = fetch.await;
        self.apply(ticket, result.map(|items| (items, 0)))
    }

    /// Like [`refresh`](Self::refresh) for a server-paginated list.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when this was the newest fetch.
    pub async fn refresh_page<F, E>(&self, fetch: F) -> Result<RefreshOutcome, E>
    where
        F: Future<Output = Result<Page<T>, E>>,
        E: Display,
    {
        let ticket = self.begin();
        let result = fetch.await;
        self.apply(ticket, result.map(|page| (page.data, page.total_pages)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_refresh_replaces_items() {
        let mirror = RemoteMirror::new("test");
        let outcome = mirror
            .refresh(async { Ok::<_, String>(vec![1, 2, 3]) })
            .await
            .unwrap();
        assert_eq!(outcome, RefreshOutcome::Applied);
        assert_eq!(mirror.items(), vec![1, 2, 3]);

        mirror.refresh(async { Ok::<_, String>(vec![9]) }).await.unwrap();
        let snapshot = mirror.snapshot();
        assert_eq!(snapshot.items, vec![9]);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_failure_keeps_stale_items() {
        let mirror = RemoteMirror::new("test");
        mirror.refresh(async { Ok::<_, String>(vec![1]) }).await.unwrap();

        let err = mirror
            .refresh(async { Err::<Vec<i32>, _>("boom".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "boom");

        let snapshot = mirror.snapshot();
        assert_eq!(snapshot.items, vec![1]);
        assert_eq!(snapshot.error.as_deref(), Some("boom"));
        assert!(!snapshot.loading);

        // A new request clears the error.
        mirror.refresh(async { Ok::<_, String>(vec![2]) }).await.unwrap();
        assert!(mirror.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_stale_response_never_overwrites_newer() {
        let mirror = RemoteMirror::new("test");
        let (slow_tx, slow_rx) = oneshot::channel::<Vec<i32>>();

        let slow_mirror = mirror.clone();
        let slow = tokio::spawn(async move {
            slow_mirror
                .refresh(async { Ok::<_, String>(slow_rx.await.unwrap()) })
                .await
        });
        tokio::task::yield_now().await;
        while !mirror.snapshot().loading {
            tokio::task::yield_now().await;
        }

        // A newer fetch starts and finishes first.
        let fast = mirror
            .refresh(async { Ok::<_, String>(vec![2]) })
            .await
            .unwrap();
        assert_eq!(fast, RefreshOutcome::Applied);

        // The older one resolves last and is discarded.
        slow_tx.send(vec![1]).unwrap();
        assert_eq!(slow.await.unwrap().unwrap(), RefreshOutcome::Stale);
        assert_eq!(mirror.items(), vec![2]);
        assert!(!mirror.snapshot().loading);
    }

    #[tokio::test]
    async fn test_refresh_page_records_total_pages() {
        let mirror = RemoteMirror::new("categories");
        mirror
            .refresh_page(async {
                Ok::<_, String>(Page {
                    data: vec!["a", "b"],
                    total_pages: 4,
                })
            })
            .await
            .unwrap();
        let snapshot = mirror.snapshot();
        assert_eq!(snapshot.total_pages, 4);
        assert_eq!(snapshot.items, vec!["a", "b"]);
    }

    #[test]
    fn test_append_in_place() {
        let mirror = RemoteMirror::new("products");
        mirror.append("x");
        mirror.append("y");
        assert_eq!(mirror.with_items(<[&str]>::len), 2);
    }
}

//! Search history cache.

use encore_core::{EncoreError, Result, SearchEntryId, SearchHistoryApi, SearchHistoryEntry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error};

/// Delay before the one-shot re-fetch that follows a history change.
pub const DEFAULT_REFETCH_DELAY: Duration = Duration::from_millis(300);

/// Published list of past searches.
///
/// After a successful `record` or `delete` the list is re-fetched once,
/// `refetch_delay` later. There is no other retry.
pub struct SearchHistory<A> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    api: A,
    entries: watch::Sender<Vec<SearchHistoryEntry>>,
    refetch_delay: Duration,
}

/// Log a failed history call and hand the error back.
fn logged(operation: &'static str) -> impl Fn(EncoreError) -> EncoreError {
    move |e| {
        error!(operation, error = %e, "Search history operation failed");
        e
    }
}

impl<A> Clone for SearchHistory<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: SearchHistoryApi + 'static> SearchHistory<A> {
    pub fn new(api: A) -> Self {
        Self::with_refetch_delay(api, DEFAULT_REFETCH_DELAY)
    }

    pub fn with_refetch_delay(api: A, refetch_delay: Duration) -> Self {
        let (entries, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                api,
                entries,
                refetch_delay,
            }),
        }
    }

    pub fn entries(&self) -> Vec<SearchHistoryEntry> {
        self.inner.entries.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<SearchHistoryEntry>> {
        self.inner.entries.subscribe()
    }

    /// Fetch the history and publish it.
    pub async fn refresh(&self) -> Result<Vec<SearchHistoryEntry>> {
        let entries = self
            .inner
            .api
            .list_searches()
            .await
            .map_err(logged("refresh"))?;

        debug!(count = entries.len(), "Publishing search history");
        self.inner.entries.send_replace(entries.clone());
        Ok(entries)
    }

    /// Record a search. Blank queries are rejected without a call.
    ///
    /// `None` when the server stored it but sent no body back; the entry
    /// shows up with the scheduled re-fetch.
    pub async fn record(&self, query: &str) -> Result<Option<SearchHistoryEntry>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EncoreError::invalid_input("search query is empty"));
        }

        let entry = self
            .inner
            .api
            .add_search(query)
            .await
            .map_err(logged("record"))?;
        self.schedule_refetch();
        Ok(entry)
    }

    /// Delete a past search.
    pub async fn delete(&self, id: SearchEntryId) -> Result<()> {
        self.inner
            .api
            .delete_search(id)
            .await
            .map_err(logged("delete"))?;
        self.schedule_refetch();
        Ok(())
    }

    fn schedule_refetch(&self) {
        let history = self.clone();
        let delay = self.inner.refetch_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Failure is already logged by refresh
            let _ = history.refresh().await;
        });
    }
}

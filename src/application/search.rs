//! Debounced search.
//!
//! Rapid inputs collapse into one request once the input has been quiet for
//! the configured period. Each new input aborts the pending timer task and
//! schedules a fresh one; nothing is queued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::domain::{Listing, User};
use crate::error::Result;
use crate::port::{ListQuery, MarketplaceApi, Page, Scope};

/// Cancel-and-reschedule timer around an async handler.
pub struct Debouncer<T> {
    quiet: Duration,
    handler: Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(quiet: Duration, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            quiet,
            handler: Arc::new(move |value| -> BoxFuture<'static, ()> { Box::pin(handler(value)) }),
            pending: Mutex::new(None),
        }
    }

    /// Record an input. Only the last input of a burst reaches the handler.
    ///
    /// Must be called inside a tokio runtime.
    pub fn push(&self, value: T) {
        let handler = Arc::clone(&self.handler);
        let quiet = self.quiet;
        let task = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            handler(value).await;
        });

        if let Some(previous) = self.pending.lock().replace(task) {
            trace!("Rescheduling debounced search");
            previous.abort();
        }
    }

    /// Drop any scheduled call.
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }

    /// Wait for the scheduled call, if any, to finish.
    pub async fn flush(&self) {
        let task = self.pending.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.abort();
        }
    }
}

/// What a search box looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Users,
    Listings,
    /// Users with the buyer role, for the transaction creation form.
    Buyers,
}

/// Search results of any target.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Users(Page<User>),
    Listings(Page<Listing>),
}

impl SearchResults {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Users(page) => page.items.len(),
            Self::Listings(page) => page.items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Issue one search request for `term`.
pub async fn run_search<A: MarketplaceApi + ?Sized>(
    api: &A,
    target: SearchTarget,
    term: &str,
    page_size: u32,
) -> Result<SearchResults> {
    let query = ListQuery::everything(page_size).with_search(term);
    match target {
        SearchTarget::Users => Ok(SearchResults::Users(api.list_users(&query).await?)),
        SearchTarget::Buyers => Ok(SearchResults::Users(
            api.list_users(&query.with_role("BUYER")).await?,
        )),
        SearchTarget::Listings => Ok(SearchResults::Listings(
            api.list_listings(Scope::Admin, &query).await?,
        )),
    }
}

//! Cursor-paged queries: one cache entry holding every loaded page.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use quill_flux::StateValue;

use crate::cache::{keep_latest, Merge, QueryClient, QueryError};
use crate::key::QueryKey;
use crate::options::QueryOptions;

/// Pages in load order with the cursor each one was fetched with.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteData<P, C = u32> {
    pub pages: Vec<P>,
    pub page_params: Vec<C>,
}

impl<P, C> InfiniteData<P, C> {
    pub fn last_page(&self) -> Option<&P> {
        self.pages.last()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<P, C> Default for InfiniteData<P, C> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            page_params: Vec::new(),
        }
    }
}

impl QueryClient {
    /// Load (or reload) an infinite query.
    ///
    /// A reload fetches as many pages as are cached, starting again from
    /// `initial`, and stops early once `next` reports no further cursor.
    pub async fn fetch_infinite_query<P, C, E, F, Fut, N>(
        &self,
        key: &QueryKey,
        opts: &QueryOptions,
        initial: C,
        fetcher: F,
        next: N,
    ) -> Result<Arc<InfiniteData<P, C>>, QueryError<E>>
    where
        P: Any + Send + Sync,
        C: Any + Send + Sync + Clone,
        E: Any + Send + Sync + Display,
        F: Fn(C) -> Fut,
        Fut: Future<Output = Result<P, E>>,
        N: Fn(&P) -> Option<C>,
    {
        let cached = self.get_query_data::<InfiniteData<P, C>>(key);
        if let Some(data) = &cached {
            if !self.is_stale(key, opts) {
                return Ok(Arc::clone(data));
            }
        }
        let wanted = cached.map_or(1, |d| d.len().max(1));

        let (fetcher, next) = (&fetcher, &next);
        let attempt = move || {
            let initial = initial.clone();
            async move {
                let mut data = InfiniteData::default();
                let mut cursor = Some(initial);
                while let Some(param) = cursor.take() {
                    if data.len() >= wanted {
                        break;
                    }
                    let page = fetcher(param.clone()).await?;
                    cursor = next(&page);
                    data.pages.push(page);
                    data.page_params.push(param);
                }
                Ok::<_, E>(data)
            }
        };
        let stored = self
            .run(key, opts, true, attempt, keep_latest())
            .await?;
        stored
            .downcast_arc::<InfiniteData<P, C>>()
            .ok_or(QueryError::Disabled)
    }

    /// Append the page after the last cached one.
    ///
    /// `Ok(None)` without a request when nothing is cached or the last page
    /// has no next cursor.
    pub async fn fetch_next_page<P, C, E, F, Fut, N>(
        &self,
        key: &QueryKey,
        opts: &QueryOptions,
        fetcher: F,
        next: N,
    ) -> Result<Option<Arc<InfiniteData<P, C>>>, QueryError<E>>
    where
        P: Any + Send + Sync + Clone,
        C: Any + Send + Sync + Clone + PartialEq,
        E: Any + Send + Sync + Display,
        F: Fn(C) -> Fut,
        Fut: Future<Output = Result<P, E>>,
        N: Fn(&P) -> Option<C>,
    {
        let Some(cached) = self.get_query_data::<InfiniteData<P, C>>(key) else {
            return Ok(None);
        };
        let (Some(last), Some(base)) = (cached.last_page(), cached.page_params.last()) else {
            return Ok(None);
        };
        let Some(cursor) = next(last) else {
            return Ok(None);
        };
        tracing::debug!(%key, pages = cached.len(), "loading next page");

        let base = base.clone();
        let merge: Merge = {
            let cursor = cursor.clone();
            Box::new(move |current: Option<&StateValue>, fetched: StateValue| {
                let current = current?.downcast_ref::<InfiniteData<P, C>>()?;
                // Something else reshaped the list meanwhile; drop this page.
                if current.page_params.last() != Some(&base) {
                    return None;
                }
                let page = fetched.downcast_ref::<P>()?.clone();
                let mut grown = current.clone();
                grown.pages.push(page);
                grown.page_params.push(cursor);
                Some(StateValue::new(grown))
            })
        };
        let fetcher = &fetcher;
        let attempt = move || fetcher(cursor.clone());
        let stored = self.run(key, opts, true, attempt, merge).await?;
        Ok(stored.downcast_arc::<InfiniteData<P, C>>())
    }

    /// Whether the last cached page points at another one.
    pub fn has_next_page<P, C, N>(&self, key: &QueryKey, next: N) -> bool
    where
        P: Any + Send + Sync,
        C: Any + Send + Sync,
        N: Fn(&P) -> Option<C>,
    {
        self.get_query_data::<InfiniteData<P, C>>(key)
            .and_then(|d| d.last_page().and_then(|p| next(p)))
            .is_some()
    }
}

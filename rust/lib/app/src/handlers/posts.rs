//! Posts list: search, ordering, paging and the structured filter dialog.

use std::sync::Arc;

use quill_client::{ListPost, Paginated, ProfilesFilters};
use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::helpers::query_failed;
use crate::handlers::post_add;
use crate::keys;
use crate::request::*;
use crate::state::posts::{
    DEFAULT_POSTS_PAGE_SIZE, LOOKUP_PAGE_SIZE, POSTS_ORDERINGS, POSTS_PAGE_SIZES,
};
use crate::state::*;
use crate::strings::SOMETHING_WENT_WRONG;

/// Fetch the list for the committed filters.
///
/// A page fetched for other filters is dropped before the fetch starts.
/// Cached data for the key is shown at once; the fetch result replaces it
/// unless the filters moved on meanwhile.
pub async fn load_posts(ctx: &AppContext, store: &Arc<StateStore>) {
    let filters = store
        .update(PostsListPage::PATH, |p: &mut PostsListPage| {
            if p.data_filters.as_ref() != Some(&p.filters) {
                p.data = None;
                p.data_filters = None;
                p.page_count = 0;
            }
            if p.data.is_none() {
                p.status = LoadStatus::Loading;
            }
        })
        .filters;
    let key = keys::posts_list(&filters);
    let page_size = filters.page_size.unwrap_or(DEFAULT_POSTS_PAGE_SIZE);

    if let Some(cached) = ctx.cache.get_query_data::<Paginated<ListPost>>(&key) {
        store.modify(PostsListPage::PATH, |p: &mut PostsListPage| {
            if p.filters == filters {
                p.page_count = cached.page_count(page_size);
                p.data = Some((*cached).clone());
                p.data_filters = Some(filters.clone());
            }
        });
    }

    let (api, f) = (&ctx.api, &filters);
    let result = ctx
        .cache
        .fetch_query(&key, &ctx.queries(), move || async move { api.posts().list(f).await })
        .await;

    let status = match &result {
        Ok(_) => LoadStatus::Ready,
        Err(e) => query_failed(&key, e),
    };
    store.modify(PostsListPage::PATH, |p: &mut PostsListPage| {
        if p.filters != filters {
            tracing::debug!(%key, "dropping result for old filters");
            return;
        }
        if let Ok(data) = &result {
            p.page_count = data.page_count(page_size);
            p.data = Some((**data).clone());
            p.data_filters = Some(filters.clone());
        }
        p.status = status;
    });
}

/// Refetch the committed list on a background task after a mutation made
/// it stale. Nothing happens until the list has been visited.
pub fn revalidate_posts(ctx: &AppContext, store: &StateStore) {
    let Some(page) = store.get_as::<PostsListPage>(PostsListPage::PATH) else {
        return;
    };
    let key = keys::posts_list(&page.filters);
    let (api, filters) = (ctx.api.clone(), page.filters);
    let fetcher = move || {
        let (api, f) = (api.clone(), filters.clone());
        async move { api.posts().list(&f).await }
    };
    if ctx.cache.spawn_refetch(key, ctx.queries(), fetcher).is_some() {
        tracing::debug!("posts list revalidating");
    }
}

/// Apply a filter edit and start again from page 1. `true` when the
/// committed filters changed.
fn edit_filters(store: &StateStore, edit: impl FnOnce(&mut PostsListPage)) -> bool {
    let mut changed = false;
    store.update(PostsListPage::PATH, |p: &mut PostsListPage| {
        let before = p.filters.clone();
        edit(p);
        p.filters.page = Some(1);
        changed = p.filters != before;
    });
    changed
}

/// Handle `posts/load`.
pub async fn handle_load(_req: &PostsLoadReq, store: &Arc<StateStore>, ctx: &AppContext) {
    load_posts(ctx, store).await;
}

/// Handle `posts/search-input`. The text is committed after the debounce.
pub async fn handle_search_input(req: &PostsSearchInputReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.update(PostsListPage::PATH, |p: &mut PostsListPage| {
        p.search_input = req.value.clone()
    });
    if !ctx.debounce.settle(PostsSearchInputReq::PATH).await {
        return;
    }
    let changed = edit_filters(store, |p| p.filters.search = p.search_input.trim().to_string());
    if changed {
        load_posts(ctx, store).await;
    }
}

/// Handle `posts/set-ordering`.
pub async fn handle_set_ordering(req: &PostsSetOrderingReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if !POSTS_ORDERINGS.contains(&req.ordering.as_str()) {
        tracing::warn!(ordering = %req.ordering, "unknown posts ordering");
        return;
    }
    if edit_filters(store, |p| p.filters.ordering = req.ordering.clone()) {
        load_posts(ctx, store).await;
    }
}

/// Handle `posts/set-page-size`.
pub async fn handle_set_page_size(req: &PostsSetPageSizeReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if !POSTS_PAGE_SIZES.contains(&req.page_size) {
        tracing::warn!(page_size = req.page_size, "unsupported posts page size");
        return;
    }
    if edit_filters(store, |p| p.filters.page_size = Some(req.page_size)) {
        load_posts(ctx, store).await;
    }
}

/// Handle `posts/set-page`.
pub async fn handle_set_page(req: &PostsSetPageReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if req.page == 0 {
        return;
    }
    let page = store.update(PostsListPage::PATH, |p: &mut PostsListPage| {
        p.filters.page = Some(req.page)
    });
    tracing::debug!(page = req.page, of = page.page_count, "posts page");
    load_posts(ctx, store).await;
}

// ========================================================================
// Filter dialog
// ========================================================================

/// Handle `posts/filters-open`. Stages a copy of the committed filters.
pub async fn handle_filters_open(_req: &FiltersOpenReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let filters = store
        .get_as::<PostsListPage>(PostsListPage::PATH)
        .unwrap_or_default()
        .filters;
    store.update(FiltersDialog::PATH, |d: &mut FiltersDialog| {
        d.open = true;
        d.draft = StructuredFilters::from_filters(&filters);
    });
    search_authors(ctx, store, "").await;
    post_add::search_tags(ctx, store, "").await;
}

/// Handle `posts/filters-edit`.
pub async fn handle_filters_edit(req: &FiltersEditReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    let staged = store.modify(FiltersDialog::PATH, |d: &mut FiltersDialog| {
        req.field.apply(&mut d.draft)
    });
    if staged.is_none() {
        tracing::debug!("filter edit with no dialog open");
    }
}

/// Handle `posts/filters-authors`.
pub async fn handle_filters_authors(req: &FiltersAuthorsReq, store: &Arc<StateStore>, ctx: &AppContext) {
    search_authors(ctx, store, &req.query).await;
}

async fn search_authors(ctx: &AppContext, store: &Arc<StateStore>, query: &str) {
    let filters = ProfilesFilters {
        page_size: Some(LOOKUP_PAGE_SIZE),
        username: query.to_string(),
        ..Default::default()
    };
    let key = keys::authors(&filters);
    let (api, f) = (&ctx.api, &filters);
    match ctx
        .cache
        .fetch_query(&key, &ctx.queries(), move || async move { api.profiles().list(f).await })
        .await
    {
        Ok(page) => {
            let names: Vec<String> = page.results.iter().map(|p| p.username.clone()).collect();
            store.modify(FiltersDialog::PATH, |d: &mut FiltersDialog| d.author_options = names);
        }
        Err(e) => {
            query_failed(&key, &e);
            ctx.notifier.error(store, SOMETHING_WENT_WRONG);
        }
    }
}

/// Handle `posts/filters-confirm`. Commits the draft in one step.
pub async fn handle_filters_confirm(_req: &FiltersConfirmReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let Some(dialog) = store.get_as::<FiltersDialog>(FiltersDialog::PATH) else {
        return;
    };
    store.update(FiltersDialog::PATH, |d: &mut FiltersDialog| d.open = false);
    // An empty draft puts search, ordering and paging back to defaults too.
    let changed = if dialog.draft == StructuredFilters::default() {
        edit_filters(store, |p| {
            p.filters = default_posts_filters();
            p.search_input.clear();
        })
    } else {
        edit_filters(store, |p| dialog.draft.apply_to(&mut p.filters))
    };
    if changed {
        load_posts(ctx, store).await;
    }
}

/// Handle `posts/filters-clear`. Everything back to defaults, search included.
pub async fn handle_filters_clear(_req: &FiltersClearReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.update(FiltersDialog::PATH, |d: &mut FiltersDialog| {
        d.open = false;
        d.draft = StructuredFilters::default();
    });
    store.update(PostsListPage::PATH, |p: &mut PostsListPage| {
        p.filters = default_posts_filters();
        p.search_input.clear();
    });
    load_posts(ctx, store).await;
}

/// Handle `posts/filters-close`. The draft is discarded.
pub async fn handle_filters_close(_req: &FiltersCloseReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(FiltersDialog::PATH, |d: &mut FiltersDialog| d.open = false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_edit_resets_page() {
        let store = StateStore::new();
        store.update(PostsListPage::PATH, |p: &mut PostsListPage| p.filters.page = Some(4));

        assert!(edit_filters(&store, |p| p.filters.ordering = "title".into()));
        let page = store.get_as::<PostsListPage>(PostsListPage::PATH).unwrap();
        assert_eq!(page.filters.page, Some(1));
    }

    #[test]
    fn same_values_are_not_a_change() {
        let store = StateStore::new();
        assert!(!edit_filters(&store, |p| p.filters.ordering = "-created_at".into()));
    }
}

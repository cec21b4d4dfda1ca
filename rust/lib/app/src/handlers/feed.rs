//! Personal feed: posts by followed authors, loaded page by page.

use std::sync::Arc;

use quill_client::{ListPost, PostsFilters};
use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::helpers::{next_cursor, query_failed};
use crate::keys;
use crate::request::*;
use crate::state::posts::POSTS_ORDERINGS;
use crate::state::{InfiniteList, LoadStatus, PostsFeedPage};
use crate::strings::SOMETHING_WENT_WRONG;

/// Load (or reload every loaded page of) the feed for its current filters.
pub async fn load_feed(ctx: &AppContext, store: &Arc<StateStore>) {
    let page = store.update(PostsFeedPage::PATH, |p: &mut PostsFeedPage| {
        if p.posts.items.is_empty() {
            p.status = LoadStatus::Loading;
        }
    });
    let filters = page.filters();
    let key = keys::posts_feed(&filters);

    let (api, base) = (&ctx.api, &filters);
    let result = ctx
        .cache
        .fetch_infinite_query(
            &key,
            &ctx.queries(),
            1,
            move |n: u32| {
                let f = PostsFilters {
                    page: Some(n),
                    ..base.clone()
                };
                async move { api.posts().feed(&f).await }
            },
            next_cursor::<ListPost>,
        )
        .await;

    let status = match &result {
        Ok(_) => LoadStatus::Ready,
        Err(e) => query_failed(&key, e),
    };
    store.modify(PostsFeedPage::PATH, |p: &mut PostsFeedPage| {
        if p.filters() != filters {
            return;
        }
        if let Ok(data) = &result {
            p.posts = InfiniteList::from_pages(data);
        }
        p.status = status;
    });
}

/// Handle `feed/load`.
pub async fn handle_load(_req: &FeedLoadReq, store: &Arc<StateStore>, ctx: &AppContext) {
    load_feed(ctx, store).await;
}

/// Handle `feed/search-input`.
pub async fn handle_search_input(req: &FeedSearchInputReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.update(PostsFeedPage::PATH, |p: &mut PostsFeedPage| {
        p.search_input = req.value.clone()
    });
    if !ctx.debounce.settle(FeedSearchInputReq::PATH).await {
        return;
    }
    let mut changed = false;
    store.update(PostsFeedPage::PATH, |p: &mut PostsFeedPage| {
        let search = p.search_input.trim().to_string();
        changed = p.search != search;
        p.search = search;
    });
    if changed {
        load_feed(ctx, store).await;
    }
}

/// Handle `feed/set-ordering`.
pub async fn handle_set_ordering(req: &FeedSetOrderingReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if !POSTS_ORDERINGS.contains(&req.ordering.as_str()) {
        tracing::warn!(ordering = %req.ordering, "unknown feed ordering");
        return;
    }
    store.update(PostsFeedPage::PATH, |p: &mut PostsFeedPage| {
        p.ordering = req.ordering.clone()
    });
    load_feed(ctx, store).await;
}

/// Handle `feed/load-more`. Fetches the page after the last loaded one.
pub async fn handle_load_more(_req: &FeedLoadMoreReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let page = store.update(PostsFeedPage::PATH, |p: &mut PostsFeedPage| {
        p.posts.loading_more = true
    });
    let filters = page.filters();
    let key = keys::posts_feed(&filters);

    let (api, base) = (&ctx.api, &filters);
    let result = ctx
        .cache
        .fetch_next_page(
            &key,
            &ctx.queries(),
            move |n: u32| {
                let f = PostsFilters {
                    page: Some(n),
                    ..base.clone()
                };
                async move { api.posts().feed(&f).await }
            },
            next_cursor::<ListPost>,
        )
        .await;

    if let Err(e) = &result {
        query_failed(&key, e);
        ctx.notifier.error(store, SOMETHING_WENT_WRONG);
    }
    store.modify(PostsFeedPage::PATH, |p: &mut PostsFeedPage| {
        p.posts.loading_more = false;
        if p.filters() != filters {
            return;
        }
        if let Ok(Some(data)) = &result {
            p.posts = InfiniteList::from_pages(data);
        }
    });
}

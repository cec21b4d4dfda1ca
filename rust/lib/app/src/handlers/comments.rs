//! Comment section of a post.

use std::sync::Arc;
use std::time::Duration;

use quill_client::{Comment, CommentsFilters};
use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::helpers::{next_cursor, query_failed, server_message, viewer};
use crate::keys;
use crate::request::*;
use crate::state::post::{COMMENTS_ORDERINGS, COMMENTS_PAGE_SIZE};
use crate::state::{CommentSection, InfiniteList, LoadStatus};
use crate::strings::{COMMENT_ADDED, COMMENT_DELETED, SOMETHING_WENT_WRONG};

fn filters(ordering: &str) -> CommentsFilters {
    CommentsFilters {
        page: None,
        page_size: Some(COMMENTS_PAGE_SIZE),
        ordering: ordering.to_string(),
    }
}

fn section(store: &StateStore, slug: &str) -> CommentSection {
    store
        .get_as::<CommentSection>(&CommentSection::path_for(slug))
        .unwrap_or_else(|| CommentSection::for_post(slug))
}

/// Load (or reload) the comments of `slug` for the section's ordering.
pub async fn load_comments(ctx: &AppContext, store: &Arc<StateStore>, slug: &str) {
    let current = store.update(&CommentSection::path_for(slug), |s: &mut CommentSection| {
        if s.slug.is_empty() {
            *s = CommentSection::for_post(slug);
        }
        if s.comments.items.is_empty() {
            s.status = LoadStatus::Loading;
        }
    });
    fetch(ctx, store, slug, &current.ordering, false).await;
}

/// Shared by load and load-more.
async fn fetch(ctx: &AppContext, store: &Arc<StateStore>, slug: &str, ordering: &str, more: bool) {
    let base = filters(ordering);
    let key = keys::comments(slug, &base);
    let opts = ctx.queries();
    let (api, base) = (&ctx.api, &base);
    let fetcher = move |n: u32| {
        let f = CommentsFilters {
            page: Some(n),
            ..base.clone()
        };
        async move { api.posts().comments(slug, &f).await }
    };

    let result = if more {
        ctx.cache
            .fetch_next_page(&key, &opts, fetcher, next_cursor::<Comment>)
            .await
    } else {
        ctx.cache
            .fetch_infinite_query(&key, &opts, 1, fetcher, next_cursor::<Comment>)
            .await
            .map(Some)
    };

    let status = match &result {
        Ok(_) => LoadStatus::Ready,
        Err(e) => query_failed(&key, e),
    };
    if more && result.is_err() {
        ctx.notifier.error(store, SOMETHING_WENT_WRONG);
    }
    store.modify(&CommentSection::path_for(slug), |s: &mut CommentSection| {
        s.comments.loading_more = false;
        if s.ordering != ordering {
            return;
        }
        match &result {
            Ok(Some(data)) => s.comments = InfiniteList::from_pages(data),
            Ok(None) => {}
            Err(_) if more => return,
            Err(_) => {}
        }
        s.status = status;
    });
}

/// Mark the comments stale and load them again.
async fn refetch(ctx: &AppContext, store: &Arc<StateStore>, slug: &str) {
    let ordering = section(store, slug).ordering;
    ctx.cache
        .invalidate_queries(&keys::comments(slug, &filters(&ordering)));
    load_comments(ctx, store, slug).await;
}

/// Handle `comments/load`.
pub async fn handle_load(req: &CommentsLoadReq, store: &Arc<StateStore>, ctx: &AppContext) {
    load_comments(ctx, store, &req.slug).await;
}

/// Handle `comments/set-ordering`.
pub async fn handle_set_ordering(req: &CommentsSetOrderingReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if !COMMENTS_ORDERINGS.contains(&req.ordering.as_str()) {
        tracing::warn!(ordering = %req.ordering, "unknown comments ordering");
        return;
    }
    let mut current = section(store, &req.slug);
    current.ordering = req.ordering.clone();
    current.comments = InfiniteList::default();
    store.set(&CommentSection::path_for(&req.slug), current);
    load_comments(ctx, store, &req.slug).await;
}

/// Handle `comments/load-more`.
pub async fn handle_load_more(req: &CommentsLoadMoreReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let Some(current) = store.modify(
        &CommentSection::path_for(&req.slug),
        |s: &mut CommentSection| s.comments.loading_more = true,
    ) else {
        return;
    };
    fetch(ctx, store, &req.slug, &current.ordering, true).await;
}

/// Handle `comments/input`.
pub async fn handle_input(req: &CommentsInputReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.update(&CommentSection::path_for(&req.slug), |s: &mut CommentSection| {
        if s.slug.is_empty() {
            *s = CommentSection::for_post(&req.slug);
        }
        s.input = req.value.clone();
    });
}

/// Handle `comments/clear`.
pub async fn handle_clear(req: &CommentsClearReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(&CommentSection::path_for(&req.slug), |s: &mut CommentSection| {
        s.input.clear()
    });
}

/// Handle `comments/submit`.
///
/// Blank input never reaches the server. After a success the input is
/// cleared and submitting stays locked for the configured cool-down.
pub async fn handle_submit(req: &CommentsSubmitReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let current = section(store, &req.slug);
    if current.locked || ctx.mutations.is_loading(CommentsSubmitReq::PATH) {
        tracing::debug!(slug = %req.slug, "comment submit ignored while locked");
        return;
    }
    if current.input.trim().is_empty() {
        return;
    }

    let result = ctx
        .mutations
        .run(
            CommentsSubmitReq::PATH,
            ctx.api.posts().add_comment(&req.slug, &current.input),
        )
        .await;

    match result {
        Ok(comment) => {
            tracing::info!(slug = %req.slug, id = comment.id, "comment added");
            let path = CommentSection::path_for(&req.slug);
            store.modify(&path, |s: &mut CommentSection| {
                s.input.clear();
                s.locked = true;
            });
            unlock_after(store, path, ctx.config.comment_cooldown());
            ctx.notifier.success(store, COMMENT_ADDED);
            refetch(ctx, store, &req.slug).await;
        }
        Err(e) => {
            tracing::warn!(slug = %req.slug, error = %e, "comment add failed");
            ctx.notifier.error(store, SOMETHING_WENT_WRONG);
        }
    }
}

fn unlock_after(store: &Arc<StateStore>, path: String, cooldown: Duration) {
    let store = Arc::clone(store);
    tokio::spawn(async move {
        tokio::time::sleep(cooldown).await;
        store.modify(&path, |s: &mut CommentSection| s.locked = false);
    });
}

/// Handle `comments/delete-open`. Only for the comment's author.
pub async fn handle_delete_open(req: &CommentDeleteOpenReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    let viewer = viewer(store);
    store.modify(&CommentSection::path_for(&req.slug), |s: &mut CommentSection| {
        if s.can_delete(req.id, viewer.as_deref()) {
            s.delete_target = Some(req.id);
        }
    });
}

/// Handle `comments/delete-close`.
pub async fn handle_delete_close(req: &CommentDeleteCloseReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(&CommentSection::path_for(&req.slug), |s: &mut CommentSection| {
        s.delete_target = None
    });
}

/// Handle `comments/delete`. Only the target confirmed through
/// `comments/delete-open` is sent.
pub async fn handle_delete(req: &CommentDeleteReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if section(store, &req.slug).delete_target != Some(req.id) {
        tracing::warn!(slug = %req.slug, id = req.id, "comment delete without confirmation");
        return;
    }
    let result = ctx
        .mutations
        .run(
            CommentDeleteReq::PATH,
            ctx.api.posts().delete_comment(&req.slug, req.id),
        )
        .await;
    store.modify(&CommentSection::path_for(&req.slug), |s: &mut CommentSection| {
        s.delete_target = None
    });

    match result {
        Ok(()) => {
            tracing::info!(slug = %req.slug, id = req.id, "comment deleted");
            refetch(ctx, store, &req.slug).await;
            ctx.notifier.success(store, COMMENT_DELETED);
        }
        Err(e) => {
            tracing::warn!(slug = %req.slug, id = req.id, error = %e, "comment delete failed");
            ctx.notifier.error(store, server_message(&e));
        }
    }
}

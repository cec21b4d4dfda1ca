//! Post detail: load, body edit, favourite and delete.

use std::sync::Arc;

use quill_client::{Post, PostUpdatePayload};
use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::app::navigate;
use crate::handlers::helpers::{is_not_found, mutation_message, query_failed, viewer};
use crate::handlers::posts;
use crate::keys;
use crate::request::*;
use crate::routing::POSTS_PATH;
use crate::state::{CommentSection, LoadStatus, PostDetailPage};
use crate::strings::{
    POST_DELETED, POST_DELETE_FAILED, POST_FAVOURITED, POST_NOT_FOUND, POST_UNFAVOURITED,
    POST_UPDATED, POST_UPDATE_FAILED, SOMETHING_WENT_WRONG,
};

/// Load the post behind `slug`. `false` when it does not exist, in which
/// case the viewer has been sent back to the list.
pub async fn load_post(ctx: &AppContext, store: &Arc<StateStore>, slug: &str) -> bool {
    let path = PostDetailPage::path_for(slug);
    let key = keys::post(slug);
    let cached = ctx.cache.get_query_data::<Post>(&key);
    store.update(&path, |p: &mut PostDetailPage| {
        p.slug = slug.to_string();
        if let Some(post) = &cached {
            p.post = Some((**post).clone());
        }
        if p.post.is_none() {
            p.status = LoadStatus::Loading;
        }
    });

    let api = &ctx.api;
    let result = ctx
        .cache
        .fetch_query(&key, &ctx.detail_queries(), move || async move { api.posts().get(slug).await })
        .await;

    match result {
        Ok(post) => {
            let is_author = viewer(store).is_some_and(|v| v == post.author.username);
            store.modify(&path, |p: &mut PostDetailPage| {
                p.is_author = is_author;
                p.post = Some((*post).clone());
                p.status = LoadStatus::Ready;
            });
            true
        }
        Err(e) if is_not_found(&e) => {
            tracing::info!(slug, "post not found");
            store.remove(&path);
            store.remove(&CommentSection::path_for(slug));
            ctx.notifier.error(store, POST_NOT_FOUND);
            navigate(ctx, store, POSTS_PATH).await;
            false
        }
        Err(e) => {
            let status = query_failed(&key, &e);
            store.modify(&path, |p: &mut PostDetailPage| p.status = status);
            true
        }
    }
}

/// Patch the cached post and mirror it into page state.
fn patch_post(ctx: &AppContext, store: &StateStore, slug: &str, patch: impl Fn(&mut Post)) {
    let patched = ctx.cache.update_query_data(&keys::post(slug), |p: &mut Post| patch(p));
    store.modify(&PostDetailPage::path_for(slug), |page: &mut PostDetailPage| {
        if let Some(post) = &patched {
            page.post = Some((**post).clone());
        } else if let Some(post) = page.post.as_mut() {
            patch(post);
        }
    });
}

/// Handle `post/load`.
pub async fn handle_load(req: &PostLoadReq, store: &Arc<StateStore>, ctx: &AppContext) {
    load_post(ctx, store, &req.slug).await;
}

// ========================================================================
// Edit
// ========================================================================

/// Handle `post/edit-begin`. Only the author may edit.
pub async fn handle_edit_begin(req: &PostEditBeginReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(&PostDetailPage::path_for(&req.slug), |p: &mut PostDetailPage| {
        if !p.is_author {
            return;
        }
        if let Some(post) = &p.post {
            p.draft = post.body.clone();
            p.editing = true;
        }
    });
}

/// Handle `post/edit-input`.
pub async fn handle_edit_input(req: &PostEditInputReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(&PostDetailPage::path_for(&req.slug), |p: &mut PostDetailPage| {
        p.draft = req.body.clone()
    });
}

/// Handle `post/edit-cancel`.
pub async fn handle_edit_cancel(req: &PostEditCancelReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(&PostDetailPage::path_for(&req.slug), |p: &mut PostDetailPage| {
        p.editing = false;
        p.draft.clear();
    });
}

/// Handle `post/update`. Only `body` is taken from the response.
pub async fn handle_update(req: &PostUpdateReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let payload = PostUpdatePayload {
        body: req.body.clone(),
    };
    let result = ctx
        .mutations
        .run(PostUpdateReq::PATH, ctx.api.posts().update(&req.slug, &payload))
        .await;

    match result {
        Ok(updated) => {
            patch_post(ctx, store, &req.slug, |p| p.body = updated.body.clone());
            store.modify(&PostDetailPage::path_for(&req.slug), |p: &mut PostDetailPage| {
                p.editing = false;
                p.draft.clear();
            });
            tracing::info!(slug = %req.slug, "post updated");
            ctx.notifier.success(store, POST_UPDATED);
        }
        Err(e) => {
            tracing::warn!(slug = %req.slug, error = %e, "post update failed");
            ctx.notifier.error(store, mutation_message(&e, POST_UPDATE_FAILED));
        }
    }
}

// ========================================================================
// Favourite
// ========================================================================

async fn set_favourite(ctx: &AppContext, store: &Arc<StateStore>, slug: &str, favourite: bool) {
    let posts = ctx.api.posts();
    let result = if favourite {
        ctx.mutations.run(PostFavouriteReq::PATH, posts.favourite(slug)).await
    } else {
        ctx.mutations.run(PostUnfavouriteReq::PATH, posts.unfavourite(slug)).await
    };

    match result {
        Ok(resp) => {
            patch_post(ctx, store, slug, |p| {
                p.is_favourited = favourite;
                p.favourites_count = resp.favourites_count;
            });
            // Favourites lists on profile pages, counts in the posts list.
            ctx.cache.invalidate_queries(&keys::all_profile_pages());
            ctx.cache.invalidate_queries(&keys::all_posts());
            posts::revalidate_posts(ctx, store);
            let message = if favourite { POST_FAVOURITED } else { POST_UNFAVOURITED };
            ctx.notifier.success(store, message);
        }
        Err(e) => {
            tracing::warn!(slug, favourite, error = %e, "favourite toggle failed");
            ctx.notifier.error(store, SOMETHING_WENT_WRONG);
        }
    }
}

/// Handle `post/favourite`.
pub async fn handle_favourite(req: &PostFavouriteReq, store: &Arc<StateStore>, ctx: &AppContext) {
    set_favourite(ctx, store, &req.slug, true).await;
}

/// Handle `post/unfavourite`.
pub async fn handle_unfavourite(req: &PostUnfavouriteReq, store: &Arc<StateStore>, ctx: &AppContext) {
    set_favourite(ctx, store, &req.slug, false).await;
}

// ========================================================================
// Delete
// ========================================================================

/// Handle `post/delete-open`.
pub async fn handle_delete_open(req: &PostDeleteOpenReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(&PostDetailPage::path_for(&req.slug), |p: &mut PostDetailPage| {
        p.delete_open = p.is_author
    });
}

/// Handle `post/delete-close`.
pub async fn handle_delete_close(req: &PostDeleteCloseReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.modify(&PostDetailPage::path_for(&req.slug), |p: &mut PostDetailPage| {
        p.delete_open = false
    });
}

/// Handle `post/delete`.
pub async fn handle_delete(req: &PostDeleteReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let result = ctx
        .mutations
        .run(PostDeleteReq::PATH, ctx.api.posts().delete(&req.slug))
        .await;

    match result {
        Ok(()) => {
            tracing::info!(slug = %req.slug, "post deleted");
            ctx.cache.remove_queries(&keys::post(&req.slug));
            ctx.cache.invalidate_queries(&keys::all_posts());
            store.remove_prefix(&PostDetailPage::path_for(&req.slug));
            ctx.notifier.success(store, POST_DELETED);
            navigate(ctx, store, POSTS_PATH).await;
        }
        Err(e) => {
            tracing::warn!(slug = %req.slug, error = %e, "post delete failed");
            store.modify(&PostDetailPage::path_for(&req.slug), |p: &mut PostDetailPage| {
                p.delete_open = false
            });
            ctx.notifier.error(store, mutation_message(&e, POST_DELETE_FAILED));
        }
    }
}

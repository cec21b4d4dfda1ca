//! New-post form and the tag lookup shared with the filter dialog.

use std::sync::Arc;

use quill_client::{PostCreatePayload, TagsFilters};
use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::app::navigate;
use crate::handlers::helpers::{mutation_message, query_failed};
use crate::keys;
use crate::request::*;
use crate::routing::POSTS_PATH;
use crate::state::posts::LOOKUP_PAGE_SIZE;
use crate::state::{FiltersDialog, PostAddForm};
use crate::strings::{BODY_REQUIRED, POST_CREATED, POST_CREATE_FAILED, SOMETHING_WENT_WRONG};

/// Handle `post-add/update-field`.
pub async fn handle_update_field(req: &PostAddUpdateReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    store.update(PostAddForm::PATH, |f: &mut PostAddForm| f.apply(&req.field));
}

/// Handle `post-add/submit`.
pub async fn handle_submit(_req: &PostAddSubmitReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let form = store
        .get_as::<PostAddForm>(PostAddForm::PATH)
        .unwrap_or_default();
    if form.busy {
        return;
    }
    if form.body.trim().is_empty() {
        ctx.notifier.error(store, BODY_REQUIRED);
        return;
    }

    store.update(PostAddForm::PATH, |f: &mut PostAddForm| f.busy = true);
    let payload = PostCreatePayload {
        title: form.title.clone(),
        description: form.description.clone(),
        body: form.body.clone(),
        tags: form.tags.clone(),
    };
    let result = ctx
        .mutations
        .run(PostAddSubmitReq::PATH, ctx.api.posts().create(&payload))
        .await;

    match result {
        Ok(post) => {
            tracing::info!(slug = %post.slug, "post created");
            ctx.cache.invalidate_queries(&keys::all_posts());
            ctx.cache.set_query_data(&keys::post(&post.slug), post);
            store.set(PostAddForm::PATH, PostAddForm::default());
            ctx.notifier.success(store, POST_CREATED);
            navigate(ctx, store, POSTS_PATH).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "post create failed");
            store.update(PostAddForm::PATH, |f: &mut PostAddForm| f.busy = false);
            ctx.notifier.error(store, mutation_message(&e, POST_CREATE_FAILED));
        }
    }
}

/// Handle `tags/search`.
pub async fn handle_tags_search(req: &TagsSearchReq, store: &Arc<StateStore>, ctx: &AppContext) {
    search_tags(ctx, store, &req.query).await;
}

/// Look up tags matching `query` and offer them to whichever selector is open.
pub async fn search_tags(ctx: &AppContext, store: &Arc<StateStore>, query: &str) {
    let filters = TagsFilters {
        search: query.trim().to_string(),
        page_size: Some(LOOKUP_PAGE_SIZE),
    };
    let key = keys::tags(&filters);
    let (api, f) = (&ctx.api, &filters);
    match ctx
        .cache
        .fetch_query(&key, &ctx.queries(), move || async move { api.tags().list(f).await })
        .await
    {
        Ok(page) => {
            store.modify(PostAddForm::PATH, |f: &mut PostAddForm| {
                f.tag_options = page.results.clone()
            });
            store.modify(FiltersDialog::PATH, |d: &mut FiltersDialog| {
                d.tag_options = page.results.clone()
            });
        }
        Err(e) => {
            query_failed(&key, &e);
            ctx.notifier.error(store, SOMETHING_WENT_WRONG);
        }
    }
}

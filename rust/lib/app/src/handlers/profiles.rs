//! Profiles list with search, paging and follow buttons.

use std::sync::Arc;

use quill_client::{ListProfile, Paginated};
use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::helpers::query_failed;
use crate::keys;
use crate::request::*;
use crate::state::profiles::{DEFAULT_PROFILES_PAGE_SIZE, PROFILES_PAGE_SIZES};
use crate::state::{LoadStatus, ProfilesListPage};
use crate::strings::{no_longer_following, now_following, FOLLOW_FAILED, UNFOLLOW_FAILED};

/// Fetch the list for the committed filters. Same rules as the posts list.
pub async fn load_profiles(ctx: &AppContext, store: &Arc<StateStore>) {
    let filters = store
        .update(ProfilesListPage::PATH, |p: &mut ProfilesListPage| {
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
    let key = keys::profiles_list(&filters);
    let page_size = filters.page_size.unwrap_or(DEFAULT_PROFILES_PAGE_SIZE);

    if let Some(cached) = ctx.cache.get_query_data::<Paginated<ListProfile>>(&key) {
        store.modify(ProfilesListPage::PATH, |p: &mut ProfilesListPage| {
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
        .fetch_query(&key, &ctx.queries(), move || async move { api.profiles().list(f).await })
        .await;

    let status = match &result {
        Ok(_) => LoadStatus::Ready,
        Err(e) => query_failed(&key, e),
    };
    store.modify(ProfilesListPage::PATH, |p: &mut ProfilesListPage| {
        if p.filters != filters {
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

/// Background refetch of the committed list, once it has been visited.
pub fn revalidate_profiles(ctx: &AppContext, store: &StateStore) {
    let Some(page) = store.get_as::<ProfilesListPage>(ProfilesListPage::PATH) else {
        return;
    };
    let key = keys::profiles_list(&page.filters);
    let (api, filters) = (ctx.api.clone(), page.filters);
    let fetcher = move || {
        let (api, f) = (api.clone(), filters.clone());
        async move { api.profiles().list(&f).await }
    };
    if ctx.cache.spawn_refetch(key, ctx.queries(), fetcher).is_some() {
        tracing::debug!("profiles list revalidating");
    }
}

/// Handle `profiles/load`.
pub async fn handle_load(_req: &ProfilesLoadReq, store: &Arc<StateStore>, ctx: &AppContext) {
    load_profiles(ctx, store).await;
}

/// Handle `profiles/search-input`.
pub async fn handle_search_input(req: &ProfilesSearchInputReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.update(ProfilesListPage::PATH, |p: &mut ProfilesListPage| {
        p.search_input = req.value.clone()
    });
    if !ctx.debounce.settle(ProfilesSearchInputReq::PATH).await {
        return;
    }
    let mut changed = false;
    store.update(ProfilesListPage::PATH, |p: &mut ProfilesListPage| {
        let search = p.search_input.trim().to_string();
        changed = p.filters.search != search;
        if changed {
            p.filters.search = search;
            p.filters.page = Some(1);
        }
    });
    if changed {
        load_profiles(ctx, store).await;
    }
}

/// Handle `profiles/set-page-size`.
pub async fn handle_set_page_size(req: &ProfilesSetPageSizeReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if !PROFILES_PAGE_SIZES.contains(&req.page_size) {
        tracing::warn!(page_size = req.page_size, "unsupported profiles page size");
        return;
    }
    store.update(ProfilesListPage::PATH, |p: &mut ProfilesListPage| {
        p.filters.page_size = Some(req.page_size);
        p.filters.page = Some(1);
    });
    load_profiles(ctx, store).await;
}

/// Handle `profiles/set-page`.
pub async fn handle_set_page(req: &ProfilesSetPageReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if req.page == 0 {
        return;
    }
    store.update(ProfilesListPage::PATH, |p: &mut ProfilesListPage| {
        p.filters.page = Some(req.page)
    });
    load_profiles(ctx, store).await;
}

async fn set_following(ctx: &AppContext, store: &Arc<StateStore>, username: &str, follow: bool) {
    let profiles = ctx.api.profiles();
    let result = if follow {
        ctx.mutations.run(ProfilesFollowReq::PATH, profiles.follow(username)).await
    } else {
        ctx.mutations.run(ProfilesUnfollowReq::PATH, profiles.unfollow(username)).await
    };

    match result {
        Ok(resp) => {
            tracing::info!(username, following = resp.is_followed_by_you, "follow toggled");
            let message = if follow {
                now_following(username)
            } else {
                no_longer_following(username)
            };
            ctx.notifier.success(store, message);
            ctx.cache.invalidate_queries(&keys::profile(username));
            ctx.cache.invalidate_queries(&keys::all_profiles());
            load_profiles(ctx, store).await;
        }
        Err(e) => {
            tracing::warn!(username, follow, error = %e, "follow toggle failed");
            ctx.notifier
                .error(store, if follow { FOLLOW_FAILED } else { UNFOLLOW_FAILED });
        }
    }
}

/// Handle `profiles/follow`.
pub async fn handle_follow(req: &ProfilesFollowReq, store: &Arc<StateStore>, ctx: &AppContext) {
    set_following(ctx, store, &req.username, true).await;
}

/// Handle `profiles/unfollow`.
pub async fn handle_unfollow(req: &ProfilesUnfollowReq, store: &Arc<StateStore>, ctx: &AppContext) {
    set_following(ctx, store, &req.username, false).await;
}

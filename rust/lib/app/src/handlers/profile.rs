//! Profile detail with its follower, followed, posts and favourites lists.

use std::future::Future;
use std::sync::Arc;

use quill_client::{ApiError, ListPost, ListProfile, Paginated, PostsFilters, Profile, ProfilesFilters};
use quill_flux::StateStore;
use quill_query::QueryKey;

use crate::context::AppContext;
use crate::handlers::app::navigate;
use crate::handlers::helpers::{is_not_found, next_cursor, query_failed, viewer};
use crate::handlers::profiles;
use crate::keys;
use crate::request::*;
use crate::routing::PROFILES_PATH;
use crate::state::{InfiniteList, LoadStatus, ProfileDetailPage};
use crate::strings::{no_longer_following, now_following, PROFILE_NOT_FOUND, SOMETHING_WENT_WRONG};

/// Load the profile, then its lists. The lists wait for the profile.
pub async fn load_profile(ctx: &AppContext, store: &Arc<StateStore>, username: &str) {
    let path = ProfileDetailPage::path_for(username);
    let key = keys::profile(username);
    let is_self = viewer(store).is_some_and(|v| v == username);
    store.update(&path, |p: &mut ProfileDetailPage| {
        p.username = username.to_string();
        p.is_self = is_self;
        if p.profile.is_none() {
            p.status = LoadStatus::Loading;
        }
    });

    let api = &ctx.api;
    let result = ctx
        .cache
        .fetch_query(&key, &ctx.detail_queries(), move || async move {
            api.profiles().get(username).await
        })
        .await;

    match result {
        Ok(profile) => {
            store.modify(&path, |p: &mut ProfileDetailPage| {
                p.profile = Some((*profile).clone());
                p.status = LoadStatus::Ready;
            });
            tokio::join!(
                followers(ctx, store, username, false),
                followed(ctx, store, username, false),
                created_posts(ctx, store, username, false),
                async {
                    if is_self {
                        favourites(ctx, store, username, false).await;
                    }
                },
            );
        }
        Err(e) if is_not_found(&e) => {
            tracing::info!(username, "profile not found");
            store.remove(&path);
            ctx.notifier.error(store, PROFILE_NOT_FOUND);
            navigate(ctx, store, PROFILES_PATH).await;
        }
        Err(e) => {
            let status = query_failed(&key, &e);
            store.modify(&path, |p: &mut ProfileDetailPage| p.status = status);
        }
    }
}

/// Handle `profile/load`.
pub async fn handle_load(req: &ProfileLoadReq, store: &Arc<StateStore>, ctx: &AppContext) {
    load_profile(ctx, store, &req.username).await;
}

// ========================================================================
// Lists
// ========================================================================

/// Load a list from its first page, or append the next page with `more`.
async fn load_list<T, F, Fut>(
    ctx: &AppContext,
    store: &Arc<StateStore>,
    username: &str,
    key: QueryKey,
    more: bool,
    fetcher: F,
    slot: fn(&mut ProfileDetailPage) -> &mut InfiniteList<T>,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Paginated<T>, ApiError>>,
{
    let path = ProfileDetailPage::path_for(username);
    if !more {
        store.modify(&path, |p: &mut ProfileDetailPage| {
            let list = slot(p);
            if list.status != LoadStatus::Ready {
                list.status = LoadStatus::Loading;
            }
        });
    }

    let opts = ctx.queries();
    let result = if more {
        ctx.cache
            .fetch_next_page(&key, &opts, fetcher, next_cursor::<T>)
            .await
    } else {
        ctx.cache
            .fetch_infinite_query(&key, &opts, 1, fetcher, next_cursor::<T>)
            .await
            .map(Some)
    };

    match result {
        Ok(Some(data)) => {
            let list = InfiniteList::from_pages(&data);
            store.modify(&path, |p: &mut ProfileDetailPage| *slot(p) = list);
        }
        Ok(None) => {
            store.modify(&path, |p: &mut ProfileDetailPage| slot(p).loading_more = false);
        }
        Err(e) if more => {
            query_failed(&key, &e);
            store.modify(&path, |p: &mut ProfileDetailPage| slot(p).loading_more = false);
            ctx.notifier.error(store, SOMETHING_WENT_WRONG);
        }
        Err(e) => {
            let status = query_failed(&key, &e);
            store.modify(&path, |p: &mut ProfileDetailPage| {
                let list = slot(p);
                list.loading_more = false;
                list.status = status;
            });
        }
    }
}

fn followers_slot(p: &mut ProfileDetailPage) -> &mut InfiniteList<ListProfile> {
    &mut p.followers
}

fn followed_slot(p: &mut ProfileDetailPage) -> &mut InfiniteList<ListProfile> {
    &mut p.followed
}

fn posts_slot(p: &mut ProfileDetailPage) -> &mut InfiniteList<ListPost> {
    &mut p.posts
}

fn favourites_slot(p: &mut ProfileDetailPage) -> &mut InfiniteList<ListPost> {
    &mut p.favourites
}

fn page_filters(n: u32) -> ProfilesFilters {
    ProfilesFilters {
        page: Some(n),
        ..Default::default()
    }
}

async fn followers(ctx: &AppContext, store: &Arc<StateStore>, username: &str, more: bool) {
    let api = &ctx.api;
    let fetcher = move |n: u32| async move { api.profiles().followers(username, &page_filters(n)).await };
    load_list(ctx, store, username, keys::profile_followers(username), more, fetcher, followers_slot)
        .await;
}

async fn followed(ctx: &AppContext, store: &Arc<StateStore>, username: &str, more: bool) {
    let api = &ctx.api;
    let fetcher = move |n: u32| async move { api.profiles().followed(username, &page_filters(n)).await };
    load_list(ctx, store, username, keys::profile_followed(username), more, fetcher, followed_slot)
        .await;
}

async fn created_posts(ctx: &AppContext, store: &Arc<StateStore>, username: &str, more: bool) {
    let api = &ctx.api;
    let fetcher = move |n: u32| {
        let f = PostsFilters {
            page: Some(n),
            author_username: username.to_string(),
            ..Default::default()
        };
        async move { api.posts().list(&f).await }
    };
    load_list(ctx, store, username, keys::profile_posts(username), more, fetcher, posts_slot).await;
}

/// The server answers with the viewer's own favourites.
async fn favourites(ctx: &AppContext, store: &Arc<StateStore>, username: &str, more: bool) {
    let api = &ctx.api;
    let fetcher = move |n: u32| {
        let f = PostsFilters {
            page: Some(n),
            ..Default::default()
        };
        async move { api.posts().favourites(&f).await }
    };
    load_list(ctx, store, username, keys::profile_favourites(username), more, fetcher, favourites_slot)
        .await;
}

/// Handle `profile/followers-more`.
pub async fn handle_followers_more(req: &ProfileFollowersMoreReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.modify(&ProfileDetailPage::path_for(&req.username), |p: &mut ProfileDetailPage| {
        p.followers.loading_more = true
    });
    followers(ctx, store, &req.username, true).await;
}

/// Handle `profile/followed-more`.
pub async fn handle_followed_more(req: &ProfileFollowedMoreReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.modify(&ProfileDetailPage::path_for(&req.username), |p: &mut ProfileDetailPage| {
        p.followed.loading_more = true
    });
    followed(ctx, store, &req.username, true).await;
}

// ========================================================================
// Follow
// ========================================================================

async fn set_following(ctx: &AppContext, store: &Arc<StateStore>, username: &str, follow: bool) {
    let profiles = ctx.api.profiles();
    let result = if follow {
        ctx.mutations.run(ProfileFollowReq::PATH, profiles.follow(username)).await
    } else {
        ctx.mutations.run(ProfileUnfollowReq::PATH, profiles.unfollow(username)).await
    };

    let resp = match result {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(username, follow, error = %e, "follow toggle failed");
            ctx.notifier.error(store, SOMETHING_WENT_WRONG);
            return;
        }
    };

    let patch = |p: &mut Profile| {
        p.is_followed_by_you = resp.is_followed_by_you;
        p.followers_count = resp.followers_count;
    };
    let patched = ctx.cache.update_query_data(&keys::profile(username), patch);
    store.modify(&ProfileDetailPage::path_for(username), |page: &mut ProfileDetailPage| {
        if let Some(profile) = &patched {
            page.profile = Some((**profile).clone());
        } else if let Some(profile) = page.profile.as_mut() {
            patch(profile);
        }
    });
    ctx.cache.invalidate_queries(&keys::all_profiles());
    profiles::revalidate_profiles(ctx, store);

    let message = if follow {
        now_following(username)
    } else {
        no_longer_following(username)
    };
    ctx.notifier.success(store, message);
    followers(ctx, store, username, false).await;
}

/// Handle `profile/follow`.
pub async fn handle_follow(req: &ProfileFollowReq, store: &Arc<StateStore>, ctx: &AppContext) {
    set_following(ctx, store, &req.username, true).await;
}

/// Handle `profile/unfollow`.
pub async fn handle_unfollow(req: &ProfileUnfollowReq, store: &Arc<StateStore>, ctx: &AppContext) {
    set_following(ctx, store, &req.username, false).await;
}

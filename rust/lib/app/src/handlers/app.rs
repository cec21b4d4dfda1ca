//! Startup, navigation and notifications.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::{comments, feed, post, post_add, posts, profile, profiles};
use crate::notify;
use crate::request::*;
use crate::routing::{self, Resolution, Route, POSTS_PATH};
use crate::session::{derive_session, unix_now};
use crate::state::*;

/// Navigation is boxed: page loads can redirect, which navigates again.
pub type NavFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Redirect chains longer than this are a routing bug.
const MAX_REDIRECTS: usize = 4;

/// Handle `app/initialize`.
pub async fn handle_initialize(_req: &InitializeReq, store: &Arc<StateStore>, ctx: &AppContext) {
    if let Err(e) = ctx.tokens.reload() {
        tracing::warn!(error = %e, "could not read stored tokens");
    }
    let session = refresh_session(store, ctx);
    tracing::info!(signed_in = session.session.is_some(), "app initialized");
    store.set(Toasts::PATH, Toasts::default());
    navigate(ctx, store, POSTS_PATH).await;
}

/// Handle `app/navigate`.
pub async fn handle_navigate(req: &NavigateReq, store: &Arc<StateStore>, ctx: &AppContext) {
    navigate(ctx, store, &req.path).await;
}

/// Handle `app/toast-dismiss`.
pub async fn handle_toast_dismiss(req: &ToastDismissReq, store: &Arc<StateStore>, _ctx: &AppContext) {
    if !notify::dismiss(store, req.id) {
        tracing::debug!(id = req.id, "toast already gone");
    }
}

/// Re-derive the session and navbar from the stored token.
pub fn refresh_session(store: &StateStore, ctx: &AppContext) -> SessionState {
    let has_token = ctx.tokens.has_token();
    let session = derive_session(ctx.tokens.access().as_deref(), unix_now());
    store.set(Navbar::PATH, Navbar::for_session(session.as_ref()));
    store.update(SessionState::PATH, |s: &mut SessionState| {
        s.has_token = has_token;
        s.session = session;
    })
}

/// Resolve `path` through the auth gate, publish the route and load its data.
pub fn navigate<'a>(ctx: &'a AppContext, store: &'a Arc<StateStore>, path: &'a str) -> NavFuture<'a> {
    Box::pin(async move {
        let mut target = path.to_string();
        for _ in 0..MAX_REDIRECTS {
            match routing::resolve(&target, ctx.tokens.has_token()) {
                Resolution::Redirect(to) => {
                    tracing::debug!(from = %target, to = %to, "redirect");
                    target = to;
                }
                Resolution::Render(route) => {
                    let shown = match route {
                        Route::NotFound => target.clone(),
                        _ => route.path(),
                    };
                    tracing::debug!(path = %shown, "navigate");
                    store.set(
                        AppRoute::PATH,
                        AppRoute {
                            path: shown,
                            route: route.clone(),
                        },
                    );
                    load_route(ctx, store, &route).await;
                    return;
                }
            }
        }
        tracing::warn!(path, "too many redirects");
    })
}

async fn load_route(ctx: &AppContext, store: &Arc<StateStore>, route: &Route) {
    match route {
        Route::Login => store.set(LoginForm::PATH, LoginForm::default()),
        Route::Register => store.set(RegisterForm::PATH, RegisterForm::default()),
        Route::Posts => posts::load_posts(ctx, store).await,
        Route::PostsFeed => feed::load_feed(ctx, store).await,
        Route::PostsAdd => {
            if !store.contains(PostAddForm::PATH) {
                store.set(PostAddForm::PATH, PostAddForm::default());
            }
            post_add::search_tags(ctx, store, "").await;
        }
        Route::PostDetail { slug } => {
            if post::load_post(ctx, store, slug).await {
                comments::load_comments(ctx, store, slug).await;
            }
        }
        Route::Profiles => profiles::load_profiles(ctx, store).await,
        Route::ProfileDetail { username } => profile::load_profile(ctx, store, username).await,
        Route::NotFound => {}
    }
}

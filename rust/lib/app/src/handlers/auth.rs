//! Login, registration and logout. The only writers of the token store.

use std::sync::Arc;

use quill_client::{LoginPayload, RegisterPayload};
use quill_flux::StateStore;

use crate::context::AppContext;
use crate::handlers::app::{navigate, refresh_session};
use crate::handlers::helpers::mutation_message;
use crate::request::*;
use crate::routing::{LOGIN_PATH, POSTS_PATH};
use crate::state::*;
use crate::strings::{
    AUTH_FAILED, LOGGED_IN, REGISTERED, REGISTER_FAILED, SESSION_EXPIRED, SOMETHING_WENT_WRONG,
};

/// Path prefixes of page state that belongs to the signed-in viewer.
const USER_PAGES: [&str; 4] = ["posts", "post", "profiles", "profile"];

/// Handle `auth/login`.
pub async fn handle_login(req: &LoginReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.set(
        LoginForm::PATH,
        LoginForm {
            email: req.email.clone(),
            password: req.password.clone(),
            busy: true,
        },
    );

    let payload = LoginPayload {
        email: req.email.clone(),
        password: req.password.clone(),
    };
    let result = ctx
        .mutations
        .run(LoginReq::PATH, ctx.api.auth().login(&payload))
        .await;
    store.update(LoginForm::PATH, |f: &mut LoginForm| f.busy = false);

    let pair = match result {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            ctx.notifier.error(store, mutation_message(&e, AUTH_FAILED));
            return;
        }
    };
    if let Err(e) = ctx.tokens.set(&pair.access, &pair.refresh) {
        tracing::error!(error = %e, "could not persist tokens");
        ctx.notifier.error(store, SOMETHING_WENT_WRONG);
        return;
    }

    let session = refresh_session(store, ctx);
    tracing::info!(username = ?session.username(), "logged in");
    // Cached lists carry per-viewer flags.
    ctx.cache.clear();
    store.set(LoginForm::PATH, LoginForm::default());
    ctx.notifier.success(store, LOGGED_IN);
    navigate(ctx, store, POSTS_PATH).await;
}

/// Handle `auth/register`.
pub async fn handle_register(req: &RegisterReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.set(
        RegisterForm::PATH,
        RegisterForm {
            email: req.email.clone(),
            username: req.username.clone(),
            password1: req.password1.clone(),
            password2: req.password2.clone(),
            busy: true,
        },
    );

    let payload = RegisterPayload {
        email: req.email.clone(),
        username: req.username.clone(),
        password1: req.password1.clone(),
        password2: req.password2.clone(),
    };
    let result = ctx
        .mutations
        .run(RegisterReq::PATH, ctx.api.auth().register(&payload))
        .await;

    match result {
        Ok(()) => {
            tracing::info!(username = %req.username, "registered");
            store.set(RegisterForm::PATH, RegisterForm::default());
            ctx.notifier.success(store, REGISTERED);
            navigate(ctx, store, LOGIN_PATH).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "register failed");
            store.update(RegisterForm::PATH, |f: &mut RegisterForm| f.busy = false);
            ctx.notifier.error(store, mutation_message(&e, REGISTER_FAILED));
        }
    }
}

/// Handle `auth/logout`.
///
/// The server call is best-effort. Tokens and session are cleared before
/// the redirect no matter how it went.
pub async fn handle_logout(_req: &LogoutReq, store: &Arc<StateStore>, ctx: &AppContext) {
    store.update(SessionState::PATH, |s: &mut SessionState| s.busy = true);

    if let Some(refresh) = ctx.tokens.refresh() {
        if let Err(e) = ctx.api.auth().logout(&refresh).await {
            tracing::warn!(error = %e, "server logout failed");
        }
    }
    sign_out(ctx, store);
    navigate(ctx, store, LOGIN_PATH).await;
}

/// Handle `auth/refresh`.
///
/// A refresh token the server rejects ends the session locally.
pub async fn handle_refresh(_req: &RefreshReq, store: &Arc<StateStore>, ctx: &AppContext) {
    let Some(refresh) = ctx.tokens.refresh() else {
        tracing::debug!("no refresh token stored");
        return;
    };
    let result = ctx
        .mutations
        .run(RefreshReq::PATH, ctx.api.auth().refresh(&refresh))
        .await;

    match result {
        Ok(token) => {
            if let Err(e) = ctx.tokens.set_access(&token.access) {
                tracing::error!(error = %e, "could not persist access token");
                ctx.notifier.error(store, SOMETHING_WENT_WRONG);
                return;
            }
            let session = refresh_session(store, ctx);
            tracing::info!(username = ?session.username(), "access token refreshed");
        }
        Err(e) if e.is_unauthorized() => {
            tracing::info!(error = %e, "refresh token rejected");
            sign_out(ctx, store);
            ctx.notifier.error(store, SESSION_EXPIRED);
            navigate(ctx, store, LOGIN_PATH).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "token refresh failed");
            ctx.notifier.error(store, SOMETHING_WENT_WRONG);
        }
    }
}

/// Forget tokens, session, cached queries and the viewer's pages.
fn sign_out(ctx: &AppContext, store: &StateStore) {
    if let Err(e) = ctx.tokens.clear() {
        tracing::error!(error = %e, "could not clear stored tokens");
    }
    store.set(SessionState::PATH, SessionState::default());
    store.set(Navbar::PATH, Navbar::for_session(None));

    let dropped = ctx.cache.clear();
    for prefix in USER_PAGES {
        store.remove_prefix(prefix);
    }
    tracing::info!(queries = dropped.len(), "signed out");
}

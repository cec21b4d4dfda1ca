//! Request handlers and their registration with the Flux router.
//!
//! Every handler has the shape `handle_x(req, store, ctx)`. Handlers own
//! all writes to page state; renderers only read it.

pub mod app;
pub mod auth;
pub mod comments;
pub mod feed;
pub mod helpers;
pub mod post;
pub mod post_add;
pub mod posts;
pub mod profile;
pub mod profiles;

use std::sync::Arc;

use quill_flux::{Flux, StateStore};

use crate::context::AppContext;
use crate::request::*;

/// Register `$handler` for `$req`, downcasting the payload and lending it
/// the store and context.
macro_rules! route {
    ($flux:expr, $ctx:expr, $req:ty => $handler:path) => {{
        let ctx = Arc::clone($ctx);
        $flux.on_typed(<$req>::PATH, move |req: Arc<$req>, store: Arc<StateStore>| {
            let ctx = Arc::clone(&ctx);
            async move { $handler(&req, &store, &ctx).await }
        });
    }};
}

/// Register all handlers with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<AppContext>) {
    let ctx = &ctx;

    // app
    route!(flux, ctx, InitializeReq => app::handle_initialize);
    route!(flux, ctx, NavigateReq => app::handle_navigate);
    route!(flux, ctx, ToastDismissReq => app::handle_toast_dismiss);

    // auth
    route!(flux, ctx, LoginReq => auth::handle_login);
    route!(flux, ctx, RegisterReq => auth::handle_register);
    route!(flux, ctx, LogoutReq => auth::handle_logout);
    route!(flux, ctx, RefreshReq => auth::handle_refresh);

    // posts list + filter dialog
    route!(flux, ctx, PostsLoadReq => posts::handle_load);
    route!(flux, ctx, PostsSearchInputReq => posts::handle_search_input);
    route!(flux, ctx, PostsSetOrderingReq => posts::handle_set_ordering);
    route!(flux, ctx, PostsSetPageSizeReq => posts::handle_set_page_size);
    route!(flux, ctx, PostsSetPageReq => posts::handle_set_page);
    route!(flux, ctx, FiltersOpenReq => posts::handle_filters_open);
    route!(flux, ctx, FiltersEditReq => posts::handle_filters_edit);
    route!(flux, ctx, FiltersAuthorsReq => posts::handle_filters_authors);
    route!(flux, ctx, FiltersConfirmReq => posts::handle_filters_confirm);
    route!(flux, ctx, FiltersClearReq => posts::handle_filters_clear);
    route!(flux, ctx, FiltersCloseReq => posts::handle_filters_close);

    // feed
    route!(flux, ctx, FeedLoadReq => feed::handle_load);
    route!(flux, ctx, FeedSearchInputReq => feed::handle_search_input);
    route!(flux, ctx, FeedSetOrderingReq => feed::handle_set_ordering);
    route!(flux, ctx, FeedLoadMoreReq => feed::handle_load_more);

    // post detail
    route!(flux, ctx, PostLoadReq => post::handle_load);
    route!(flux, ctx, PostEditBeginReq => post::handle_edit_begin);
    route!(flux, ctx, PostEditInputReq => post::handle_edit_input);
    route!(flux, ctx, PostEditCancelReq => post::handle_edit_cancel);
    route!(flux, ctx, PostUpdateReq => post::handle_update);
    route!(flux, ctx, PostFavouriteReq => post::handle_favourite);
    route!(flux, ctx, PostUnfavouriteReq => post::handle_unfavourite);
    route!(flux, ctx, PostDeleteOpenReq => post::handle_delete_open);
    route!(flux, ctx, PostDeleteCloseReq => post::handle_delete_close);
    route!(flux, ctx, PostDeleteReq => post::handle_delete);

    // comments
    route!(flux, ctx, CommentsLoadReq => comments::handle_load);
    route!(flux, ctx, CommentsSetOrderingReq => comments::handle_set_ordering);
    route!(flux, ctx, CommentsLoadMoreReq => comments::handle_load_more);
    route!(flux, ctx, CommentsInputReq => comments::handle_input);
    route!(flux, ctx, CommentsClearReq => comments::handle_clear);
    route!(flux, ctx, CommentsSubmitReq => comments::handle_submit);
    route!(flux, ctx, CommentDeleteOpenReq => comments::handle_delete_open);
    route!(flux, ctx, CommentDeleteCloseReq => comments::handle_delete_close);
    route!(flux, ctx, CommentDeleteReq => comments::handle_delete);

    // new post
    route!(flux, ctx, PostAddUpdateReq => post_add::handle_update_field);
    route!(flux, ctx, PostAddSubmitReq => post_add::handle_submit);
    route!(flux, ctx, TagsSearchReq => post_add::handle_tags_search);

    // profiles list
    route!(flux, ctx, ProfilesLoadReq => profiles::handle_load);
    route!(flux, ctx, ProfilesSearchInputReq => profiles::handle_search_input);
    route!(flux, ctx, ProfilesSetPageSizeReq => profiles::handle_set_page_size);
    route!(flux, ctx, ProfilesSetPageReq => profiles::handle_set_page);
    route!(flux, ctx, ProfilesFollowReq => profiles::handle_follow);
    route!(flux, ctx, ProfilesUnfollowReq => profiles::handle_unfollow);

    // profile detail
    route!(flux, ctx, ProfileLoadReq => profile::handle_load);
    route!(flux, ctx, ProfileFollowReq => profile::handle_follow);
    route!(flux, ctx, ProfileUnfollowReq => profile::handle_unfollow);
    route!(flux, ctx, ProfileFollowersMoreReq => profile::handle_followers_more);
    route!(flux, ctx, ProfileFollowedMoreReq => profile::handle_followed_more);
}

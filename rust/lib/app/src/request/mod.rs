//! Request types, each emitted to a well-known path.

pub mod app;
pub mod auth;
pub mod post;
pub mod posts;
pub mod profiles;

pub use app::{InitializeReq, NavigateReq, ToastDismissReq};
pub use auth::{LoginReq, LogoutReq, RefreshReq, RegisterReq};
pub use post::{
    CommentDeleteCloseReq, CommentDeleteOpenReq, CommentDeleteReq, CommentsClearReq,
    CommentsInputReq, CommentsLoadMoreReq, CommentsLoadReq, CommentsSetOrderingReq,
    CommentsSubmitReq, PostDeleteCloseReq, PostDeleteOpenReq, PostDeleteReq, PostEditBeginReq,
    PostEditCancelReq, PostEditInputReq, PostFavouriteReq, PostLoadReq, PostUnfavouriteReq,
    PostUpdateReq,
};
pub use posts::{
    FeedLoadMoreReq, FeedLoadReq, FeedSearchInputReq, FeedSetOrderingReq, FiltersAuthorsReq,
    FiltersClearReq, FiltersCloseReq, FiltersConfirmReq, FiltersEditReq, FiltersOpenReq,
    PostAddSubmitReq, PostAddUpdateReq, PostsLoadReq, PostsSearchInputReq, PostsSetOrderingReq,
    PostsSetPageReq, PostsSetPageSizeReq, TagsSearchReq,
};
pub use profiles::{
    ProfileFollowReq, ProfileFollowedMoreReq, ProfileFollowersMoreReq, ProfileLoadReq,
    ProfileUnfollowReq, ProfilesFollowReq, ProfilesLoadReq, ProfilesSearchInputReq,
    ProfilesSetPageReq, ProfilesSetPageSizeReq, ProfilesUnfollowReq,
};

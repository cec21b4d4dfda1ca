//! Post detail and comments.

use quill_flux_derive::request;

#[request("post/load")]
pub struct PostLoadReq {
    pub slug: String,
}

#[request("post/edit-begin")]
pub struct PostEditBeginReq {
    pub slug: String,
}

#[request("post/edit-input")]
pub struct PostEditInputReq {
    pub slug: String,
    pub body: String,
}

#[request("post/edit-cancel")]
pub struct PostEditCancelReq {
    pub slug: String,
}

#[request("post/update")]
pub struct PostUpdateReq {
    pub slug: String,
    pub body: String,
}

#[request("post/favourite")]
pub struct PostFavouriteReq {
    pub slug: String,
}

#[request("post/unfavourite")]
pub struct PostUnfavouriteReq {
    pub slug: String,
}

#[request("post/delete-open")]
pub struct PostDeleteOpenReq {
    pub slug: String,
}

#[request("post/delete-close")]
pub struct PostDeleteCloseReq {
    pub slug: String,
}

#[request("post/delete")]
pub struct PostDeleteReq {
    pub slug: String,
}

#[request("comments/load")]
pub struct CommentsLoadReq {
    pub slug: String,
}

#[request("comments/set-ordering")]
pub struct CommentsSetOrderingReq {
    pub slug: String,
    pub ordering: String,
}

#[request("comments/load-more")]
pub struct CommentsLoadMoreReq {
    pub slug: String,
}

#[request("comments/input")]
pub struct CommentsInputReq {
    pub slug: String,
    pub value: String,
}

#[request("comments/clear")]
pub struct CommentsClearReq {
    pub slug: String,
}

#[request("comments/submit")]
pub struct CommentsSubmitReq {
    pub slug: String,
}

#[request("comments/delete-open")]
pub struct CommentDeleteOpenReq {
    pub slug: String,
    pub id: u64,
}

#[request("comments/delete-close")]
pub struct CommentDeleteCloseReq {
    pub slug: String,
}

#[request("comments/delete")]
pub struct CommentDeleteReq {
    pub slug: String,
    pub id: u64,
}

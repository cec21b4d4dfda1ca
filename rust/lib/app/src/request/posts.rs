//! Posts list, filter dialog, feed and post creation.

use quill_flux_derive::request;

use crate::state::{FilterField, PostAddField};

#[request("posts/load")]
pub struct PostsLoadReq;

/// Keystroke in the search box. Committed after the debounce delay.
#[request("posts/search-input")]
pub struct PostsSearchInputReq {
    pub value: String,
}

#[request("posts/set-ordering")]
pub struct PostsSetOrderingReq {
    pub ordering: String,
}

#[request("posts/set-page-size")]
pub struct PostsSetPageSizeReq {
    pub page_size: u32,
}

#[request("posts/set-page")]
pub struct PostsSetPageReq {
    pub page: u32,
}

#[request("posts/filters-open")]
pub struct FiltersOpenReq;

#[request("posts/filters-edit")]
pub struct FiltersEditReq {
    pub field: FilterField,
}

/// Author suggestions for the dialog.
#[request("posts/filters-authors")]
pub struct FiltersAuthorsReq {
    pub query: String,
}

#[request("posts/filters-confirm")]
pub struct FiltersConfirmReq;

/// Reset every filter, search and paging included.
#[request("posts/filters-clear")]
pub struct FiltersClearReq;

/// Close without applying.
#[request("posts/filters-close")]
pub struct FiltersCloseReq;

#[request("feed/load")]
pub struct FeedLoadReq;

#[request("feed/search-input")]
pub struct FeedSearchInputReq {
    pub value: String,
}

#[request("feed/set-ordering")]
pub struct FeedSetOrderingReq {
    pub ordering: String,
}

#[request("feed/load-more")]
pub struct FeedLoadMoreReq;

#[request("post-add/update-field")]
pub struct PostAddUpdateReq {
    pub field: PostAddField,
}

#[request("post-add/submit")]
pub struct PostAddSubmitReq;

/// Tag suggestions, shared by the new-post form and the filter dialog.
#[request("tags/search")]
pub struct TagsSearchReq {
    pub query: String,
}

//! Profiles list and profile detail.

use quill_flux_derive::request;

#[request("profiles/load")]
pub struct ProfilesLoadReq;

#[request("profiles/search-input")]
pub struct ProfilesSearchInputReq {
    pub value: String,
}

#[request("profiles/set-page-size")]
pub struct ProfilesSetPageSizeReq {
    pub page_size: u32,
}

#[request("profiles/set-page")]
pub struct ProfilesSetPageReq {
    pub page: u32,
}

/// Follow from the list; the list is refetched afterwards.
#[request("profiles/follow")]
pub struct ProfilesFollowReq {
    pub username: String,
}

#[request("profiles/unfollow")]
pub struct ProfilesUnfollowReq {
    pub username: String,
}

#[request("profile/load")]
pub struct ProfileLoadReq {
    pub username: String,
}

/// Follow from the detail page; the cached profile is patched.
#[request("profile/follow")]
pub struct ProfileFollowReq {
    pub username: String,
}

#[request("profile/unfollow")]
pub struct ProfileUnfollowReq {
    pub username: String,
}

#[request("profile/followers-more")]
pub struct ProfileFollowersMoreReq {
    pub username: String,
}

#[request("profile/followed-more")]
pub struct ProfileFollowedMoreReq {
    pub username: String,
}

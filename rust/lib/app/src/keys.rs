//! Query keys for every cached resource.
//!
//! Filters go into the key verbatim, so a filter change is a new entry.

use quill_client::{CommentsFilters, PostsFilters, ProfilesFilters, TagsFilters};
use quill_query::QueryKey;

pub fn posts_list(filters: &PostsFilters) -> QueryKey {
    QueryKey::new(["posts", "list"]).with_params(filters.to_query())
}

pub fn posts_feed(filters: &PostsFilters) -> QueryKey {
    QueryKey::new(["posts", "feed"]).with_params(filters.to_query())
}

pub fn post(slug: &str) -> QueryKey {
    QueryKey::new(["post", slug])
}

/// Page is excluded: pages are the cursor of the infinite query.
pub fn comments(slug: &str, filters: &CommentsFilters) -> QueryKey {
    let unpaged = CommentsFilters {
        page: None,
        ..filters.clone()
    };
    QueryKey::new(["post", slug, "comments"]).with_params(unpaged.to_query())
}

pub fn profiles_list(filters: &ProfilesFilters) -> QueryKey {
    QueryKey::new(["profiles", "list"]).with_params(filters.to_query())
}

pub fn profile(username: &str) -> QueryKey {
    QueryKey::new(["profile", username])
}

pub fn profile_followers(username: &str) -> QueryKey {
    QueryKey::new(["profile", username, "followers"])
}

pub fn profile_followed(username: &str) -> QueryKey {
    QueryKey::new(["profile", username, "followed"])
}

pub fn profile_posts(username: &str) -> QueryKey {
    QueryKey::new(["profile", username, "posts"])
}

pub fn profile_favourites(username: &str) -> QueryKey {
    QueryKey::new(["profile", username, "favourites"])
}

pub fn tags(filters: &TagsFilters) -> QueryKey {
    QueryKey::new(["tags"]).with_params(filters.to_query())
}

/// Author lookups for the filter dialog.
pub fn authors(filters: &ProfilesFilters) -> QueryKey {
    QueryKey::new(["authors"]).with_params(filters.to_query())
}

/// Every posts collection (list and feed).
pub fn all_posts() -> QueryKey {
    QueryKey::new(["posts"])
}

pub fn all_profiles() -> QueryKey {
    QueryKey::new(["profiles"])
}

/// Every profile detail query and its lists.
pub fn all_profile_pages() -> QueryKey {
    QueryKey::new(["profile"])
}

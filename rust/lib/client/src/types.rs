//! Wire types for the blog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Reference data ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    pub slug: String,
    #[serde(default)]
    pub color: String,
}

/// Author summary embedded in posts, comments and follower lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEmbedded {
    #[serde(default)]
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub image: Option<String>,
}

// ── Posts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub author: ProfileEmbedded,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub favourites_count: u64,
    #[serde(default)]
    pub is_favourited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post as it appears in list endpoints (no body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPost {
    #[serde(default)]
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub author: ProfileEmbedded,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub favourites_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCreatePayload {
    pub title: String,
    pub description: String,
    pub body: String,
    /// Tag display texts.
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostUpdatePayload {
    pub body: String,
}

/// Answer to favourite / unfavourite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavouriteResponse {
    pub favourites_count: u64,
}

// ── Comments ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub post: Option<String>,
    pub author: ProfileEmbedded,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub body: String,
}

// ── Profiles ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub followed_count: u64,
    #[serde(default)]
    pub posts_count: u64,
    #[serde(default)]
    pub favourites_count: u64,
    #[serde(default)]
    pub is_followed_by_you: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListProfile {
    #[serde(default)]
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_followed_by_you: bool,
}

/// Answer to follow / unfollow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowResponse {
    pub is_followed_by_you: bool,
    pub followers_count: u64,
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshPayload {
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub username: String,
    pub password1: String,
    pub password2: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_tolerates_missing_optional_fields() {
        let json = r#"{
            "slug": "hello",
            "title": "Hello",
            "author": {"username": "amy"},
            "created_at": "2024-01-02T03:04:05Z",
            "updated_at": "2024-01-02T03:04:05Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.author.username, "amy");
        assert!(post.tags.is_empty());
        assert!(!post.is_favourited);
        assert_eq!(post.favourites_count, 0);
    }

    #[test]
    fn create_payload_sends_tag_texts() {
        let payload = PostCreatePayload {
            title: "t".into(),
            description: "d".into(),
            body: "b".into(),
            tags: vec!["rust".into(), "web".into()],
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["tags"], serde_json::json!(["rust", "web"]));
    }
}

use reqwest::Method;

use crate::error::ApiError;
use crate::filters::{CommentsFilters, PostsFilters};
use crate::http::ApiClient;
use crate::pagination::Paginated;
use crate::types::{
    Comment, CommentPayload, FavouriteResponse, ListPost, Post, PostCreatePayload,
    PostUpdatePayload,
};

/// `/posts/*` endpoints, comments included.
pub struct PostsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PostsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &PostsFilters) -> Result<Paginated<ListPost>, ApiError> {
        self.client.get("posts", &filters.to_query()).await
    }

    /// Posts by profiles the current user follows.
    pub async fn feed(&self, filters: &PostsFilters) -> Result<Paginated<ListPost>, ApiError> {
        self.client.get("posts/feed", &filters.to_query()).await
    }

    /// The current user's favourites.
    pub async fn favourites(&self, filters: &PostsFilters) -> Result<Paginated<ListPost>, ApiError> {
        self.client.get("posts/favourites", &filters.to_query()).await
    }

    pub async fn get(&self, slug: &str) -> Result<Post, ApiError> {
        self.client.get(&format!("posts/{slug}"), &[]).await
    }

    pub async fn create(&self, payload: &PostCreatePayload) -> Result<Post, ApiError> {
        self.client.send_json(Method::POST, "posts", payload).await
    }

    pub async fn update(&self, slug: &str, payload: &PostUpdatePayload) -> Result<Post, ApiError> {
        self.client
            .send_json(Method::PATCH, &format!("posts/{slug}"), payload)
            .await
    }

    pub async fn delete(&self, slug: &str) -> Result<(), ApiError> {
        self.client
            .send_unit::<()>(Method::DELETE, &format!("posts/{slug}"), None)
            .await
    }

    pub async fn favourite(&self, slug: &str) -> Result<FavouriteResponse, ApiError> {
        self.client
            .post_empty(&format!("posts/{slug}/favourite"))
            .await
    }

    pub async fn unfavourite(&self, slug: &str) -> Result<FavouriteResponse, ApiError> {
        self.client
            .post_empty(&format!("posts/{slug}/unfavourite"))
            .await
    }

    pub async fn comments(
        &self,
        slug: &str,
        filters: &CommentsFilters,
    ) -> Result<Paginated<Comment>, ApiError> {
        self.client
            .get(&format!("posts/{slug}/comments"), &filters.to_query())
            .await
    }

    pub async fn add_comment(&self, slug: &str, body: &str) -> Result<Comment, ApiError> {
        let payload = CommentPayload {
            body: body.to_string(),
        };
        self.client
            .send_json(Method::POST, &format!("posts/{slug}/comments"), &payload)
            .await
    }

    pub async fn delete_comment(&self, slug: &str, id: u64) -> Result<(), ApiError> {
        self.client
            .send_unit::<()>(Method::DELETE, &format!("posts/{slug}/comments/{id}"), None)
            .await
    }
}

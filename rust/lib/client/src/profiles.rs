use crate::error::ApiError;
use crate::filters::ProfilesFilters;
use crate::http::ApiClient;
use crate::pagination::Paginated;
use crate::types::{FollowResponse, ListProfile, Profile};

/// `/profiles/*` endpoints.
pub struct ProfilesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProfilesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &ProfilesFilters) -> Result<Paginated<ListProfile>, ApiError> {
        self.client.get("profiles", &filters.to_query()).await
    }

    pub async fn get(&self, username: &str) -> Result<Profile, ApiError> {
        self.client.get(&format!("profiles/{username}"), &[]).await
    }

    pub async fn follow(&self, username: &str) -> Result<FollowResponse, ApiError> {
        self.client
            .post_empty(&format!("profiles/{username}/follow"))
            .await
    }

    pub async fn unfollow(&self, username: &str) -> Result<FollowResponse, ApiError> {
        self.client
            .post_empty(&format!("profiles/{username}/unfollow"))
            .await
    }

    pub async fn followers(
        &self,
        username: &str,
        filters: &ProfilesFilters,
    ) -> Result<Paginated<ListProfile>, ApiError> {
        self.client
            .get(&format!("profiles/{username}/followers"), &filters.to_query())
            .await
    }

    pub async fn followed(
        &self,
        username: &str,
        filters: &ProfilesFilters,
    ) -> Result<Paginated<ListProfile>, ApiError> {
        self.client
            .get(&format!("profiles/{username}/followed"), &filters.to_query())
            .await
    }
}

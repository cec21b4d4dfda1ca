use crate::error::ApiError;
use crate::filters::TagsFilters;
use crate::http::ApiClient;
use crate::pagination::Paginated;
use crate::types::Tag;

/// `/tags/` reference data.
pub struct TagsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TagsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &TagsFilters) -> Result<Paginated<Tag>, ApiError> {
        self.client.get("tags", &filters.to_query()).await
    }
}

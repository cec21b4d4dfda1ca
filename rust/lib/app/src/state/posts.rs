//! Posts list, filter dialog, feed and the new-post form.

use quill_client::{ListPost, Paginated, PostsFilters, Tag};
use quill_flux_derive::state;

use super::{InfiniteList, LoadStatus};

pub const DEFAULT_ORDERING: &str = "-created_at";
pub const POSTS_ORDERINGS: [&str; 4] = ["created_at", "-created_at", "updated_at", "-updated_at"];
pub const DEFAULT_POSTS_PAGE_SIZE: u32 = 10;
pub const POSTS_PAGE_SIZES: [u32; 5] = [10, 20, 50, 100, 1000];
pub const FEED_PAGE_SIZE: u32 = 10;
/// Page size for author / tag lookups in selectors.
pub const LOOKUP_PAGE_SIZE: u32 = 25;

/// Page 1, default page size and ordering, nothing else.
pub fn default_posts_filters() -> PostsFilters {
    PostsFilters {
        page: Some(1),
        page_size: Some(DEFAULT_POSTS_PAGE_SIZE),
        ordering: DEFAULT_ORDERING.to_string(),
        ..Default::default()
    }
}

#[state("posts/list")]
pub struct PostsListPage {
    /// Committed filters. These are what the list query is keyed on.
    pub filters: PostsFilters,
    /// Search box text; committed to `filters.search` after the debounce.
    pub search_input: String,
    pub data: Option<Paginated<ListPost>>,
    /// Filters `data` was fetched with. Data for other filters is never shown.
    pub data_filters: Option<PostsFilters>,
    pub status: LoadStatus,
    pub page_count: u64,
}

impl Default for PostsListPage {
    fn default() -> Self {
        Self {
            filters: default_posts_filters(),
            search_input: String::new(),
            data: None,
            data_filters: None,
            status: LoadStatus::Idle,
            page_count: 0,
        }
    }
}

/// Field filters edited in the dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredFilters {
    pub title: String,
    pub slug: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub created_at_gte: String,
    pub created_at_lte: String,
}

impl StructuredFilters {
    pub fn from_filters(f: &PostsFilters) -> Self {
        Self {
            title: f.title.clone(),
            slug: f.slug.clone(),
            authors: f.authors.clone(),
            tags: f.tags.clone(),
            created_at_gte: f.created_at_gte.clone(),
            created_at_lte: f.created_at_lte.clone(),
        }
    }

    pub fn apply_to(&self, f: &mut PostsFilters) {
        f.title = self.title.clone();
        f.slug = self.slug.clone();
        f.authors = self.authors.clone();
        f.tags = self.tags.clone();
        f.created_at_gte = self.created_at_gte.clone();
        f.created_at_lte = self.created_at_lte.clone();
    }
}

/// One edit inside the filter dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterField {
    Title(String),
    Slug(String),
    Authors(Vec<String>),
    Tags(Vec<String>),
    CreatedAfter(String),
    CreatedBefore(String),
}

impl FilterField {
    pub fn apply(&self, draft: &mut StructuredFilters) {
        match self {
            FilterField::Title(v) => draft.title = v.clone(),
            FilterField::Slug(v) => draft.slug = v.clone(),
            FilterField::Authors(v) => draft.authors = v.clone(),
            FilterField::Tags(v) => draft.tags = v.clone(),
            FilterField::CreatedAfter(v) => draft.created_at_gte = v.clone(),
            FilterField::CreatedBefore(v) => draft.created_at_lte = v.clone(),
        }
    }
}

/// Staged edits live here until confirmed.
#[state("posts/filters-dialog")]
#[derive(Default)]
pub struct FiltersDialog {
    pub open: bool,
    pub draft: StructuredFilters,
    pub author_options: Vec<String>,
    pub tag_options: Vec<Tag>,
}

#[state("posts/feed")]
pub struct PostsFeedPage {
    pub search_input: String,
    pub search: String,
    pub ordering: String,
    pub posts: InfiniteList<ListPost>,
    pub status: LoadStatus,
}

impl Default for PostsFeedPage {
    fn default() -> Self {
        Self {
            search_input: String::new(),
            search: String::new(),
            ordering: DEFAULT_ORDERING.to_string(),
            posts: InfiniteList::default(),
            status: LoadStatus::Idle,
        }
    }
}

impl PostsFeedPage {
    /// Feed filters without a page; pages come from the cursor.
    pub fn filters(&self) -> PostsFilters {
        PostsFilters {
            page_size: Some(FEED_PAGE_SIZE),
            ordering: self.ordering.clone(),
            search: self.search.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAddField {
    Title(String),
    Description(String),
    Body(String),
    Tags(Vec<String>),
}

#[state("posts/add")]
#[derive(Default)]
pub struct PostAddForm {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
    /// Selector suggestions from the last tag lookup.
    pub tag_options: Vec<Tag>,
    pub busy: bool,
}

impl PostAddForm {
    pub fn apply(&mut self, field: &PostAddField) {
        match field {
            PostAddField::Title(v) => self.title = v.clone(),
            PostAddField::Description(v) => self.description = v.clone(),
            PostAddField::Body(v) => self.body = v.clone(),
            PostAddField::Tags(v) => self.tags = v.clone(),
        }
    }
}

//! State types, each stored at a well-known path.
//!
//! Renderers read these and nothing else. Server data inside them is a
//! copy of what the query cache holds at the time of the last update.

pub mod app;
pub mod auth;
pub mod post;
pub mod posts;
pub mod profiles;

pub use app::{AppRoute, NavLink, Navbar, Toast, ToastKind, Toasts};
pub use auth::{LoginForm, RegisterForm, SessionState};
pub use post::{CommentSection, PostDetailPage};
pub use posts::{
    default_posts_filters, FilterField, FiltersDialog, PostAddField, PostAddForm, PostsFeedPage,
    PostsListPage, StructuredFilters,
};
pub use profiles::{default_profiles_filters, ProfileDetailPage, ProfilesListPage};

use quill_client::Paginated;
use quill_query::InfiniteData;

/// Progress of the query behind a piece of page state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Inline message shown in place of the data.
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// Flattened view of an infinite query.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteList<T> {
    pub items: Vec<T>,
    /// Server-side total from the first page.
    pub total: u64,
    pub has_next: bool,
    pub loading_more: bool,
    /// First-page load. Lists that live inside a page with its own status
    /// leave this alone.
    pub status: LoadStatus,
}

impl<T> Default for InfiniteList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            has_next: false,
            loading_more: false,
            status: LoadStatus::Idle,
        }
    }
}

impl<T: Clone> InfiniteList<T> {
    pub fn from_pages(data: &InfiniteData<Paginated<T>>) -> Self {
        Self {
            items: data
                .pages
                .iter()
                .flat_map(|p| p.results.iter().cloned())
                .collect(),
            total: data.pages.first().map_or(0, |p| p.count),
            has_next: data
                .last_page()
                .is_some_and(|p| p.next_page_param().is_some()),
            loading_more: false,
            status: LoadStatus::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32, next: Option<u32>) -> Paginated<u32> {
        Paginated {
            count: 5,
            next: next.map(|p| format!("http://h/api/x/?page={p}")),
            previous: None,
            results: vec![n * 10, n * 10 + 1],
        }
    }

    #[test]
    fn infinite_list_flattens_pages() {
        let data = InfiniteData {
            pages: vec![page(1, Some(2)), page(2, Some(3))],
            page_params: vec![1, 2],
        };
        let list = InfiniteList::from_pages(&data);
        assert_eq!(list.items, vec![10, 11, 20, 21]);
        assert_eq!(list.total, 5);
        assert!(list.has_next);
        assert_eq!(list.status, LoadStatus::Ready);

        let done = InfiniteData {
            pages: vec![page(3, None)],
            page_params: vec![3],
        };
        assert!(!InfiniteList::from_pages(&done).has_next);
    }
}

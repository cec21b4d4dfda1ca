//! Profiles list and profile detail.

use quill_client::{ListPost, ListProfile, Paginated, Profile, ProfilesFilters};
use quill_flux_derive::state;

use super::{InfiniteList, LoadStatus};

pub const DEFAULT_PROFILES_PAGE_SIZE: u32 = 20;
pub const PROFILES_PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

pub fn default_profiles_filters() -> ProfilesFilters {
    ProfilesFilters {
        page: Some(1),
        page_size: Some(DEFAULT_PROFILES_PAGE_SIZE),
        ..Default::default()
    }
}

#[state("profiles/list")]
pub struct ProfilesListPage {
    pub filters: ProfilesFilters,
    pub search_input: String,
    pub data: Option<Paginated<ListProfile>>,
    pub data_filters: Option<ProfilesFilters>,
    pub status: LoadStatus,
    pub page_count: u64,
}

impl Default for ProfilesListPage {
    fn default() -> Self {
        Self {
            filters: default_profiles_filters(),
            search_input: String::new(),
            data: None,
            data_filters: None,
            status: LoadStatus::Idle,
            page_count: 0,
        }
    }
}

#[state("profile/{username}")]
#[derive(Default)]
pub struct ProfileDetailPage {
    pub username: String,
    pub profile: Option<Profile>,
    pub status: LoadStatus,
    /// Viewing one's own profile: no follow button, favourites shown.
    pub is_self: bool,
    pub followers: InfiniteList<ListProfile>,
    pub followed: InfiniteList<ListProfile>,
    pub posts: InfiniteList<ListPost>,
    pub favourites: InfiniteList<ListPost>,
}

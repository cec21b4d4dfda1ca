//! Post detail page and its comment section.

use quill_client::{Comment, Post};
use quill_flux_derive::state;

use super::{InfiniteList, LoadStatus};

pub const COMMENTS_PAGE_SIZE: u32 = 10;
pub const COMMENTS_ORDERINGS: [&str; 2] = ["-created_at", "created_at"];

#[state("post/{slug}")]
#[derive(Default)]
pub struct PostDetailPage {
    pub slug: String,
    pub post: Option<Post>,
    pub status: LoadStatus,
    /// Viewer wrote this post: edit and delete are offered.
    pub is_author: bool,
    pub editing: bool,
    pub draft: String,
    pub delete_open: bool,
}

#[state("post/{slug}/comments")]
pub struct CommentSection {
    pub slug: String,
    pub ordering: String,
    pub input: String,
    pub comments: InfiniteList<Comment>,
    pub status: LoadStatus,
    /// Submit is disabled for a short while after a successful comment.
    pub locked: bool,
    /// Comment awaiting delete confirmation.
    pub delete_target: Option<u64>,
}

impl Default for CommentSection {
    fn default() -> Self {
        Self {
            slug: String::new(),
            ordering: COMMENTS_ORDERINGS[0].to_string(),
            input: String::new(),
            comments: InfiniteList::default(),
            status: LoadStatus::Idle,
            locked: false,
            delete_target: None,
        }
    }
}

impl CommentSection {
    pub fn for_post(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            ..Default::default()
        }
    }

    /// Only a comment's author may delete it.
    pub fn can_delete(&self, comment_id: u64, viewer: Option<&str>) -> bool {
        viewer.is_some_and(|v| {
            self.comments
                .items
                .iter()
                .any(|c| c.id == comment_id && c.author.username == v)
        })
    }
}

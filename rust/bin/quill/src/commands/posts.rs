//! Posts list, feed and tag lookup.

use anyhow::Result;
use quill_app::request::*;
use quill_app::routing::POSTS_PATH;
use quill_app::state::{FilterField, FiltersDialog, LoadStatus, PostsFeedPage, PostsListPage};
use quill_client::ListPost;
use serde_json::json;

use super::Shell;
use crate::output;

/// Flags of `quill posts`.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl ListQuery {
    fn structured(&self) -> Vec<FilterField> {
        let mut fields = Vec::new();
        if let Some(t) = &self.title {
            fields.push(FilterField::Title(t.clone()));
        }
        if !self.authors.is_empty() {
            fields.push(FilterField::Authors(self.authors.clone()));
        }
        if !self.tags.is_empty() {
            fields.push(FilterField::Tags(self.tags.clone()));
        }
        if let Some(d) = &self.after {
            fields.push(FilterField::CreatedAfter(d.clone()));
        }
        if let Some(d) = &self.before {
            fields.push(FilterField::CreatedBefore(d.clone()));
        }
        fields
    }
}

pub async fn list(shell: &Shell, query: ListQuery) -> Result<()> {
    shell.navigate(POSTS_PATH).await?;

    if let Some(ordering) = &query.ordering {
        shell
            .emit(PostsSetOrderingReq::PATH, PostsSetOrderingReq { ordering: ordering.clone() })
            .await?;
    }
    if let Some(page_size) = query.page_size {
        shell
            .emit(PostsSetPageSizeReq::PATH, PostsSetPageSizeReq { page_size })
            .await?;
    }
    let fields = query.structured();
    if !fields.is_empty() {
        shell.emit(FiltersOpenReq::PATH, FiltersOpenReq).await?;
        for field in fields {
            shell.emit(FiltersEditReq::PATH, FiltersEditReq { field }).await?;
        }
        shell.emit(FiltersConfirmReq::PATH, FiltersConfirmReq).await?;
    }
    if let Some(search) = &query.search {
        shell
            .emit(PostsSearchInputReq::PATH, PostsSearchInputReq { value: search.clone() })
            .await?;
    }
    // Last: every other filter change goes back to page 1.
    if let Some(page) = query.page {
        shell.emit(PostsSetPageReq::PATH, PostsSetPageReq { page }).await?;
    }

    let page: PostsListPage = shell.state(PostsListPage::PATH);
    if let LoadStatus::Failed(message) = &page.status {
        anyhow::bail!("{message}");
    }
    let Some(data) = page.data else {
        anyhow::bail!("No posts loaded.");
    };
    if shell.json {
        return output::json(&serde_json::to_value(&data)?);
    }
    print_posts(&data.results);
    output::page_footer(page.filters.page.unwrap_or(1), page.page_count, data.count);
    Ok(())
}

pub async fn feed(
    shell: &Shell,
    search: Option<String>,
    ordering: Option<String>,
    pages: u32,
) -> Result<()> {
    shell.require_login()?;
    shell.navigate("/posts/feed").await?;
    if let Some(ordering) = ordering {
        shell
            .emit(FeedSetOrderingReq::PATH, FeedSetOrderingReq { ordering })
            .await?;
    }
    if let Some(value) = search {
        shell
            .emit(FeedSearchInputReq::PATH, FeedSearchInputReq { value })
            .await?;
    }
    for _ in 1..pages {
        let feed: PostsFeedPage = shell.state(PostsFeedPage::PATH);
        if !feed.posts.has_next {
            break;
        }
        shell.emit(FeedLoadMoreReq::PATH, FeedLoadMoreReq).await?;
    }

    let feed: PostsFeedPage = shell.state(PostsFeedPage::PATH);
    if let LoadStatus::Failed(message) = &feed.status {
        anyhow::bail!("{message}");
    }
    if shell.json {
        return output::json(&json!({
            "count": feed.posts.total,
            "has_next": feed.posts.has_next,
            "results": feed.posts.items,
        }));
    }
    print_posts(&feed.posts.items);
    let more = if feed.posts.has_next { ", more available" } else { "" };
    println!("{} of {} posts{more}", feed.posts.items.len(), feed.posts.total);
    Ok(())
}

pub async fn tags(shell: &Shell, query: &str) -> Result<()> {
    shell.emit(FiltersOpenReq::PATH, FiltersOpenReq).await?;
    if !query.trim().is_empty() {
        shell
            .emit(TagsSearchReq::PATH, TagsSearchReq { query: query.to_string() })
            .await?;
    }
    let dialog: FiltersDialog = shell.state(FiltersDialog::PATH);
    shell.emit(FiltersCloseReq::PATH, FiltersCloseReq).await?;

    if shell.json {
        return output::json(&serde_json::to_value(&dialog.tag_options)?);
    }
    let rows: Vec<Vec<String>> = dialog
        .tag_options
        .iter()
        .map(|t| vec![t.tag.clone(), t.slug.clone()])
        .collect();
    output::table(&["tag", "slug"], &rows);
    Ok(())
}

pub(crate) fn print_posts(posts: &[ListPost]) {
    let rows: Vec<Vec<String>> = posts
        .iter()
        .map(|p| {
            vec![
                p.slug.clone(),
                p.title.clone(),
                p.author.username.clone(),
                output::tags(&p.tags),
                p.favourites_count.to_string(),
                output::date(&p.created_at),
            ]
        })
        .collect();
    output::table(&["slug", "title", "author", "tags", "favs", "created"], &rows);
}

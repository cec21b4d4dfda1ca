//! Single post: show, create, edit, delete, favourite, comments.

use anyhow::Result;
use quill_app::request::*;
use quill_app::state::{CommentSection, LoadStatus, PostAddField, PostDetailPage};
use quill_app::Route;
use quill_client::Post;
use serde_json::json;

use super::Shell;
use crate::output;

/// Open the post page; the 404 toast fails the command.
async fn open(shell: &Shell, slug: &str) -> Result<PostDetailPage> {
    let route = shell.navigate(&format!("/posts/{slug}")).await?;
    if !matches!(route, Route::PostDetail { .. }) {
        anyhow::bail!("Post {slug} is not available.");
    }
    let page: PostDetailPage = shell.state(&PostDetailPage::path_for(slug));
    if let LoadStatus::Failed(message) = &page.status {
        anyhow::bail!("{message}");
    }
    Ok(page)
}

fn loaded(page: PostDetailPage) -> Result<Post> {
    page.post
        .ok_or_else(|| anyhow::anyhow!("Post {} did not load.", page.slug))
}

pub async fn show(shell: &Shell, slug: &str, oldest: bool) -> Result<()> {
    let post = loaded(open(shell, slug).await?)?;
    if oldest {
        shell
            .emit(
                CommentsSetOrderingReq::PATH,
                CommentsSetOrderingReq {
                    slug: slug.to_string(),
                    ordering: "created_at".into(),
                },
            )
            .await?;
    }
    let comments: CommentSection = shell.state(&CommentSection::path_for(slug));

    if shell.json {
        return output::json(&json!({
            "post": post,
            "comments": comments.comments.items,
        }));
    }
    println!("{}", post.title);
    println!(
        "by {} on {} | tags: {} | favourites: {}{}",
        post.author.username,
        output::date(&post.created_at),
        output::tags(&post.tags),
        post.favourites_count,
        if post.is_favourited { " (yours)" } else { "" },
    );
    if !post.description.is_empty() {
        println!("\n{}", post.description);
    }
    println!("\n{}\n", post.body);

    let rows: Vec<Vec<String>> = comments
        .comments
        .items
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.author.username.clone(),
                output::date(&c.created_at),
                c.body.clone(),
            ]
        })
        .collect();
    output::table(&["id", "author", "created", "comment"], &rows);
    if comments.comments.has_next {
        println!(
            "{} of {} comments shown",
            comments.comments.items.len(),
            comments.comments.total
        );
    }
    Ok(())
}

pub async fn create(
    shell: &Shell,
    title: String,
    description: String,
    body: String,
    tags: Vec<String>,
) -> Result<()> {
    shell.require_login()?;
    shell.navigate("/posts/add").await?;
    for field in [
        PostAddField::Title(title),
        PostAddField::Description(description),
        PostAddField::Body(body),
        PostAddField::Tags(tags),
    ] {
        shell
            .emit(PostAddUpdateReq::PATH, PostAddUpdateReq { field })
            .await?;
    }
    shell.emit(PostAddSubmitReq::PATH, PostAddSubmitReq).await
}

pub async fn edit(shell: &Shell, slug: &str, body: String) -> Result<()> {
    shell.require_login()?;
    open(shell, slug).await?;
    let slug = slug.to_string();
    shell
        .emit(PostEditBeginReq::PATH, PostEditBeginReq { slug: slug.clone() })
        .await?;
    let page: PostDetailPage = shell.state(&PostDetailPage::path_for(&slug));
    if !page.editing {
        anyhow::bail!("Only the author can edit this post.");
    }
    shell
        .emit(
            PostEditInputReq::PATH,
            PostEditInputReq {
                slug: slug.clone(),
                body: body.clone(),
            },
        )
        .await?;
    shell
        .emit(PostUpdateReq::PATH, PostUpdateReq { slug, body })
        .await
}

pub async fn delete(shell: &Shell, slug: &str) -> Result<()> {
    shell.require_login()?;
    open(shell, slug).await?;
    let slug = slug.to_string();
    shell
        .emit(PostDeleteOpenReq::PATH, PostDeleteOpenReq { slug: slug.clone() })
        .await?;
    let page: PostDetailPage = shell.state(&PostDetailPage::path_for(&slug));
    if !page.delete_open {
        anyhow::bail!("Only the author can delete this post.");
    }
    shell.emit(PostDeleteReq::PATH, PostDeleteReq { slug }).await
}

pub async fn favourite(shell: &Shell, slug: &str, on: bool) -> Result<()> {
    shell.require_login()?;
    open(shell, slug).await?;
    let slug = slug.to_string();
    if on {
        shell
            .emit(PostFavouriteReq::PATH, PostFavouriteReq { slug: slug.clone() })
            .await?;
    } else {
        shell
            .emit(PostUnfavouriteReq::PATH, PostUnfavouriteReq { slug: slug.clone() })
            .await?;
    }
    let post = loaded(shell.state(&PostDetailPage::path_for(&slug)))?;
    println!("{} now has {} favourites.", post.slug, post.favourites_count);
    Ok(())
}

pub async fn comment(shell: &Shell, slug: &str, body: String) -> Result<()> {
    shell.require_login()?;
    open(shell, slug).await?;
    let slug = slug.to_string();
    shell
        .emit(
            CommentsInputReq::PATH,
            CommentsInputReq {
                slug: slug.clone(),
                value: body,
            },
        )
        .await?;
    shell
        .emit(CommentsSubmitReq::PATH, CommentsSubmitReq { slug: slug.clone() })
        .await?;
    let section: CommentSection = shell.state(&CommentSection::path_for(&slug));
    if !section.input.is_empty() {
        anyhow::bail!("Comment was not sent.");
    }
    Ok(())
}

pub async fn delete_comment(shell: &Shell, slug: &str, id: u64) -> Result<()> {
    shell.require_login()?;
    open(shell, slug).await?;
    let slug = slug.to_string();
    let path = CommentSection::path_for(&slug);

    // The comment may sit on a later page.
    loop {
        let section: CommentSection = shell.state(&path);
        if section.comments.items.iter().any(|c| c.id == id) || !section.comments.has_next {
            break;
        }
        shell
            .emit(CommentsLoadMoreReq::PATH, CommentsLoadMoreReq { slug: slug.clone() })
            .await?;
    }

    shell
        .emit(
            CommentDeleteOpenReq::PATH,
            CommentDeleteOpenReq {
                slug: slug.clone(),
                id,
            },
        )
        .await?;
    let section: CommentSection = shell.state(&path);
    if section.delete_target != Some(id) {
        anyhow::bail!("Comment {id} is not yours to delete.");
    }
    shell
        .emit(CommentDeleteReq::PATH, CommentDeleteReq { slug, id })
        .await
}

//! Profiles list, profile detail, follow.

use anyhow::Result;
use quill_app::request::*;
use quill_app::routing::PROFILES_PATH;
use quill_app::state::{InfiniteList, LoadStatus, ProfileDetailPage, ProfilesListPage};
use quill_app::Route;
use quill_client::ListProfile;
use serde_json::json;

use super::posts::print_posts;
use super::Shell;
use crate::output;

pub async fn list(
    shell: &Shell,
    search: Option<String>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<()> {
    shell.navigate(PROFILES_PATH).await?;
    if let Some(page_size) = page_size {
        shell
            .emit(ProfilesSetPageSizeReq::PATH, ProfilesSetPageSizeReq { page_size })
            .await?;
    }
    if let Some(value) = search {
        shell
            .emit(ProfilesSearchInputReq::PATH, ProfilesSearchInputReq { value })
            .await?;
    }
    if let Some(page) = page {
        shell
            .emit(ProfilesSetPageReq::PATH, ProfilesSetPageReq { page })
            .await?;
    }

    let state: ProfilesListPage = shell.state(ProfilesListPage::PATH);
    if let LoadStatus::Failed(message) = &state.status {
        anyhow::bail!("{message}");
    }
    let Some(data) = state.data else {
        anyhow::bail!("No profiles loaded.");
    };
    if shell.json {
        return output::json(&serde_json::to_value(&data)?);
    }
    print_profiles(&data.results);
    output::page_footer(state.filters.page.unwrap_or(1), state.page_count, data.count);
    Ok(())
}

async fn open(shell: &Shell, username: &str) -> Result<ProfileDetailPage> {
    let route = shell.navigate(&format!("/profiles/{username}")).await?;
    if !matches!(route, Route::ProfileDetail { .. }) {
        anyhow::bail!("Profile {username} is not available.");
    }
    let page: ProfileDetailPage = shell.state(&ProfileDetailPage::path_for(username));
    if let LoadStatus::Failed(message) = &page.status {
        anyhow::bail!("{message}");
    }
    Ok(page)
}

pub async fn show(shell: &Shell, username: &str) -> Result<()> {
    let page = open(shell, username).await?;
    let Some(profile) = &page.profile else {
        anyhow::bail!("Profile {username} did not load.");
    };

    if shell.json {
        return output::json(&json!({
            "profile": profile,
            "followers": page.followers.items,
            "followed": page.followed.items,
            "posts": page.posts.items,
            "favourites": page.favourites.items,
        }));
    }
    println!("{}", profile.username);
    if !profile.bio.is_empty() {
        println!("{}", profile.bio);
    }
    println!(
        "followers: {} | following: {} | posts: {} | favourites: {}",
        profile.followers_count, profile.followed_count, profile.posts_count, profile.favourites_count
    );
    if !page.is_self {
        let state = if profile.is_followed_by_you { "yes" } else { "no" };
        println!("followed by you: {state}");
    }

    println!("\nFollowers");
    print_list(&page.followers, print_profiles);
    println!("\nFollowing");
    print_list(&page.followed, print_profiles);
    println!("\nPosts");
    print_list(&page.posts, print_posts);
    if page.is_self {
        println!("\nFavourites");
        print_list(&page.favourites, print_posts);
    }
    Ok(())
}

/// A list that failed to load prints its message instead of an empty table.
fn print_list<T>(list: &InfiniteList<T>, print: fn(&[T])) {
    match &list.status {
        LoadStatus::Failed(message) => println!("({message})"),
        _ => print(&list.items),
    }
}

pub async fn follow(shell: &Shell, username: &str, on: bool) -> Result<()> {
    shell.require_login()?;
    let page = open(shell, username).await?;
    if page.is_self {
        anyhow::bail!("You cannot follow yourself.");
    }
    let username = username.to_string();
    if on {
        shell
            .emit(ProfileFollowReq::PATH, ProfileFollowReq { username })
            .await
    } else {
        shell
            .emit(ProfileUnfollowReq::PATH, ProfileUnfollowReq { username })
            .await
    }
}

fn print_profiles(profiles: &[ListProfile]) {
    let rows: Vec<Vec<String>> = profiles
        .iter()
        .map(|p| {
            vec![
                p.username.clone(),
                p.bio.clone(),
                if p.is_followed_by_you { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    output::table(&["username", "bio", "following"], &rows);
}

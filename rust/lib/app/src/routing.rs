//! URL path → page, with the authentication gate.
//!
//! Trailing slashes are ignored and static segments win over parameters,
//! so `/posts/feed` is the feed page, never a post with slug `feed`.

pub const LOGIN_PATH: &str = "/auth/login";
pub const POSTS_PATH: &str = "/posts";
pub const PROFILES_PATH: &str = "/profiles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Posts,
    PostsFeed,
    PostsAdd,
    PostDetail { slug: String },
    Profiles,
    ProfileDetail { username: String },
    NotFound,
}

impl Route {
    /// Canonical path for this page.
    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/auth/register".to_string(),
            Route::Posts => POSTS_PATH.to_string(),
            Route::PostsFeed => "/posts/feed".to_string(),
            Route::PostsAdd => "/posts/add".to_string(),
            Route::PostDetail { slug } => format!("/posts/{slug}"),
            Route::Profiles => PROFILES_PATH.to_string(),
            Route::ProfileDetail { username } => format!("/profiles/{username}"),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Pages that need a token.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::PostsFeed | Route::PostsAdd)
    }
}

/// What the router does with a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(String),
}

/// Match `path` against the route table.
pub fn match_path(path: &str) -> Option<Route> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let route = match segments.as_slice() {
        ["auth", "login"] => Route::Login,
        ["auth", "register"] => Route::Register,
        ["posts"] => Route::Posts,
        ["posts", "feed"] => Route::PostsFeed,
        ["posts", "add"] => Route::PostsAdd,
        ["posts", slug] => Route::PostDetail {
            slug: (*slug).to_string(),
        },
        ["profiles"] => Route::Profiles,
        ["profiles", username] => Route::ProfileDetail {
            username: (*username).to_string(),
        },
        _ => return None,
    };
    Some(route)
}

/// Resolve `path` for a viewer who does (or does not) hold a token.
///
/// `/` redirects to the posts list. Protected pages redirect to login
/// without a token. Unknown paths render the 404 page.
pub fn resolve(path: &str, has_token: bool) -> Resolution {
    if path.trim_matches('/').is_empty() {
        return Resolution::Redirect(POSTS_PATH.to_string());
    }
    match match_path(path) {
        Some(route) if route.is_protected() && !has_token => {
            Resolution::Redirect(LOGIN_PATH.to_string())
        }
        Some(route) => Resolution::Render(route),
        None => Resolution::Render(Route::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_segments_win() {
        assert_eq!(match_path("/posts/feed"), Some(Route::PostsFeed));
        assert_eq!(match_path("/posts/add/"), Some(Route::PostsAdd));
        assert_eq!(
            match_path("/posts/hello-world"),
            Some(Route::PostDetail {
                slug: "hello-world".into()
            })
        );
    }

    #[test]
    fn trailing_slashes_and_query_are_ignored() {
        assert_eq!(match_path("/posts/"), Some(Route::Posts));
        assert_eq!(match_path("/profiles/amy/?tab=followers"), Some(Route::ProfileDetail {
            username: "amy".into()
        }));
    }

    #[test]
    fn root_redirects_to_posts() {
        assert_eq!(resolve("/", false), Resolution::Redirect("/posts".into()));
        assert_eq!(resolve("", true), Resolution::Redirect("/posts".into()));
    }

    #[test]
    fn gate_redirects_without_token() {
        assert_eq!(resolve("/posts/feed/", false), Resolution::Redirect("/auth/login".into()));
        assert_eq!(resolve("/posts/add", false), Resolution::Redirect("/auth/login".into()));
        assert_eq!(resolve("/posts/add", true), Resolution::Render(Route::PostsAdd));
        // Public pages stay public.
        assert_eq!(resolve("/profiles", false), Resolution::Render(Route::Profiles));
    }

    #[test]
    fn unknown_paths_render_404() {
        assert_eq!(resolve("/nope", true), Resolution::Render(Route::NotFound));
        assert_eq!(resolve("/posts/a/b", true), Resolution::Render(Route::NotFound));
    }

    #[test]
    fn canonical_paths_round_trip() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Posts,
            Route::PostsFeed,
            Route::PostsAdd,
            Route::PostDetail { slug: "s".into() },
            Route::Profiles,
            Route::ProfileDetail { username: "u".into() },
        ] {
            assert_eq!(match_path(&route.path()), Some(route));
        }
    }
}

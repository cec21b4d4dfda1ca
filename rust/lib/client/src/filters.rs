//! Typed query-parameter sets for list endpoints.
//!
//! Each filter renders to sorted `(name, value)` pairs with empty values
//! dropped. The same pairs go on the wire and into cache keys.

use crate::http::QueryPairs;

fn push(out: &mut QueryPairs, name: &str, value: impl ToString) {
    let value = value.to_string();
    if !value.is_empty() {
        out.push((name.to_string(), value));
    }
}

fn push_opt<T: ToString>(out: &mut QueryPairs, name: &str, value: Option<T>) {
    if let Some(value) = value {
        push(out, name, value);
    }
}

fn finish(mut out: QueryPairs) -> QueryPairs {
    out.sort();
    out
}

/// `GET /posts/`, `GET /posts/feed/`, `GET /posts/favourites/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsFilters {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub ordering: String,
    pub search: String,
    pub title: String,
    pub slug: String,
    /// Usernames, sent comma-joined as a substring match.
    pub authors: Vec<String>,
    /// Tag texts, sent comma-joined as a substring match.
    pub tags: Vec<String>,
    pub created_at_gte: String,
    pub created_at_lte: String,
    /// Exact author match, used by profile pages.
    pub author_username: String,
}

impl PostsFilters {
    pub fn to_query(&self) -> QueryPairs {
        let mut out = Vec::new();
        push_opt(&mut out, "page", self.page);
        push_opt(&mut out, "page_size", self.page_size);
        push(&mut out, "ordering", &self.ordering);
        push(&mut out, "search", &self.search);
        push(&mut out, "title__icontains", &self.title);
        push(&mut out, "slug__icontains", &self.slug);
        push(&mut out, "author__user__username__icontains", self.authors.join(","));
        push(&mut out, "tags__tag__icontains", self.tags.join(","));
        push(&mut out, "created_at__gte", &self.created_at_gte);
        push(&mut out, "created_at__lte", &self.created_at_lte);
        push(&mut out, "author__user__username", &self.author_username);
        finish(out)
    }

    /// Whether any structured (dialog) filter is set.
    pub fn has_structured(&self) -> bool {
        !(self.title.is_empty()
            && self.slug.is_empty()
            && self.authors.is_empty()
            && self.tags.is_empty()
            && self.created_at_gte.is_empty()
            && self.created_at_lte.is_empty())
    }
}

/// `GET /profiles/` and the follower lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilesFilters {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Substring match on the username.
    pub search: String,
    /// Sent as the plain `username` lookup used by author selectors.
    pub username: String,
}

impl ProfilesFilters {
    pub fn to_query(&self) -> QueryPairs {
        let mut out = Vec::new();
        push_opt(&mut out, "page", self.page);
        push_opt(&mut out, "page_size", self.page_size);
        push(&mut out, "username", &self.username);
        push(&mut out, "username__icontains", &self.search);
        finish(out)
    }
}

/// `GET /posts/{slug}/comments/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentsFilters {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub ordering: String,
}

impl CommentsFilters {
    pub fn to_query(&self) -> QueryPairs {
        let mut out = Vec::new();
        push_opt(&mut out, "page", self.page);
        push_opt(&mut out, "page_size", self.page_size);
        push(&mut out, "ordering", &self.ordering);
        finish(out)
    }
}

/// `GET /tags/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsFilters {
    pub search: String,
    pub page_size: Option<u32>,
}

impl TagsFilters {
    pub fn to_query(&self) -> QueryPairs {
        let mut out = Vec::new();
        push(&mut out, "tag__icontains", &self.search);
        push_opt(&mut out, "page_size", self.page_size);
        finish(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(q: &QueryPairs) -> Vec<(&str, &str)> {
        q.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn empty_posts_filters_render_nothing() {
        assert!(PostsFilters::default().to_query().is_empty());
        assert!(!PostsFilters::default().has_structured());
    }

    #[test]
    fn posts_filters_map_to_lookup_params() {
        let f = PostsFilters {
            page: Some(2),
            page_size: Some(10),
            ordering: "-created_at".into(),
            search: "rust".into(),
            title: "intro".into(),
            authors: vec!["amy".into(), "bob".into()],
            tags: vec!["web".into()],
            created_at_gte: "2024-01-01".into(),
            ..Default::default()
        };
        assert!(f.has_structured());
        assert_eq!(
            pairs(&f.to_query()),
            vec![
                ("author__user__username__icontains", "amy,bob"),
                ("created_at__gte", "2024-01-01"),
                ("ordering", "-created_at"),
                ("page", "2"),
                ("page_size", "10"),
                ("search", "rust"),
                ("tags__tag__icontains", "web"),
                ("title__icontains", "intro"),
            ]
        );
    }

    #[test]
    fn profiles_and_comments_and_tags() {
        let p = ProfilesFilters {
            page: Some(1),
            page_size: Some(20),
            search: "am".into(),
            ..Default::default()
        };
        assert_eq!(
            pairs(&p.to_query()),
            vec![("page", "1"), ("page_size", "20"), ("username__icontains", "am")]
        );

        let lookup = ProfilesFilters {
            page_size: Some(25),
            username: "bo".into(),
            ..Default::default()
        };
        assert_eq!(pairs(&lookup.to_query()), vec![("page_size", "25"), ("username", "bo")]);

        let c = CommentsFilters {
            page: Some(3),
            page_size: Some(10),
            ordering: "created_at".into(),
        };
        assert_eq!(
            pairs(&c.to_query()),
            vec![("ordering", "created_at"), ("page", "3"), ("page_size", "10")]
        );

        let t = TagsFilters {
            search: String::new(),
            page_size: Some(25),
        };
        assert_eq!(pairs(&t.to_query()), vec![("page_size", "25")]);
    }
}

use std::fmt;

/// Identity of one cached query: resource segments plus normalized params.
///
/// Params are sorted by name and empty values are dropped, so two filter
/// sets that would produce the same request produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    segments: Vec<String>,
    params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let (name, value) = (name.into(), value.to_string());
        self.params.retain(|(k, _)| *k != name);
        if !value.is_empty() {
            self.params.push((name, value));
            self.params.sort();
        }
        self
    }

    pub fn with_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        params
            .into_iter()
            .fold(self, |key, (k, v)| key.with_param(k, v))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Segments joined by `/`. Observers match against this.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// `prefix`'s segments lead this key's segments and every param of
    /// `prefix` is present here with the same value.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.segments.starts_with(&prefix.segments)
            && prefix.params.iter().all(|p| self.params.contains(p))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_sorted_and_empties_dropped() {
        let a = QueryKey::new(["posts", "list"])
            .with_params([("search", ""), ("page", "1"), ("ordering", "-created_at")]);
        let b = QueryKey::new(["posts", "list"])
            .with_param("ordering", "-created_at")
            .with_param("page", 1);

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "posts/list?ordering=-created_at&page=1");
        assert_eq!(a.param("search"), None);
    }

    #[test]
    fn any_param_change_is_a_new_key() {
        let base = QueryKey::new(["posts", "list"]).with_param("page", 1);
        assert_ne!(base, base.clone().with_param("page", 2));
        assert_ne!(base, base.clone().with_param("search", "rust"));
    }

    #[test]
    fn setting_param_again_replaces_it() {
        let k = QueryKey::new(["x"]).with_param("page", 1).with_param("page", 2);
        assert_eq!(k.params().len(), 1);
        assert_eq!(k.param("page"), Some("2"));

        let cleared = k.with_param("page", "");
        assert!(cleared.params().is_empty());
    }

    #[test]
    fn prefix_matching() {
        let comments = QueryKey::new(["post", "hello", "comments"]).with_param("ordering", "-created_at");
        assert!(comments.starts_with(&QueryKey::new(["post", "hello"])));
        assert!(comments.starts_with(&QueryKey::new(["post"])));
        assert!(comments.starts_with(
            &QueryKey::new(["post", "hello", "comments"]).with_param("ordering", "-created_at")
        ));
        assert!(!comments.starts_with(
            &QueryKey::new(["post", "hello", "comments"]).with_param("ordering", "created_at")
        ));
        assert!(!comments.starts_with(&QueryKey::new(["post", "other"])));
    }

    #[test]
    fn empty_segments_are_skipped() {
        let k = QueryKey::new(["profile", "", "amy"]);
        assert_eq!(k.path(), "profile/amy");
        assert_eq!(k.segments().len(), 2);
    }
}

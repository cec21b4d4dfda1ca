use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Server list envelope. `next` / `previous` are full URLs carrying a
/// `page` query parameter, or `null` at either end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Page number to request after this one. `None` ends the chain.
    pub fn next_page_param(&self) -> Option<u32> {
        self.next.as_deref().and_then(page_param)
    }

    /// `ceil(count / page_size)`; zero when either side is zero.
    pub fn page_count(&self, page_size: u32) -> u64 {
        page_count(self.count, page_size)
    }
}

/// `ceil(total / page_size)`.
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

/// Extract the integer `page` parameter from an absolute or relative URL.
pub fn page_param(link: &str) -> Option<u32> {
    let url = Url::parse(link).or_else(|_| {
        Url::parse("http://localhost/").and_then(|base| base.join(link))
    });
    let url = url.ok()?;
    let (_, value) = url.query_pairs().find(|(k, _)| k == "page")?;
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(next: Option<&str>) -> Paginated<u8> {
        Paginated {
            count: 25,
            next: next.map(String::from),
            previous: None,
            results: vec![],
        }
    }

    #[test]
    fn next_cursor_from_absolute_url() {
        let p = page(Some(
            "http://127.0.0.1:8000/api/posts/hello/comments/?ordering=-created_at&page=3&page_size=10",
        ));
        assert_eq!(p.next_page_param(), Some(3));
    }

    #[test]
    fn next_cursor_from_relative_url() {
        assert_eq!(page_param("/api/posts/?page=2"), Some(2));
    }

    #[test]
    fn chain_ends_without_next() {
        assert_eq!(page(None).next_page_param(), None);
    }

    #[test]
    fn unusable_page_values() {
        assert_eq!(page_param("http://h/x/?page=abc"), None);
        assert_eq!(page_param("http://h/x/?other=1"), None);
        assert_eq!(page_param("http://h/x/"), None);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
        assert_eq!(page(None).page_count(10), 3);
    }

    #[test]
    fn decodes_envelope() {
        let json = r#"{"count":1,"next":null,"previous":null,"results":[7]}"#;
        let p: Paginated<u8> = serde_json::from_str(json).unwrap();
        assert_eq!(p.results, vec![7]);
        assert!(p.next.is_none());
    }
}

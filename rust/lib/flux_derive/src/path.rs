use proc_macro2::Span;

/// A parsed `#[state]` / `#[request]` path.
pub struct PathTemplate {
    pub raw: String,
    /// Name of the single `{param}` segment, if any.
    pub param: Option<String>,
    /// `raw` with the parameter segment replaced by `+`.
    pub pattern: String,
}

pub fn parse(raw: &str, span: Span) -> syn::Result<PathTemplate> {
    if raw.is_empty() {
        return Err(syn::Error::new(span, "path cannot be empty"));
    }

    let mut param = None;
    let mut pattern = Vec::new();
    for segment in raw.split('/') {
        if segment.is_empty() {
            return Err(syn::Error::new(span, "path has an empty segment"));
        }
        if segment.contains('+') || segment.contains('#') {
            return Err(syn::Error::new(span, "wildcards are not allowed in a type path"));
        }
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(syn::Error::new(span, "invalid path parameter name"));
                }
                if param.is_some() {
                    return Err(syn::Error::new(span, "at most one {param} segment is supported"));
                }
                param = Some(name.to_string());
                pattern.push("+");
            }
            None => {
                if segment.contains('{') || segment.contains('}') {
                    return Err(syn::Error::new(span, "a {param} must fill a whole segment"));
                }
                pattern.push(segment);
            }
        }
    }

    Ok(PathTemplate {
        raw: raw.to_string(),
        param,
        pattern: pattern.join("/"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(raw: &str) -> PathTemplate {
        parse(raw, Span::call_site()).unwrap()
    }

    fn err(raw: &str) -> String {
        match parse(raw, Span::call_site()) {
            Ok(_) => panic!("{raw} should be rejected"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn static_path() {
        let p = ok("posts/list");
        assert_eq!(p.param, None);
        assert_eq!(p.pattern, "posts/list");
    }

    #[test]
    fn param_segment() {
        let p = ok("post/{slug}/comments");
        assert_eq!(p.param.as_deref(), Some("slug"));
        assert_eq!(p.pattern, "post/+/comments");
        assert_eq!(p.raw, "post/{slug}/comments");
    }

    #[test]
    fn rejects_bad_paths() {
        assert!(err("").contains("empty"));
        assert!(err("a//b").contains("empty segment"));
        assert!(err("posts/#").contains("wildcards"));
        assert!(err("a/{x}/{y}").contains("at most one"));
        assert!(err("a/x{y}").contains("whole segment"));
        assert!(err("a/{}").contains("parameter name"));
    }
}

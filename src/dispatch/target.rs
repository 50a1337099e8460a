//! Target URL composition.

use url::{form_urlencoded, Url};

/// Build the outbound URL from a destination base, the inbound path suffix
/// and the inbound query string.
///
/// The suffix is appended to the base path. Inbound query pairs are added
/// after the base's own pairs; same-named pairs are kept, not replaced.
pub fn compose_target(base: &str, suffix: &str, query: Option<&str>) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if url.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
    }

    let suffix = suffix.trim_start_matches('/');
    if !suffix.is_empty() {
        let path = format!("{}/{}", url.path().trim_end_matches('/'), suffix);
        url.set_path(&path);
    }

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.query_pairs_mut()
            .extend_pairs(form_urlencoded::parse(query.as_bytes()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_suffix_and_query() {
        let url = compose_target("https://real.example/base", "/extra/seg", Some("x=1")).unwrap();
        assert_eq!(url.as_str(), "https://real.example/base/extra/seg?x=1");
    }

    #[test]
    fn trailing_slash_on_base_is_collapsed() {
        let url = compose_target("https://real.example/base/", "/extra", None).unwrap();
        assert_eq!(url.as_str(), "https://real.example/base/extra");
    }

    #[test]
    fn root_suffix_leaves_base_path() {
        let url = compose_target("https://real.example/base", "/", None).unwrap();
        assert_eq!(url.as_str(), "https://real.example/base");

        let url = compose_target("https://real.example", "", None).unwrap();
        assert_eq!(url.as_str(), "https://real.example/");
    }

    #[test]
    fn existing_query_is_preserved() {
        let url = compose_target("https://real.example/?ref=abc&x=0", "/a", Some("x=1&y=2")).unwrap();
        assert_eq!(url.as_str(), "https://real.example/a?ref=abc&x=0&x=1&y=2");
    }

    #[test]
    fn empty_query_adds_nothing() {
        let url = compose_target("https://real.example/base", "", Some("")).unwrap();
        assert_eq!(url.as_str(), "https://real.example/base");
    }

    #[test]
    fn unparseable_base_is_an_error() {
        assert!(compose_target("not a url", "/x", None).is_err());
        assert!(compose_target("mailto:someone@example.com", "/x", None).is_err());
    }
}

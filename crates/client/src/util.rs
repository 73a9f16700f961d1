use crate::Result;
use reqwest::Url;

/// Parse a base url, ensuring it ends with a trailing slash so that joined
/// endpoint paths append rather than replace the final path segment.
pub(crate) fn base_url(raw: &str) -> Result<Url> {
    let url = if raw.ends_with('/') {
        Url::parse(raw)?
    } else {
        Url::parse(&format!("{raw}/"))?
    };
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_append_to_subpath_bases() {
        let base = base_url("http://localhost:8080/gateway").unwrap();
        let joined = base.join("tx/estimate").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8080/gateway/tx/estimate");
    }

    #[test]
    fn trailing_slash_is_not_doubled() {
        let base = base_url("http://localhost:8080/").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8080/");
    }
}

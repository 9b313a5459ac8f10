use crate::error::Error;
use url::Url;

/// Options for building URLs from a base URL and path segments.
///
/// The default preserves any existing query/fragment and does not
/// trim trailing empty path segments.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BuildUrlOptions {
    /// When true, clear any existing query string on the base URL.
    pub clear_query: bool,
    /// When true, clear any existing fragment (`#...`) on the base URL.
    pub clear_fragment: bool,
    /// When true, drop a trailing empty path segment before appending segments.
    pub pop_if_empty: bool,
}

impl BuildUrlOptions {
    /// Options used when constructing request URLs.
    pub const REQUEST: Self = Self {
        clear_query: true,
        clear_fragment: true,
        pop_if_empty: true,
    };
}

/// Appends `segments` to `base_url`, percent-encoding each one.
pub(crate) fn build_url(
    base_url: &Url,
    segments: &[&str],
    options: BuildUrlOptions,
) -> Result<Url, Error> {
    let mut url = base_url.clone();
    if options.clear_query {
        url.set_query(None);
    }
    if options.clear_fragment {
        url.set_fragment(None);
    }
    {
        let mut path_segments = url
            .path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(base_url.to_string()))?;
        if options.pop_if_empty {
            path_segments.pop_if_empty();
        }
        for segment in segments {
            path_segments.push(segment);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_segments_after_trailing_slash() {
        let base = Url::parse("http://localhost:8080/api/").expect("url");
        let url = build_url(&base, &["slurm", "v0.0.39", "jobs"], BuildUrlOptions::REQUEST)
            .expect("build");
        assert_eq!(url.as_str(), "http://localhost:8080/api/slurm/v0.0.39/jobs");
    }

    #[test]
    fn request_options_drop_query_and_fragment() {
        let base = Url::parse("http://localhost/api?x=1#top").expect("url");
        let url = build_url(&base, &["diag"], BuildUrlOptions::REQUEST).expect("build");
        assert_eq!(url.as_str(), "http://localhost/api/diag");
    }

    #[test]
    fn default_options_keep_query() {
        let base = Url::parse("http://localhost/api?x=1").expect("url");
        let url = build_url(&base, &["diag"], BuildUrlOptions::default()).expect("build");
        assert_eq!(url.as_str(), "http://localhost/api/diag?x=1");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let base = Url::parse("http://localhost/api").expect("url");
        let url = build_url(&base, &["job", "12/../13"], BuildUrlOptions::REQUEST).expect("build");
        assert_eq!(url.path(), "/api/job/12%2F..%2F13");
    }

    #[test]
    fn cannot_be_a_base_url_is_rejected() {
        let base = Url::parse("mailto:ops@example.com").expect("url");
        let err = build_url(&base, &["jobs"], BuildUrlOptions::REQUEST).unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl(_)));
    }
}

// file: src/launcher/target.rs
// description: search endpoint url construction and launch target resolution
// reference: https://docs.rs/url

use crate::config::LauncherConfig;
use crate::error::{QueryError, Result};
use crate::utils::Validator;
use url::Url;

/// What the browser is asked to open.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchTarget {
    /// The refined query was itself a website address.
    Direct(Url),
    /// Search endpoint with the refined query as its parameter.
    Search(Url),
}

impl LaunchTarget {
    pub fn url(&self) -> &Url {
        match self {
            LaunchTarget::Direct(url) | LaunchTarget::Search(url) => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchUrlBuilder {
    base: Url,
    query_param: String,
    open_urls_directly: bool,
}

impl SearchUrlBuilder {
    pub fn new(config: &LauncherConfig) -> Result<Self> {
        let base = Url::parse(&config.search_url).map_err(|e| {
            QueryError::Config(format!("Invalid search url {}: {}", config.search_url, e))
        })?;

        Ok(Self {
            base,
            query_param: config.query_param.clone(),
            open_urls_directly: config.open_urls_directly,
        })
    }

    /// `{search_url}?{param}=<form-encoded query>`; any existing parameters are kept.
    pub fn search_url(&self, refined_query: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(&self.query_param, refined_query);
        url
    }

    pub fn resolve(&self, refined_query: &str) -> LaunchTarget {
        if self.open_urls_directly
            && let Some(url) = Validator::parse_web_url(refined_query)
        {
            return LaunchTarget::Direct(url);
        }
        LaunchTarget::Search(self.search_url(refined_query))
    }

    /// Reads the query parameter back out of a url produced by `search_url`.
    pub fn decode_query(&self, url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == self.query_param.as_str())
            .map(|(_, value)| value.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn google() -> SearchUrlBuilder {
        SearchUrlBuilder::new(&LauncherConfig::default_config()).unwrap()
    }

    const REVIEW_QUERY: &str = r#"("iPhone 15 Pro review" OR "Samsung Galaxy S24 review") ("verified purchase" OR "real customer review") -"sponsored post" -"paid review" site:bestbuy.com OR site:amazon.com OR site:trustpilot.com OR site:reddit.com"#;

    #[test]
    fn test_special_characters_round_trip() {
        let builder = google();
        let query = r#"("a b" OR "c") -d site:e.com"#;
        let url = builder.search_url(query);

        assert_eq!(url.host_str(), Some("www.google.com"));
        assert_eq!(url.path(), "/search");
        let raw = url.query().unwrap();
        for ch in ['"', '(', ')', ' ', ':'] {
            assert!(!raw.contains(ch), "{} left unencoded in {}", ch, raw);
        }
        assert_eq!(builder.decode_query(&url).unwrap(), query);
    }

    #[test]
    fn test_long_operator_query_round_trip() {
        let builder = google();
        let url = builder.search_url(REVIEW_QUERY);
        assert!(url.as_str().starts_with("https://www.google.com/search?q="));
        assert_eq!(builder.decode_query(&url).unwrap(), REVIEW_QUERY);
    }

    #[test]
    fn test_reserved_characters_round_trip() {
        let builder = google();
        for query in ["a+b", "100% & more", "c# #tag", "x=y?z", "café ünïcode", "a/b\\c"] {
            let url = builder.search_url(query);
            assert_eq!(builder.decode_query(&url).unwrap(), query);
        }
    }

    #[test]
    fn test_custom_endpoint_keeps_existing_params() {
        let config = LauncherConfig {
            search_url: "https://search.example.org/?lang=en".to_string(),
            query_param: "query".to_string(),
            open_urls_directly: false,
            browser_command: None,
        };
        let builder = SearchUrlBuilder::new(&config).unwrap();
        let url = builder.search_url("rust site:docs.rs");

        assert_eq!(url.as_str(), "https://search.example.org/?lang=en&query=rust+site%3Adocs.rs");
        assert_eq!(builder.decode_query(&url).unwrap(), "rust site:docs.rs");
    }

    #[test]
    fn test_url_answer_searched_by_default() {
        let builder = google();
        let target = builder.resolve("https://www.example.com/page?a=1&b=2");

        assert!(matches!(target, LaunchTarget::Search(_)));
        assert!(target.url().as_str().starts_with("https://www.google.com/search?q="));
        assert_eq!(
            builder.decode_query(target.url()).unwrap(),
            "https://www.example.com/page?a=1&b=2"
        );
    }

    #[test]
    fn test_resolve_url_directly_when_enabled() {
        let mut config = LauncherConfig::default_config();
        config.open_urls_directly = true;
        let builder = SearchUrlBuilder::new(&config).unwrap();

        match builder.resolve("https://www.example.com/page") {
            LaunchTarget::Direct(url) => assert_eq!(url.as_str(), "https://www.example.com/page"),
            other => panic!("expected direct target, got {:?}", other),
        }
        assert!(matches!(
            builder.resolve("site:example.com rust"),
            LaunchTarget::Search(_)
        ));
    }
}

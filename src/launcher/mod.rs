// file: src/launcher/mod.rs
// description: opens a refined query in the default browser
// reference: internal module structure

pub mod opener;
pub mod target;

pub use opener::{BrowserOpener, SystemBrowser};
pub use target::{LaunchTarget, SearchUrlBuilder};

use crate::config::LauncherConfig;
use crate::error::Result;
use crate::utils::Validator;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Launcher {
    urls: SearchUrlBuilder,
    opener: Arc<dyn BrowserOpener>,
}

impl Launcher {
    pub fn new(urls: SearchUrlBuilder, opener: Arc<dyn BrowserOpener>) -> Self {
        Self { urls, opener }
    }

    pub fn from_config(config: &LauncherConfig) -> Result<Self> {
        let urls = SearchUrlBuilder::new(config)?;
        let opener = SystemBrowser::new(config.browser_command.as_deref());
        Ok(Self::new(urls, Arc::new(opener)))
    }

    pub fn urls(&self) -> &SearchUrlBuilder {
        &self.urls
    }

    /// Resolves the target without opening anything.
    pub fn target(&self, refined_query: &str) -> Result<LaunchTarget> {
        let refined_query = Validator::require_text(refined_query, "refined query")?;
        Ok(self.urls.resolve(&refined_query))
    }

    pub async fn launch(&self, refined_query: &str) -> Result<LaunchTarget> {
        let target = self.target(refined_query)?;
        self.opener.open(target.url()).await?;

        info!("Opened {}", target.url());
        Ok(target)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingOpener, launcher_with};
    use super::*;
    use crate::error::QueryError;

    #[tokio::test]
    async fn test_launch_opens_search_url() {
        let opener = Arc::new(RecordingOpener::new());
        let launcher = launcher_with(opener.clone());

        let target = launcher.launch("rust site:docs.rs").await.unwrap();

        assert!(matches!(target, LaunchTarget::Search(_)));
        let opened = opener.opened.lock().unwrap();
        assert_eq!(opened.len(), 1);
        assert_eq!(
            launcher.urls().decode_query(&opened[0]).unwrap(),
            "rust site:docs.rs"
        );
    }

    #[tokio::test]
    async fn test_missing_handler_surfaces_launch_error() {
        let opener = Arc::new(RecordingOpener::without_handler());
        let launcher = launcher_with(opener.clone());

        let err = launcher.launch("rust").await.unwrap_err();
        assert!(matches!(err, QueryError::BrowserLaunch(_)));
        assert_eq!(opener.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_never_opens() {
        let opener = Arc::new(RecordingOpener::new());
        let launcher = launcher_with(opener.clone());

        assert!(matches!(
            launcher.launch("  ").await,
            Err(QueryError::InvalidInput(_))
        ));
        assert_eq!(opener.calls(), 0);
    }

    #[test]
    fn test_from_config() {
        let launcher = Launcher::from_config(&LauncherConfig::default_config()).unwrap();
        let target = launcher.target("https://docs.rs").unwrap();
        assert!(matches!(target, LaunchTarget::Search(_)));
        assert_eq!(
            launcher.urls().decode_query(target.url()).unwrap(),
            "https://docs.rs"
        );

        let mut config = LauncherConfig::default_config();
        config.open_urls_directly = true;
        let launcher = Launcher::from_config(&config).unwrap();
        assert!(matches!(
            launcher.target("https://docs.rs").unwrap(),
            LaunchTarget::Direct(_)
        ));
    }
}

//! Shared HTTP client that owns the cookie jar.
//!
//! The client records every `Set-Cookie` it receives, and the data source
//! factories it hands out send those cookies along with media requests.
//!
//! # Example
//!
//! ```rust,no_run
//! use cookiesource::client::Client;
//! use cookiesource::upstream::{AppContext, DataSource, DataSourceFactory, DataSpec};
//!
//! # async fn run() -> Result<(), cookiesource::base::neterror::NetError> {
//! let client = Client::builder().user_agent("Player/1.0").build();
//! client.get("https://example.com/login").await?;
//!
//! let factory = client.data_source_factory(
//!     "https://example.com/video.m3u8",
//!     &AppContext::new("/app/assets"),
//! )?;
//! let mut source = factory.create_data_source()?;
//! source.open(&DataSpec::new("https://example.com/video.m3u8".parse().unwrap())).await?;
//! # Ok(())
//! # }
//! ```

use crate::base::neterror::NetError;
use crate::cookies::monster::CookieMonster;
use crate::cookies::store::CookieStore;
use crate::http::response::HttpResponse;
use crate::http::streamfactory::HttpStreamFactory;
use crate::http::transaction::HttpNetworkTransaction;
use crate::upstream::config::HttpDataSourceConfig;
use crate::upstream::context::AppContext;
use crate::upstream::shared_cookies::SharedCookiesDataSourceFactory;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// HTTP client shared across the application.
///
/// Cloning is cheap; clones share the cookie jar.
#[derive(Debug, Clone)]
pub struct Client {
    cookie_store: Arc<CookieMonster>,
    config: Arc<HttpDataSourceConfig>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Send a GET request, following redirects.
    ///
    /// Jar cookies go out with every hop and every `Set-Cookie` received is
    /// stored.
    pub async fn get<U: AsRef<str>>(&self, url: U) -> Result<HttpResponse, NetError> {
        let url = Url::parse(url.as_ref()).map_err(|_| NetError::InvalidUrl)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetError::DisallowedUrlScheme);
        }

        let mut transaction = HttpNetworkTransaction::new(
            HttpStreamFactory::new(self.config.connect_timeout),
            url,
        );
        transaction.add_header("User-Agent", &self.config.user_agent)?;
        transaction.set_cookie_store(self.cookie_store.clone());
        transaction.set_redirect_limit(self.config.max_redirects);
        transaction.set_allow_cross_protocol_redirects(self.config.allow_cross_protocol_redirects);

        let deadline = self.config.connect_timeout + self.config.read_timeout;
        let response = match tokio::time::timeout(deadline, transaction.start()).await {
            Ok(result) => result?,
            Err(_) => return Err(NetError::ConnectionTimedOut),
        };

        Ok(HttpResponse::from_hyper(response, transaction.url().clone()))
    }

    /// The jar as a lookup capability.
    pub fn cookie_store(&self) -> Arc<dyn CookieStore> {
        self.cookie_store.clone()
    }

    pub fn cookie_monster(&self) -> &Arc<CookieMonster> {
        &self.cookie_store
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    pub fn config(&self) -> &HttpDataSourceConfig {
        &self.config
    }

    /// Data source factory for `uri` that sends this client's cookies and
    /// uses its user agent and timeouts.
    pub fn data_source_factory(
        &self,
        uri: &str,
        context: &AppContext,
    ) -> Result<SharedCookiesDataSourceFactory, NetError> {
        let uri = Url::parse(uri).map_err(|_| NetError::InvalidUrl)?;
        Ok(SharedCookiesDataSourceFactory::with_config(
            uri,
            context,
            (*self.config).clone(),
            self.cookie_store(),
        ))
    }
}

/// Builder for creating a [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    cookie_store: Option<Arc<CookieMonster>>,
    config: HttpDataSourceConfig,
}

impl ClientBuilder {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Use an existing jar, shared with whoever else holds it.
    pub fn cookie_store(mut self, store: Arc<CookieMonster>) -> Self {
        self.cookie_store = Some(store);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn max_redirects(mut self, max_redirects: u8) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    pub fn allow_cross_protocol_redirects(mut self, allow: bool) -> Self {
        self.config.allow_cross_protocol_redirects = allow;
        self
    }

    pub fn build(self) -> Client {
        Client {
            cookie_store: self.cookie_store.unwrap_or_default(),
            config: Arc::new(self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::shared_cookies::DelegateKind;

    #[test]
    fn test_builder() {
        let jar = Arc::new(CookieMonster::new());
        let client = Client::builder()
            .user_agent("Player/1.0")
            .cookie_store(jar.clone())
            .max_redirects(2)
            .build();

        assert_eq!(client.user_agent(), "Player/1.0");
        assert_eq!(client.config().max_redirects, 2);
        assert!(Arc::ptr_eq(client.cookie_monster(), &jar));
    }

    #[test]
    fn test_clones_share_jar() {
        let client = Client::new();
        let other = client.clone();
        let url = Url::parse("https://example.com/").unwrap();
        client
            .cookie_monster()
            .parse_and_save_cookie(&url, "sid=abc")
            .unwrap();
        assert_eq!(other.cookie_store().load_for_request(&url).unwrap().len(), 1);
    }

    #[test]
    fn test_data_source_factory_uses_client_settings() {
        let client = Client::builder().user_agent("Player/1.0").build();
        let ctx = AppContext::new("/app/assets");

        let factory = client
            .data_source_factory("https://cdn.example.com/v.m3u8", &ctx)
            .unwrap();
        assert_eq!(factory.delegate_kind(), DelegateKind::Http);
        assert_eq!(
            client.data_source_factory("not a url", &ctx).unwrap_err(),
            NetError::InvalidUrl
        );
    }

    #[tokio::test]
    async fn test_get_rejects_non_http() {
        let client = Client::new();
        assert_eq!(
            client.get("file:///etc/hosts").await.err(),
            Some(NetError::DisallowedUrlScheme)
        );
    }
}

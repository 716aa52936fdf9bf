use crate::base::neterror::NetError;
use crate::cookies::store::{cookie_header_value, CookieStore};
use crate::upstream::config::HttpDataSourceConfig;
use crate::upstream::context::AppContext;
use crate::upstream::datasource::{DataSource, DataSourceFactory, HttpDataSource};
use crate::upstream::default::DefaultDataSourceFactory;
use crate::upstream::http::DefaultHttpDataSourceFactory;
use std::sync::Arc;
use url::Url;

/// The factory a [`SharedCookiesDataSourceFactory`] delegates to, picked
/// once from the target URI's scheme.
#[derive(Debug, Clone)]
pub enum DelegateFactory {
    /// `http` and `https` URIs.
    Http(DefaultHttpDataSourceFactory),
    /// Every other scheme.
    Default(DefaultDataSourceFactory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateKind {
    Http,
    Default,
}

impl DelegateFactory {
    fn for_uri(uri: &Url, context: &AppContext, config: HttpDataSourceConfig) -> Self {
        if is_http_scheme(uri) {
            DelegateFactory::Http(DefaultHttpDataSourceFactory::with_config(config))
        } else {
            DelegateFactory::Default(DefaultDataSourceFactory::with_config(context, config))
        }
    }

    pub fn kind(&self) -> DelegateKind {
        match self {
            DelegateFactory::Http(_) => DelegateKind::Http,
            DelegateFactory::Default(_) => DelegateKind::Default,
        }
    }
}

impl DataSourceFactory for DelegateFactory {
    fn create_data_source(&self) -> Result<Box<dyn DataSource>, NetError> {
        match self {
            DelegateFactory::Http(factory) => factory.create_data_source(),
            DelegateFactory::Default(factory) => factory.create_data_source(),
        }
    }
}

fn is_http_scheme(uri: &Url) -> bool {
    matches!(uri.scheme(), "http" | "https")
}

/// Data source factory that sends the shared cookie jar's cookies with
/// every HTTP request.
///
/// Sources created for `http`/`https` URIs get a `Cookie` request property
/// holding `name=value; ` for each cookie the store returns for the target
/// URI. The header is computed on every [`create_data_source`] call, so
/// later sources see later jar contents. Sources for other schemes are
/// returned untouched.
///
/// [`create_data_source`]: DataSourceFactory::create_data_source
pub struct SharedCookiesDataSourceFactory {
    uri: Url,
    delegate: DelegateFactory,
    cookie_store: Arc<dyn CookieStore>,
}

impl std::fmt::Debug for SharedCookiesDataSourceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCookiesDataSourceFactory")
            .field("uri", &self.uri.as_str())
            .field("delegate", &self.delegate.kind())
            .finish_non_exhaustive()
    }
}

impl SharedCookiesDataSourceFactory {
    pub fn new(
        uri: Url,
        context: &AppContext,
        user_agent: impl Into<String>,
        cookie_store: Arc<dyn CookieStore>,
    ) -> Self {
        Self::with_config(uri, context, HttpDataSourceConfig::new(user_agent), cookie_store)
    }

    pub fn with_config(
        uri: Url,
        context: &AppContext,
        config: HttpDataSourceConfig,
        cookie_store: Arc<dyn CookieStore>,
    ) -> Self {
        let delegate = DelegateFactory::for_uri(&uri, context, config);
        tracing::debug!(uri = %uri, delegate = ?delegate.kind(), "created cookie-aware data source factory");
        Self {
            uri,
            delegate,
            cookie_store,
        }
    }

    /// Like [`new`](Self::new), parsing `uri` first.
    pub fn parse(
        uri: &str,
        context: &AppContext,
        user_agent: impl Into<String>,
        cookie_store: Arc<dyn CookieStore>,
    ) -> Result<Self, NetError> {
        let uri = Url::parse(uri).map_err(|_| NetError::InvalidUrl)?;
        Ok(Self::new(uri, context, user_agent, cookie_store))
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn delegate(&self) -> &DelegateFactory {
        &self.delegate
    }

    pub fn delegate_kind(&self) -> DelegateKind {
        self.delegate.kind()
    }

    fn set_data_source_cookies(&self, source: &mut dyn HttpDataSource) -> Result<(), NetError> {
        let url = Url::parse(self.uri.as_str()).map_err(|_| NetError::InvalidUrl)?;
        if !is_http_scheme(&url) {
            return Err(NetError::DisallowedUrlScheme);
        }

        let candidates = self.cookie_store.load_for_request(&url)?;
        let header = cookie_header_value(candidates.iter().filter(|c| c.matches(&url)));
        tracing::trace!(
            url = %url,
            returned = candidates.len(),
            header_len = header.len(),
            "attaching shared cookies"
        );
        source.set_request_property("Cookie", &header)
    }
}

impl DataSourceFactory for SharedCookiesDataSourceFactory {
    fn create_data_source(&self) -> Result<Box<dyn DataSource>, NetError> {
        let mut source = self.delegate.create_data_source()?;
        if let Some(http) = source.as_http_mut() {
            self.set_data_source_cookies(http)?;
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::canonical_cookie::CanonicalCookie;
    use crate::cookies::monster::CookieMonster;

    fn context() -> AppContext {
        AppContext::new("/app/assets")
    }

    fn factory(uri: &str, store: Arc<dyn CookieStore>) -> SharedCookiesDataSourceFactory {
        SharedCookiesDataSourceFactory::parse(uri, &context(), "Player/1.0", store).unwrap()
    }

    fn cookie_of(source: &dyn DataSource) -> Option<String> {
        source
            .as_http()
            .and_then(|http| http.request_property("Cookie"))
            .map(str::to_owned)
    }

    #[test]
    fn test_delegate_by_scheme() {
        let jar: Arc<dyn CookieStore> = Arc::new(CookieMonster::new());
        for uri in ["http://example.com/a", "https://example.com/a", "HTTPS://example.com/a"] {
            assert_eq!(factory(uri, jar.clone()).delegate_kind(), DelegateKind::Http);
        }
        for uri in ["file:///tmp/a.mp4", "asset:///a.mp4", "data:,x", "rtsp://cam/1"] {
            assert_eq!(factory(uri, jar.clone()).delegate_kind(), DelegateKind::Default);
        }
    }

    #[test]
    fn test_parse_rejects_scheme_less_uri() {
        let jar: Arc<dyn CookieStore> = Arc::new(CookieMonster::new());
        let err = SharedCookiesDataSourceFactory::parse("/video.m3u8", &context(), "ua", jar)
            .unwrap_err();
        assert_eq!(err, NetError::InvalidUrl);
    }

    #[test]
    fn test_injects_jar_cookies() {
        let jar = Arc::new(CookieMonster::new());
        let url = Url::parse("https://example.com/video.m3u8").unwrap();
        jar.parse_and_save_cookie(&url, "sid=abc; Path=/").unwrap();
        jar.parse_and_save_cookie(&url, "lang=en; Path=/").unwrap();

        let source = factory(url.as_str(), jar).create_data_source().unwrap();
        assert_eq!(cookie_of(source.as_ref()).as_deref(), Some("sid=abc; lang=en; "));
    }

    #[test]
    fn test_empty_jar_sets_empty_header() {
        let source = factory("https://example.com/v.mp4", Arc::new(CookieMonster::new()))
            .create_data_source()
            .unwrap();
        assert_eq!(cookie_of(source.as_ref()).as_deref(), Some(""));
    }

    #[test]
    fn test_generic_source_untouched() {
        let jar = Arc::new(CookieMonster::new());
        jar.set_canonical_cookie(CanonicalCookie::new("sid", "abc", "example.com", "/"));
        let source = factory("file:///tmp/a.mp4", jar).create_data_source().unwrap();
        assert!(source.as_http().is_none());
    }
}

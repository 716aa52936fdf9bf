use crate::base::neterror::NetError;
use crate::cookies::monster::CookieMonster;
use crate::cookies::store::cookie_header_value;
use crate::http::orderedheaders::OrderedHeaderMap;
use crate::http::streamfactory::HttpStreamFactory;
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::Empty;
use hyper::body::Incoming;
use std::sync::Arc;
use url::{Position, Url};

/// Chromium's redirect limit.
pub const DEFAULT_MAX_REDIRECTS: u8 = 20;

/// A GET request driven to its final, non-redirect response.
/// Combines the roles of net::HttpNetworkTransaction and the redirect loop
/// of net::URLRequestHttpJob.
pub struct HttpNetworkTransaction {
    factory: HttpStreamFactory,
    url: Url,
    request_headers: OrderedHeaderMap,
    cookie_store: Option<Arc<CookieMonster>>,
    redirect_limit: u8,
    allow_cross_protocol_redirects: bool,
}

impl HttpNetworkTransaction {
    pub fn new(factory: HttpStreamFactory, url: Url) -> Self {
        Self {
            factory,
            url,
            request_headers: OrderedHeaderMap::default(),
            cookie_store: None,
            redirect_limit: DEFAULT_MAX_REDIRECTS,
            allow_cross_protocol_redirects: false,
        }
    }

    pub fn set_headers(&mut self, headers: OrderedHeaderMap) {
        self.request_headers = headers;
    }

    /// Add a header to the request.
    pub fn add_header(&mut self, key: &str, value: &str) -> Result<(), NetError> {
        self.request_headers.insert(key, value)
    }

    /// Attach jar cookies to every hop and store every `Set-Cookie`.
    pub fn set_cookie_store(&mut self, store: Arc<CookieMonster>) {
        self.cookie_store = Some(store);
    }

    pub fn set_redirect_limit(&mut self, limit: u8) {
        self.redirect_limit = limit;
    }

    pub fn set_allow_cross_protocol_redirects(&mut self, allow: bool) {
        self.allow_cross_protocol_redirects = allow;
    }

    /// URL of the last hop, after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send the request, following redirects.
    pub async fn start(&mut self) -> Result<Response<Incoming>, NetError> {
        let mut redirects_left = self.redirect_limit;

        loop {
            let response = self.send_once().await?;

            let Some(next) = self.redirect_target(&response)? else {
                return Ok(response);
            };

            if redirects_left == 0 {
                return Err(NetError::TooManyRedirects);
            }
            redirects_left -= 1;

            tracing::debug!(from = %self.url, to = %next, status = %response.status(), "following redirect");
            self.url = next;
        }
    }

    async fn send_once(&mut self) -> Result<Response<Incoming>, NetError> {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("Host", &self.url[Position::BeforeHost..Position::AfterPort])?;
        headers.extend_from(&self.request_headers);
        headers.insert_if_absent("Accept", "*/*")?;

        if let Some(store) = &self.cookie_store {
            let cookies = store.get_cookies_for_url(&self.url);
            if !cookies.is_empty() && headers.get("Cookie").is_none() {
                headers.insert("Cookie", cookie_header_value(&cookies).trim_end_matches("; "))?;
            }
        }

        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(&self.url[Position::BeforePath..Position::AfterQuery]);
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }
        let req = builder
            .body(Empty::<Bytes>::new())
            .map_err(|_| NetError::InvalidUrl)?;

        let mut stream = self.factory.request_stream(&self.url).await?;
        let response = stream.send_request(req).await?;

        if let Some(store) = &self.cookie_store {
            for value in response.headers().get_all(http::header::SET_COOKIE) {
                if let Ok(line) = value.to_str() {
                    if let Err(e) = store.parse_and_save_cookie(&self.url, line) {
                        tracing::debug!(url = %self.url, error = %e, "rejected Set-Cookie");
                    }
                }
            }
        }

        Ok(response)
    }

    /// The URL to follow if `response` is a redirect.
    fn redirect_target(&self, response: &Response<Incoming>) -> Result<Option<Url>, NetError> {
        if !matches!(
            response.status(),
            StatusCode::MOVED_PERMANENTLY
                | StatusCode::FOUND
                | StatusCode::SEE_OTHER
                | StatusCode::TEMPORARY_REDIRECT
                | StatusCode::PERMANENT_REDIRECT
        ) {
            return Ok(None);
        }

        let location = response
            .headers()
            .get(http::header::LOCATION)
            .ok_or(NetError::InvalidRedirect)?
            .to_str()
            .map_err(|_| NetError::InvalidRedirect)?;
        let next = self
            .url
            .join(location)
            .map_err(|_| NetError::InvalidRedirect)?;

        if !matches!(next.scheme(), "http" | "https") {
            return Err(NetError::UnsafeRedirect);
        }
        if next.scheme() != self.url.scheme() && !self.allow_cross_protocol_redirects {
            return Err(NetError::UnsafeRedirect);
        }

        Ok(Some(next))
    }
}

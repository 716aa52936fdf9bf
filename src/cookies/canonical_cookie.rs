use crate::base::neterror::NetError;
use time::OffsetDateTime;
use url::Url;

/// Represents a cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
    pub priority: CookiePriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CookiePriority {
    Low,
    Medium,
    High,
}

impl CanonicalCookie {
    /// Host-only session cookie with default attributes.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
            creation_time: now,
            expiration_time: None,
            last_access_time: now,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: SameSite::Unspecified,
            priority: CookiePriority::Medium,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_host_only(mut self, host_only: bool) -> Self {
        self.host_only = host_only;
        self
    }

    pub fn with_expiration(mut self, expiration_time: Option<OffsetDateTime>) -> Self {
        self.expiration_time = expiration_time;
        self
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        match self.expiration_time {
            Some(expiry) => expiry < current_time,
            // Session cookies live as long as the jar.
            None => false,
        }
    }

    /// Whether this cookie should be sent with a request to `url`.
    ///
    /// Applies RFC 6265 domain and path matching, the Secure attribute and
    /// expiry.
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        if !domain_matches(&self.domain, host, self.host_only) {
            return false;
        }
        if !path_matches(&self.path, url.path()) {
            return false;
        }
        if self.secure && url.scheme() != "https" {
            return false;
        }
        !self.is_expired(OffsetDateTime::now_utc())
    }

    /// `name=value` as sent in a `Cookie` request header.
    pub fn to_request_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(&self, secure_origin: bool) -> Result<(), NetError> {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(NetError::CookieInvalidPrefix);
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return Err(NetError::CookieInvalidPrefix);
        }

        Ok(())
    }
}

/// Check if cookie domain matches request host.
/// Implements RFC 6265 domain matching.
pub(crate) fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
    if host_only {
        return cookie_domain.eq_ignore_ascii_case(request_host);
    }

    let cookie_domain = cookie_domain.trim_start_matches('.');
    if request_host.eq_ignore_ascii_case(cookie_domain) {
        return true;
    }

    // request_host must end with ".cookie_domain"
    if request_host.len() > cookie_domain.len() {
        let split = request_host.len() - cookie_domain.len();
        if let (Some(suffix), Some(boundary)) = (
            request_host.get(split..),
            request_host.as_bytes().get(split - 1),
        ) {
            return *boundary == b'.' && suffix.eq_ignore_ascii_case(cookie_domain);
        }
    }

    false
}

/// Check if request path matches cookie path.
/// Implements RFC 6265 path matching.
pub(crate) fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }

    if let Some(rest) = request_path.strip_prefix(cookie_path) {
        return cookie_path.ends_with('/') || rest.starts_with('/');
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_host_only_requires_exact_host() {
        let cookie = CanonicalCookie::new("sid", "abc", "example.com", "/");
        assert!(cookie.matches(&url("https://example.com/video.m3u8")));
        assert!(cookie.matches(&url("https://EXAMPLE.com/")));
        assert!(!cookie.matches(&url("https://cdn.example.com/video.m3u8")));
    }

    #[test]
    fn test_domain_cookie_matches_subdomains() {
        let cookie = CanonicalCookie::new("sid", "abc", "example.com", "/").with_host_only(false);
        assert!(cookie.matches(&url("https://cdn.example.com/a")));
        assert!(cookie.matches(&url("https://example.com/a")));
        assert!(!cookie.matches(&url("https://badexample.com/a")));
    }

    #[test]
    fn test_path_matching() {
        assert!(path_matches("/", "/anything"));
        assert!(path_matches("/foo", "/foo"));
        assert!(path_matches("/foo", "/foo/bar"));
        assert!(path_matches("/foo/", "/foo/bar"));
        assert!(!path_matches("/foo", "/foobar"));
        assert!(!path_matches("/foo/bar", "/foo"));
    }

    #[test]
    fn test_secure_cookie_needs_https() {
        let cookie = CanonicalCookie::new("sid", "abc", "example.com", "/").with_secure(true);
        assert!(cookie.matches(&url("https://example.com/")));
        assert!(!cookie.matches(&url("http://example.com/")));
    }

    #[test]
    fn test_expired_cookie_never_matches() {
        let past = OffsetDateTime::now_utc() - time::Duration::hours(1);
        let cookie =
            CanonicalCookie::new("sid", "abc", "example.com", "/").with_expiration(Some(past));
        assert!(!cookie.matches(&url("https://example.com/")));
    }

    #[test]
    fn test_url_without_host_never_matches() {
        let cookie = CanonicalCookie::new("sid", "abc", "example.com", "/");
        assert!(!cookie.matches(&url("data:text/plain,hello")));
    }

    #[test]
    fn test_validate_prefix() {
        let host = CanonicalCookie::new("__Host-id", "1", "example.com", "/").with_secure(true);
        assert!(host.validate_prefix(true).is_ok());
        assert_eq!(
            host.validate_prefix(false),
            Err(NetError::CookieInvalidPrefix)
        );

        let secure = CanonicalCookie::new("__Secure-id", "1", "example.com", "/");
        assert_eq!(
            secure.validate_prefix(true),
            Err(NetError::CookieInvalidPrefix)
        );
    }

    #[test]
    fn test_to_request_pair() {
        let cookie = CanonicalCookie::new("lang", "en", "example.com", "/");
        assert_eq!(cookie.to_request_pair(), "lang=en");
    }
}

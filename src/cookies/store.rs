use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::CanonicalCookie;
use std::sync::Arc;
use url::Url;

/// Read access to a cookie jar.
///
/// Modeled after Chromium's `net::CookieStore`, reduced to the lookup a
/// request needs. Implementations own their matching rules and their own
/// locking; callers treat the store as a synchronous, read-only service.
pub trait CookieStore: Send + Sync {
    /// Cookies that apply to a request for `url`, in the order they should
    /// be sent.
    fn load_for_request(&self, url: &Url) -> Result<Vec<CanonicalCookie>, NetError>;
}

impl<S: CookieStore + ?Sized> CookieStore for Arc<S> {
    fn load_for_request(&self, url: &Url) -> Result<Vec<CanonicalCookie>, NetError> {
        (**self).load_for_request(url)
    }
}

/// Serialize cookies for a `Cookie` request header.
///
/// Every cookie is written as `name=value; `, trailing separator included,
/// in the given order.
pub fn cookie_header_value<'a, I>(cookies: I) -> String
where
    I: IntoIterator<Item = &'a CanonicalCookie>,
{
    let mut value = String::new();
    for cookie in cookies {
        value.push_str(&cookie.to_request_pair());
        value.push_str("; ");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_value_keeps_order_and_trailing_separator() {
        let cookies = vec![
            CanonicalCookie::new("sid", "abc", "example.com", "/"),
            CanonicalCookie::new("lang", "en", "example.com", "/"),
        ];
        assert_eq!(cookie_header_value(&cookies), "sid=abc; lang=en; ");
    }

    #[test]
    fn test_cookie_header_value_empty() {
        let cookies: Vec<CanonicalCookie> = Vec::new();
        assert_eq!(cookie_header_value(&cookies), "");
    }
}

use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::{domain_matches, CanonicalCookie, CookiePriority, SameSite};
use crate::cookies::store::CookieStore;
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

/// In-memory cookie jar shared by the HTTP client and the data sources.
/// Modeled after Chromium's `net::CookieMonster`.
#[derive(Clone)]
pub struct CookieMonster {
    // Map<Domain, List<Cookie>>, DashMap for concurrent readers.
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CookieMonster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieMonster")
            .field("domains", &self.store.len())
            .field("cookies", &self.total_cookie_count())
            .finish()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Insert a cookie, replacing any cookie with the same name and path
    /// in the same domain.
    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) {
        let mut entry = self.store.entry(cookie.domain.to_lowercase()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Remove the cookie identified by domain, path and name.
    /// Returns true if a cookie was removed.
    pub fn delete_cookie(&self, domain: &str, path: &str, name: &str) -> bool {
        let Some(mut entry) = self.store.get_mut(&domain.to_lowercase()) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|c| c.name != name || c.path != path);
        before != entry.len()
    }

    /// Get cookies matching the URL with proper domain suffix matching.
    pub fn get_cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let mut result = Vec::new();
        let Some(host) = url.host_str() else {
            return result;
        };

        for domain in Self::get_matching_domains(host) {
            if let Some(entry) = self.store.get(&domain) {
                result.extend(entry.iter().filter(|c| c.matches(url)).cloned());
            }
        }

        // Longest path first, then oldest first (RFC 6265 section 5.4).
        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        result
    }

    /// The host itself and all parent domains.
    /// For "foo.bar.example.com": "bar.example.com" and "example.com" too.
    fn get_matching_domains(host: &str) -> Vec<String> {
        let host = host.to_lowercase();
        let parts: Vec<&str> = host.split('.').collect();
        let mut domains = vec![host.clone()];
        for i in 1..parts.len().saturating_sub(1) {
            domains.push(parts[i..].join("."));
        }
        domains
    }

    /// Parse a `Set-Cookie` line received for `url` and store the cookie.
    ///
    /// Rejects cookies whose Domain attribute is a public suffix or does
    /// not cover the setting host, and cookies with an invalid name prefix.
    pub fn parse_and_save_cookie(&self, url: &Url, cookie_line: &str) -> Result<(), NetError> {
        let parsed = cookie::Cookie::parse(cookie_line).map_err(|e| {
            tracing::debug!(error = %e, "failed to parse Set-Cookie line");
            NetError::InvalidHeader
        })?;

        let host = url.host_str().ok_or(NetError::InvalidUrl)?.to_lowercase();
        let now = OffsetDateTime::now_utc();

        let (domain, host_only) = match parsed.domain() {
            Some(d) => {
                let d = d.trim_start_matches('.').to_lowercase();
                if crate::cookies::psl::is_public_suffix(&d) && d != host {
                    return Err(NetError::CookiePublicSuffix);
                }
                if !domain_matches(&d, &host, false) {
                    return Err(NetError::InvalidArgument);
                }
                (d, false)
            }
            None => (host, true),
        };

        let path = match parsed.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => default_path(url),
        };

        // Max-Age wins over Expires.
        let expiration_time = match parsed.max_age() {
            Some(max_age) if max_age <= time::Duration::ZERO => Some(OffsetDateTime::UNIX_EPOCH),
            Some(max_age) => Some(now + max_age),
            None => parsed.expires().and_then(|e| e.datetime()),
        };

        let same_site = match parsed.same_site() {
            Some(cookie::SameSite::Lax) => SameSite::Lax,
            Some(cookie::SameSite::Strict) => SameSite::Strict,
            Some(cookie::SameSite::None) => SameSite::NoRestriction,
            None => SameSite::Unspecified,
        };

        let c = CanonicalCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
            same_site,
            priority: CookiePriority::Medium,
        };
        c.validate_prefix(url.scheme() == "https")?;

        tracing::trace!(name = %c.name, domain = %c.domain, "storing cookie");
        self.set_canonical_cookie(c);
        Ok(())
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    /// Clear all cookies.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl CookieStore for CookieMonster {
    fn load_for_request(&self, url: &Url) -> Result<Vec<CanonicalCookie>, NetError> {
        Ok(self.get_cookies_for_url(url))
    }
}

/// RFC 6265 section 5.1.4 default-path of a request URL.
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

//! Cookie storage and matching.
//!
//! | Chromium (C++) | cookiesource (Rust) | Responsibility |
//! |----------------|---------------------|----------------|
//! | `net::CookieStore` | [`CookieStore`](store::CookieStore) | Lookup capability used by requests |
//! | `net::CookieMonster` | [`CookieMonster`](monster::CookieMonster) | In-memory jar |
//! | `net::CanonicalCookie` | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Single cookie and its URL match rules |
//!
//! ```rust
//! use cookiesource::cookies::monster::CookieMonster;
//! use cookiesource::cookies::store::{cookie_header_value, CookieStore};
//! use url::Url;
//!
//! let jar = CookieMonster::new();
//! let url = Url::parse("https://example.com/video.m3u8").unwrap();
//! jar.parse_and_save_cookie(&url, "sid=abc; Path=/").unwrap();
//!
//! let cookies = jar.load_for_request(&url).unwrap();
//! assert_eq!(cookie_header_value(&cookies), "sid=abc; ");
//! ```

pub mod canonical_cookie;
pub mod monster;
pub mod psl;
pub mod store;

pub use self::canonical_cookie::CanonicalCookie;
pub use self::monster::CookieMonster;
pub use self::store::CookieStore;

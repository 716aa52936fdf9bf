//! # cookiesource
//!
//! Cookie-aware data sources for media playback.
//!
//! A media player reads bytes through [`DataSource`](upstream::DataSource)s
//! produced by a [`DataSourceFactory`](upstream::DataSourceFactory).
//! [`SharedCookiesDataSourceFactory`](upstream::SharedCookiesDataSourceFactory)
//! is a drop-in factory that picks an HTTP or generic source by URI scheme
//! and gives every HTTP source a `Cookie` header built from the application's
//! shared cookie jar, so media requests carry the same session as the rest
//! of the app.
//!
//! ## Quick Start
//!
//! ```rust
//! use cookiesource::cookies::CookieMonster;
//! use cookiesource::upstream::{
//!     AppContext, DataSource, DataSourceFactory, HttpDataSource, SharedCookiesDataSourceFactory,
//! };
//! use std::sync::Arc;
//! use url::Url;
//!
//! let jar = Arc::new(CookieMonster::new());
//! let uri = Url::parse("https://example.com/video.m3u8").unwrap();
//! jar.parse_and_save_cookie(&uri, "sid=abc; Path=/").unwrap();
//!
//! let factory = SharedCookiesDataSourceFactory::new(
//!     uri,
//!     &AppContext::new("/app/assets"),
//!     "Player/1.0",
//!     jar,
//! );
//! let source = factory.create_data_source().unwrap();
//! let cookie = source.as_http().and_then(|http| http.request_property("Cookie"));
//! assert_eq!(cookie, Some("sid=abc; "));
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error codes and IO error context
//! - [`cookies`] - Cookie jar, matching and the lookup capability
//! - [`http`] - HTTP/1.1 transactions, ordered headers and bodies
//! - [`socket`] - TCP and TLS connection setup
//! - [`upstream`] - Data sources and their factories
//! - [`client`] - Shared HTTP client owning the cookie jar

pub mod base;
pub mod client;
pub mod cookies;
pub mod http;
pub mod socket;
pub mod upstream;

pub use base::neterror::NetError;
pub use client::{Client, ClientBuilder};

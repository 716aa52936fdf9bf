//! Data sources for the media pipeline.
//!
//! | Type | Reads |
//! |------|-------|
//! | [`DefaultHttpDataSource`] | `http`/`https`, with caller-set request headers |
//! | [`DefaultDataSource`] | `file`, `asset`, `data`, `http`/`https` |
//! | [`SharedCookiesDataSourceFactory`] | HTTP sources carrying the shared cookie jar |

pub mod asset;
pub mod config;
pub mod context;
pub mod data;
pub mod datasource;
pub mod default;
pub mod file;
pub mod http;
pub mod shared_cookies;

pub use self::config::HttpDataSourceConfig;
pub use self::context::AppContext;
pub use self::datasource::{DataSource, DataSourceFactory, DataSpec, HttpDataSource};
pub use self::default::{DefaultDataSource, DefaultDataSourceFactory};
pub use self::http::{DefaultHttpDataSource, DefaultHttpDataSourceFactory};
pub use self::shared_cookies::{DelegateFactory, DelegateKind, SharedCookiesDataSourceFactory};

//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): error codes modelled on Chromium's `net_error_list.h`
//! - [`IoResultExt`](context::IoResultExt): `io::Error` to `NetError` conversion

pub mod context;
pub mod neterror;

//! Socket and connection management, after Chromium's `net/socket/`:
//! - [`connectjob`]: DNS → TCP → TLS connection flow
//! - [`client`]: the connected socket type

pub mod client;
pub mod connectjob;

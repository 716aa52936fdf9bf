//! Ergonomic error context helpers.
//!
//! Provides extension traits for turning `io::Error` results into
//! `NetError` codes, logging the detail that the `Copy` error type cannot
//! carry.

use crate::base::neterror::NetError;
use std::io;
use std::path::Path;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Map a failed connection attempt to a connection error code.
    ///
    /// # Example
    /// ```ignore
    /// use cookiesource::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("example.com", 443)?;
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Map a failed filesystem operation to a file error code.
    fn file_context(self, path: &Path) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| {
            tracing::debug!(host = %host, port, error = %e, "connection failed");
            match e.kind() {
                io::ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
                io::ErrorKind::ConnectionReset => NetError::ConnectionReset,
                io::ErrorKind::TimedOut => NetError::ConnectionTimedOut,
                io::ErrorKind::UnexpectedEof => NetError::ConnectionClosed,
                _ => NetError::ConnectionFailed,
            }
        })
    }

    fn file_context(self, path: &Path) -> Result<T, NetError> {
        self.map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "file operation failed");
            match e.kind() {
                io::ErrorKind::NotFound => NetError::FileNotFound,
                io::ErrorKind::PermissionDenied => NetError::AccessDenied,
                io::ErrorKind::InvalidInput => NetError::InvalidArgument,
                _ => NetError::Failed,
            }
        })
    }
}

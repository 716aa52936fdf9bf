use thiserror::Error;

/// Error codes surfaced by the cookie store, the HTTP stack and the
/// data sources.
///
/// Codes follow Chromium's `net_error_list.h` where a matching entry exists.
/// Codes specific to this crate start at -10000 to stay clear of every
/// range Chromium reserves.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    // Generic Errors
    #[error("Operation failed")]
    Failed,
    #[error("Invalid argument")]
    InvalidArgument,
    #[error("File not found")]
    FileNotFound,
    #[error("Operation timed out")]
    TimedOut,
    #[error("Access denied")]
    AccessDenied,

    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("Invalid redirect")]
    InvalidRedirect,
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("Unsafe redirect")]
    UnsafeRedirect,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Request range not satisfiable")]
    RequestRangeNotSatisfiable,
    #[error("Content length mismatch")]
    ContentLengthMismatch,
    #[error("Invalid header")]
    InvalidHeader,

    // Cookie Errors
    #[error("Cookie has an invalid __Secure- or __Host- prefix")]
    CookieInvalidPrefix,
    #[error("Cookie domain is a public suffix")]
    CookiePublicSuffix,

    // Data source Errors
    #[error("Response code {0} is not a success")]
    InvalidResponseCode(u16),
    #[error("Data source is not open")]
    DataSourceNotOpened,
    #[error("Malformed data URI")]
    MalformedDataUri,

    #[error("Unknown error code {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::Failed => -2,
            NetError::InvalidArgument => -4,
            NetError::FileNotFound => -6,
            NetError::TimedOut => -7,
            NetError::AccessDenied => -10,

            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,

            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,
            NetError::UnknownUrlScheme => -302,
            NetError::InvalidRedirect => -303,
            NetError::TooManyRedirects => -310,
            NetError::UnsafeRedirect => -311,
            NetError::InvalidResponse => -320,
            NetError::EmptyResponse => -324,
            NetError::RequestRangeNotSatisfiable => -328,
            NetError::ContentLengthMismatch => -354,

            // Crate specific codes
            NetError::InvalidHeader => -10000,
            NetError::CookieInvalidPrefix => -10001,
            NetError::CookiePublicSuffix => -10002,
            NetError::DataSourceNotOpened => -10003,
            NetError::MalformedDataUri => -10004,
            // Encodes the status so 404 and 500 stay distinguishable.
            NetError::InvalidResponseCode(status) => -11000 - i32::from(*status),
            NetError::Unknown(code) => *code,
        }
    }

    /// Whether the error came from the transport rather than from the
    /// request itself.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            NetError::ConnectionClosed
                | NetError::ConnectionReset
                | NetError::ConnectionRefused
                | NetError::ConnectionFailed
                | NetError::NameNotResolved
                | NetError::SslProtocolError
                | NetError::ConnectionTimedOut
        )
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -2 => NetError::Failed,
            -4 => NetError::InvalidArgument,
            -6 => NetError::FileNotFound,
            -7 => NetError::TimedOut,
            -10 => NetError::AccessDenied,

            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -107 => NetError::SslProtocolError,
            -118 => NetError::ConnectionTimedOut,

            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -302 => NetError::UnknownUrlScheme,
            -303 => NetError::InvalidRedirect,
            -310 => NetError::TooManyRedirects,
            -311 => NetError::UnsafeRedirect,
            -320 => NetError::InvalidResponse,
            -324 => NetError::EmptyResponse,
            -328 => NetError::RequestRangeNotSatisfiable,
            -354 => NetError::ContentLengthMismatch,

            -10000 => NetError::InvalidHeader,
            -10001 => NetError::CookieInvalidPrefix,
            -10002 => NetError::CookiePublicSuffix,
            -10003 => NetError::DataSourceNotOpened,
            -10004 => NetError::MalformedDataUri,
            c if (-11999..=-11000).contains(&c) => match u16::try_from(-11000 - c) {
                Ok(status) => NetError::InvalidResponseCode(status),
                Err(_) => NetError::Unknown(code),
            },
            _ => NetError::Unknown(code),
        }
    }
}

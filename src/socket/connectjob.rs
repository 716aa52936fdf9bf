use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};
use std::time::Duration;
use tokio::net::TcpStream;
use url::Url;

/// Manages the connection process: DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
pub struct ConnectJob;

impl ConnectJob {
    /// Connect to the origin of `url`, giving up after `timeout`.
    pub async fn connect(url: &Url, timeout: Duration) -> Result<SocketType, NetError> {
        match tokio::time::timeout(timeout, Self::connect_inner(url)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(url = %url, ?timeout, "connect timed out");
                Err(NetError::ConnectionTimedOut)
            }
        }
    }

    async fn connect_inner(url: &Url) -> Result<SocketType, NetError> {
        let host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // 1. DNS Resolution
        // IPv6 literals come back bracketed from host_str, which lookup_host accepts.
        let addrs: Vec<_> = tokio::net::lookup_host((host.trim_matches(['[', ']']), port))
            .await
            .map_err(|e| {
                tracing::debug!(domain = %host, error = %e, "DNS resolution failed");
                NetError::NameNotResolved
            })?
            .collect();

        // 2. TCP Connect, first address that answers wins
        let mut last_err = NetError::ConnectionFailed;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await.connection_context(host, port) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = e,
            }
        }
        let stream = stream.ok_or(last_err)?;
        // Media requests are latency sensitive.
        let _ = stream.set_nodelay(true);

        // 3. SSL Handshake (if https)
        if url.scheme() == "https" {
            let mut builder =
                SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;
            builder
                .set_min_proto_version(Some(SslVersion::TLS1_2))
                .map_err(|_| NetError::SslProtocolError)?;
            // HTTP/1.1 only, the transaction speaks nothing else.
            builder
                .set_alpn_protos(b"\x08http/1.1")
                .map_err(|_| NetError::SslProtocolError)?;
            builder.set_verify(SslVerifyMode::PEER);

            let config = builder
                .build()
                .configure()
                .map_err(|_| NetError::SslProtocolError)?;

            let tls_stream = tokio_boring::connect(config, host, stream)
                .await
                .map_err(|e| {
                    tracing::debug!(host = %host, error = ?e, "SSL handshake failed");
                    NetError::SslProtocolError
                })?;

            Ok(SocketType::Ssl(tls_stream))
        } else {
            Ok(SocketType::Tcp(stream))
        }
    }
}

use crate::base::neterror::NetError;
use crate::socket::connectjob::ConnectJob;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Empty;
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::time::Duration;
use url::Url;

/// An HTTP/1.1 connection ready to carry one request.
/// Equivalent to net::HttpStream.
pub struct HttpStream {
    sender: http1::SendRequest<Empty<Bytes>>,
}

impl HttpStream {
    pub async fn send_request(
        &mut self,
        req: Request<Empty<Bytes>>,
    ) -> Result<Response<Incoming>, NetError> {
        self.sender.send_request(req).await.map_err(|e| {
            tracing::debug!(error = %e, "request failed");
            if e.is_timeout() {
                NetError::ConnectionTimedOut
            } else if e.is_incomplete_message() {
                NetError::EmptyResponse
            } else if e.is_parse() {
                NetError::InvalidResponse
            } else {
                NetError::ConnectionClosed
            }
        })
    }
}

/// Opens connections for transactions. Connections are not pooled; a
/// data source keeps its connection for the lifetime of one open().
#[derive(Debug, Clone)]
pub struct HttpStreamFactory {
    connect_timeout: Duration,
}

impl HttpStreamFactory {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub async fn request_stream(&self, url: &Url) -> Result<HttpStream, NetError> {
        let socket = ConnectJob::connect(url, self.connect_timeout).await?;
        tracing::debug!(url = %url, tls = socket.is_tls(), "connected");
        let io = TokioIo::new(socket);

        let (sender, conn) = http1::handshake(io)
            .await
            .map_err(|_| NetError::ConnectionFailed)?;

        // The connection driver must run for the body to be readable.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        Ok(HttpStream { sender })
    }
}

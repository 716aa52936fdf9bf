//! Response body streaming.
//! Mirrors Chromium's HttpStream::ReadResponseBody.

use crate::base::neterror::NetError;
use bytes::{Buf, Bytes, BytesMut};
use http_body_util::BodyExt;
use hyper::body::Incoming;

/// Response body read incrementally into caller buffers.
pub struct ResponseBody {
    inner: Incoming,
    // Remainder of the last frame that did not fit the caller's buffer.
    pending: Bytes,
    finished: bool,
}

impl ResponseBody {
    pub fn new(inner: Incoming) -> Self {
        Self {
            inner,
            pending: Bytes::new(),
            finished: false,
        }
    }

    /// Copy up to `buf.len()` bytes into `buf`. Returns 0 at end of body.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pending.is_empty() {
            if self.finished {
                return Ok(0);
            }
            match self.inner.frame().await {
                Some(Ok(frame)) => {
                    // Trailers carry no payload.
                    if let Ok(data) = frame.into_data() {
                        self.pending = data;
                    }
                }
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "response body read failed");
                    return Err(NetError::ConnectionClosed);
                }
                None => self.finished = true,
            }
        }

        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
        Ok(n)
    }

    /// Read the rest of the body.
    pub async fn bytes(mut self) -> Result<Bytes, NetError> {
        let mut out = BytesMut::from(&self.pending[..]);
        self.pending = Bytes::new();
        if !self.finished {
            let collected = self
                .inner
                .collect()
                .await
                .map_err(|_| NetError::ConnectionClosed)?;
            out.extend_from_slice(&collected.to_bytes());
        }
        Ok(out.freeze())
    }
}

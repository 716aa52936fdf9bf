//! HTTP Response with body access.

use crate::base::neterror::NetError;
use crate::http::responsebody::ResponseBody;
use http::{HeaderMap, StatusCode};
use hyper::body::Incoming;
use url::Url;

/// Final response of a client request, after redirects.
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: ResponseBody,
}

impl HttpResponse {
    pub fn from_hyper(resp: http::Response<Incoming>, url: Url) -> Self {
        let (parts, body) = resp.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            url,
            body: ResponseBody::new(body),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// URL the response was served from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    pub async fn bytes(self) -> Result<bytes::Bytes, NetError> {
        self.body.bytes().await
    }

    pub async fn text(self) -> Result<String, NetError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| NetError::InvalidResponse)
    }
}

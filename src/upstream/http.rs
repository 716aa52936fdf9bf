use crate::base::neterror::NetError;
use crate::http::orderedheaders::OrderedHeaderMap;
use crate::http::responsebody::ResponseBody;
use crate::http::streamfactory::HttpStreamFactory;
use crate::http::transaction::HttpNetworkTransaction;
use crate::upstream::config::HttpDataSourceConfig;
use crate::upstream::datasource::{DataSource, DataSourceFactory, DataSpec, HttpDataSource};
use async_trait::async_trait;
use http::StatusCode;
use url::Url;

/// HTTP(S) data source with caller-controlled request headers.
pub struct DefaultHttpDataSource {
    config: HttpDataSourceConfig,
    request_properties: OrderedHeaderMap,
    uri: Option<Url>,
    body: Option<ResponseBody>,
    response_code: Option<u16>,
    // Servers may ignore Range and answer 200 from the start.
    bytes_to_skip: u64,
    bytes_remaining: Option<u64>,
}

impl DefaultHttpDataSource {
    pub fn new(config: HttpDataSourceConfig) -> Self {
        Self {
            config,
            request_properties: OrderedHeaderMap::new(),
            uri: None,
            body: None,
            response_code: None,
            bytes_to_skip: 0,
            bytes_remaining: None,
        }
    }

    pub fn config(&self) -> &HttpDataSourceConfig {
        &self.config
    }

    fn request_headers(&self, spec: &DataSpec) -> Result<OrderedHeaderMap, NetError> {
        let mut headers = OrderedHeaderMap::new();
        headers.insert("User-Agent", &self.config.user_agent)?;
        headers.insert("Accept-Encoding", "identity")?;
        if let Some(range) = spec.range_header_value() {
            headers.insert("Range", &range)?;
        }
        headers.extend_from(&self.request_properties);
        Ok(headers)
    }

    async fn skip_ignored_range(&mut self) -> Result<(), NetError> {
        let body = self.body.as_mut().ok_or(NetError::DataSourceNotOpened)?;
        let mut scratch = [0u8; 4096];
        while self.bytes_to_skip > 0 {
            let want = scratch.len().min(self.bytes_to_skip as usize);
            let n = read_with_timeout(body, &mut scratch[..want], &self.config).await?;
            if n == 0 {
                return Err(NetError::ContentLengthMismatch);
            }
            self.bytes_to_skip -= n as u64;
        }
        Ok(())
    }
}

async fn read_with_timeout(
    body: &mut ResponseBody,
    buf: &mut [u8],
    config: &HttpDataSourceConfig,
) -> Result<usize, NetError> {
    match tokio::time::timeout(config.read_timeout, body.read(buf)).await {
        Ok(result) => result,
        Err(_) => Err(NetError::ConnectionTimedOut),
    }
}

#[async_trait]
impl DataSource for DefaultHttpDataSource {
    async fn open(&mut self, spec: &DataSpec) -> Result<Option<u64>, NetError> {
        self.close();

        if !matches!(spec.uri.scheme(), "http" | "https") {
            return Err(NetError::DisallowedUrlScheme);
        }

        let mut transaction = HttpNetworkTransaction::new(
            HttpStreamFactory::new(self.config.connect_timeout),
            spec.uri.clone(),
        );
        transaction.set_headers(self.request_headers(spec)?);
        transaction.set_redirect_limit(self.config.max_redirects);
        transaction.set_allow_cross_protocol_redirects(self.config.allow_cross_protocol_redirects);

        let deadline = self.config.connect_timeout + self.config.read_timeout;
        let response = match tokio::time::timeout(deadline, transaction.start()).await {
            Ok(result) => result?,
            Err(_) => return Err(NetError::ConnectionTimedOut),
        };

        let status = response.status();
        self.response_code = Some(status.as_u16());
        tracing::debug!(url = %transaction.url(), status = status.as_u16(), "http data source opened");

        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            return Err(NetError::RequestRangeNotSatisfiable);
        }
        if !status.is_success() {
            return Err(NetError::InvalidResponseCode(status.as_u16()));
        }

        let content_length = response
            .headers()
            .get(http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        self.bytes_to_skip = if status == StatusCode::OK { spec.position } else { 0 };
        self.bytes_remaining = match spec.length {
            Some(length) => Some(length),
            None => content_length.map(|len| len.saturating_sub(self.bytes_to_skip)),
        };
        self.uri = Some(transaction.url().clone());
        self.body = Some(ResponseBody::new(response.into_body()));

        Ok(self.bytes_remaining)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        if self.body.is_none() {
            return Err(NetError::DataSourceNotOpened);
        }
        if self.bytes_to_skip > 0 {
            self.skip_ignored_range().await?;
        }
        if buf.is_empty() || self.bytes_remaining == Some(0) {
            return Ok(0);
        }

        let want = match self.bytes_remaining {
            Some(remaining) => buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX)),
            None => buf.len(),
        };
        let body = self.body.as_mut().ok_or(NetError::DataSourceNotOpened)?;
        let n = read_with_timeout(body, &mut buf[..want], &self.config).await?;

        match self.bytes_remaining.as_mut() {
            Some(remaining) if n == 0 => {
                tracing::debug!(remaining = *remaining, "response ended early");
                Err(NetError::ContentLengthMismatch)
            }
            Some(remaining) => {
                *remaining -= n as u64;
                Ok(n)
            }
            None => Ok(n),
        }
    }

    fn uri(&self) -> Option<&Url> {
        self.uri.as_ref()
    }

    fn close(&mut self) {
        self.body = None;
        self.uri = None;
        self.bytes_to_skip = 0;
        self.bytes_remaining = None;
    }

    fn as_http(&self) -> Option<&dyn HttpDataSource> {
        Some(self)
    }

    fn as_http_mut(&mut self) -> Option<&mut dyn HttpDataSource> {
        Some(self)
    }
}

impl HttpDataSource for DefaultHttpDataSource {
    fn set_request_property(&mut self, name: &str, value: &str) -> Result<(), NetError> {
        self.request_properties.insert(name, value)
    }

    fn clear_request_property(&mut self, name: &str) {
        self.request_properties.remove(name);
    }

    fn clear_all_request_properties(&mut self) {
        self.request_properties.clear();
    }

    fn request_property(&self, name: &str) -> Option<&str> {
        self.request_properties
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    fn response_code(&self) -> Option<u16> {
        self.response_code
    }
}

/// Creates [`DefaultHttpDataSource`]s sharing one configuration and a set
/// of default request properties.
#[derive(Debug, Clone, Default)]
pub struct DefaultHttpDataSourceFactory {
    config: HttpDataSourceConfig,
    default_request_properties: OrderedHeaderMap,
}

impl DefaultHttpDataSourceFactory {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_config(HttpDataSourceConfig::new(user_agent))
    }

    pub fn with_config(config: HttpDataSourceConfig) -> Self {
        Self {
            config,
            default_request_properties: OrderedHeaderMap::new(),
        }
    }

    pub fn config(&self) -> &HttpDataSourceConfig {
        &self.config
    }

    /// Header copied into every source this factory creates.
    pub fn set_default_request_property(&mut self, name: &str, value: &str) -> Result<(), NetError> {
        self.default_request_properties.insert(name, value)
    }

    pub fn create_http_data_source(&self) -> DefaultHttpDataSource {
        let mut source = DefaultHttpDataSource::new(self.config.clone());
        source.request_properties = self.default_request_properties.clone();
        source
    }
}

impl DataSourceFactory for DefaultHttpDataSourceFactory {
    fn create_data_source(&self) -> Result<Box<dyn DataSource>, NetError> {
        Ok(Box::new(self.create_http_data_source()))
    }
}

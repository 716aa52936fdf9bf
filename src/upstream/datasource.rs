use crate::base::neterror::NetError;
use async_trait::async_trait;
use url::Url;

/// The region of a resource a data source is asked to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSpec {
    pub uri: Url,
    /// Byte offset to start reading from.
    pub position: u64,
    /// Number of bytes to read, `None` to read to the end.
    pub length: Option<u64>,
}

impl DataSpec {
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            position: 0,
            length: None,
        }
    }

    pub fn with_position(mut self, position: u64) -> Self {
        self.position = position;
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// `Range` header value for this spec, `None` for the whole resource.
    pub fn range_header_value(&self) -> Option<String> {
        match self.length {
            None if self.position == 0 => None,
            None => Some(format!("bytes={}-", self.position)),
            Some(length) => {
                let end = self.position.saturating_add(length.max(1) - 1);
                Some(format!("bytes={}-{}", self.position, end))
            }
        }
    }
}

/// Reads bytes from a resource for the media pipeline.
///
/// A source is opened once per [`DataSpec`], read until `read` returns 0,
/// then closed. It may be reopened afterwards.
#[async_trait]
pub trait DataSource: Send {
    /// Open the source. Returns the number of bytes that can be read, when
    /// known.
    async fn open(&mut self, spec: &DataSpec) -> Result<Option<u64>, NetError>;

    /// Read into `buf`. Returns 0 at end of input.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError>;

    /// URI being read, after redirects. `None` when closed.
    fn uri(&self) -> Option<&Url>;

    /// Release the resource. Closing a closed source is a no-op.
    fn close(&mut self);

    /// Request header access, for sources that talk HTTP.
    fn as_http(&self) -> Option<&dyn HttpDataSource> {
        None
    }

    fn as_http_mut(&mut self) -> Option<&mut dyn HttpDataSource> {
        None
    }
}

/// A data source whose requests carry caller-controlled headers.
pub trait HttpDataSource: DataSource {
    /// Set a header sent with every request this source makes.
    fn set_request_property(&mut self, name: &str, value: &str) -> Result<(), NetError>;

    fn clear_request_property(&mut self, name: &str);

    fn clear_all_request_properties(&mut self);

    fn request_property(&self, name: &str) -> Option<&str>;

    /// Status code of the last response, once opened.
    fn response_code(&self) -> Option<u16>;
}

/// Produces a fresh data source per playback request.
pub trait DataSourceFactory: Send + Sync {
    fn create_data_source(&self) -> Result<Box<dyn DataSource>, NetError>;
}

/// Read an opened source until end of input.
pub async fn read_to_end(source: &mut dyn DataSource) -> Result<Vec<u8>, NetError> {
    let mut out = Vec::new();
    let mut buf = [0u8; 16 * 1024];
    loop {
        let n = source.read(&mut buf).await?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> DataSpec {
        DataSpec::new(Url::parse("https://example.com/video.m3u8").unwrap())
    }

    #[test]
    fn test_range_header_whole_resource() {
        assert_eq!(spec().range_header_value(), None);
    }

    #[test]
    fn test_range_header_open_ended() {
        let spec = spec().with_position(100);
        assert_eq!(spec.range_header_value().as_deref(), Some("bytes=100-"));
    }

    #[test]
    fn test_range_header_bounded() {
        let spec = spec().with_position(10).with_length(20);
        assert_eq!(spec.range_header_value().as_deref(), Some("bytes=10-29"));

        let spec = self::spec().with_length(1);
        assert_eq!(spec.range_header_value().as_deref(), Some("bytes=0-0"));
    }
}

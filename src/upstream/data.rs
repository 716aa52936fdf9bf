use crate::base::neterror::NetError;
use crate::upstream::datasource::{DataSource, DataSpec};
use async_trait::async_trait;
use base64::Engine;
use bytes::{Buf, Bytes};
use url::{Position, Url};

/// Serves the payload of a `data:` URI from memory.
#[derive(Debug, Default)]
pub struct DataSchemeDataSource {
    uri: Option<Url>,
    data: Bytes,
}

impl DataSchemeDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decode the payload of a `data:[<mediatype>][;base64],<data>` URI.
pub fn decode_data_uri(uri: &Url) -> Result<Vec<u8>, NetError> {
    if uri.scheme() != "data" {
        return Err(NetError::DisallowedUrlScheme);
    }

    let body = &uri[Position::BeforePath..Position::AfterQuery];
    let (metadata, payload) = body.split_once(',').ok_or(NetError::MalformedDataUri)?;
    let decoded: Vec<u8> = percent_encoding::percent_decode_str(payload).collect();

    if metadata.to_ascii_lowercase().ends_with(";base64") {
        let compact: Vec<u8> = decoded
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|_| NetError::MalformedDataUri)
    } else {
        Ok(decoded)
    }
}

#[async_trait]
impl DataSource for DataSchemeDataSource {
    async fn open(&mut self, spec: &DataSpec) -> Result<Option<u64>, NetError> {
        self.close();

        let mut data = Bytes::from(decode_data_uri(&spec.uri)?);
        let total = data.len() as u64;
        if spec.position > total {
            return Err(NetError::InvalidArgument);
        }
        data.advance(spec.position as usize);
        if let Some(length) = spec.length {
            data.truncate(usize::try_from(length).unwrap_or(usize::MAX));
        }

        self.uri = Some(spec.uri.clone());
        self.data = data;
        Ok(Some(self.data.len() as u64))
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        if self.uri.is_none() {
            return Err(NetError::DataSourceNotOpened);
        }
        let n = buf.len().min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data.advance(n);
        Ok(n)
    }

    fn uri(&self) -> Option<&Url> {
        self.uri.as_ref()
    }

    fn close(&mut self) {
        self.uri = None;
        self.data = Bytes::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::datasource::read_to_end;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_decode_plain() {
        assert_eq!(
            decode_data_uri(&url("data:text/plain,hello%20world")).unwrap(),
            b"hello world"
        );
        assert_eq!(decode_data_uri(&url("data:,")).unwrap(), b"");
    }

    #[test]
    fn test_decode_base64() {
        assert_eq!(
            decode_data_uri(&url("data:text/plain;base64,aGVsbG8=")).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_decode_malformed() {
        assert_eq!(
            decode_data_uri(&url("data:text/plain")),
            Err(NetError::MalformedDataUri)
        );
        assert_eq!(
            decode_data_uri(&url("data:;base64,@@@")),
            Err(NetError::MalformedDataUri)
        );
    }

    #[tokio::test]
    async fn test_reads_region() {
        let mut source = DataSchemeDataSource::new();
        let spec = DataSpec::new(url("data:,0123456789"))
            .with_position(2)
            .with_length(3);
        assert_eq!(source.open(&spec).await.unwrap(), Some(3));
        assert_eq!(read_to_end(&mut source).await.unwrap(), b"234");
    }

    #[tokio::test]
    async fn test_position_past_end() {
        let mut source = DataSchemeDataSource::new();
        let spec = DataSpec::new(url("data:,abc")).with_position(4);
        assert_eq!(source.open(&spec).await, Err(NetError::InvalidArgument));
    }
}

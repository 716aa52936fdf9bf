use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::upstream::datasource::{DataSource, DataSpec};
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use url::Url;

/// Reads `file://` URIs from the local filesystem.
#[derive(Debug, Default)]
pub struct FileDataSource {
    file: Option<File>,
    uri: Option<Url>,
    bytes_remaining: u64,
}

impl FileDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` for the region described by `spec`, reporting `spec.uri`
    /// as the source URI.
    pub(crate) async fn open_path(&mut self, path: &Path, spec: &DataSpec) -> Result<u64, NetError> {
        self.close();

        let mut file = File::open(path).await.file_context(path)?;
        let file_len = file.metadata().await.file_context(path)?.len();
        if spec.position > file_len {
            return Err(NetError::InvalidArgument);
        }
        file.seek(SeekFrom::Start(spec.position))
            .await
            .file_context(path)?;

        let available = file_len - spec.position;
        self.bytes_remaining = spec.length.map_or(available, |len| len.min(available));
        self.file = Some(file);
        self.uri = Some(spec.uri.clone());
        Ok(self.bytes_remaining)
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn open(&mut self, spec: &DataSpec) -> Result<Option<u64>, NetError> {
        if spec.uri.scheme() != "file" {
            return Err(NetError::DisallowedUrlScheme);
        }
        let path = spec.uri.to_file_path().map_err(|_| NetError::InvalidUrl)?;
        self.open_path(&path, spec).await.map(Some)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        let file = self.file.as_mut().ok_or(NetError::DataSourceNotOpened)?;
        if buf.is_empty() || self.bytes_remaining == 0 {
            return Ok(0);
        }

        let want = buf.len().min(usize::try_from(self.bytes_remaining).unwrap_or(usize::MAX));
        let n = file.read(&mut buf[..want]).await.map_err(|e| {
            tracing::debug!(error = %e, "file read failed");
            NetError::Failed
        })?;
        if n == 0 {
            // File shrank after open.
            return Err(NetError::ContentLengthMismatch);
        }
        self.bytes_remaining -= n as u64;
        Ok(n)
    }

    fn uri(&self) -> Option<&Url> {
        self.uri.as_ref()
    }

    fn close(&mut self) {
        self.file = None;
        self.uri = None;
        self.bytes_remaining = 0;
    }
}

use crate::base::neterror::NetError;
use crate::upstream::context::AppContext;
use crate::upstream::datasource::{DataSource, DataSpec};
use crate::upstream::file::FileDataSource;
use async_trait::async_trait;
use url::Url;

/// Reads `asset:///` URIs from the application's asset directory.
#[derive(Debug)]
pub struct AssetDataSource {
    context: AppContext,
    inner: FileDataSource,
}

impl AssetDataSource {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            inner: FileDataSource::new(),
        }
    }
}

#[async_trait]
impl DataSource for AssetDataSource {
    async fn open(&mut self, spec: &DataSpec) -> Result<Option<u64>, NetError> {
        let path = self.context.resolve_asset(&spec.uri)?;
        tracing::trace!(uri = %spec.uri, path = %path.display(), "opening asset");
        self.inner.open_path(&path, spec).await.map(Some)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        self.inner.read(buf).await
    }

    fn uri(&self) -> Option<&Url> {
        self.inner.uri()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::datasource::read_to_end;

    #[tokio::test]
    async fn test_reads_asset_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("media")).unwrap();
        std::fs::write(dir.path().join("media/intro.txt"), b"hello asset").unwrap();

        let mut source = AssetDataSource::new(AppContext::new(dir.path()));
        let uri = Url::parse("asset:///media/intro.txt").unwrap();
        let spec = DataSpec::new(uri.clone()).with_position(6);

        assert_eq!(source.open(&spec).await.unwrap(), Some(5));
        assert_eq!(source.uri(), Some(&uri));
        assert_eq!(read_to_end(&mut source).await.unwrap(), b"asset");
    }

    #[tokio::test]
    async fn test_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = AssetDataSource::new(AppContext::new(dir.path()));
        let spec = DataSpec::new(Url::parse("asset:///nope.mp3").unwrap());
        assert_eq!(source.open(&spec).await, Err(NetError::FileNotFound));
    }
}

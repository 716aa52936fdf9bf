use crate::base::neterror::NetError;
use crate::upstream::asset::AssetDataSource;
use crate::upstream::config::HttpDataSourceConfig;
use crate::upstream::context::AppContext;
use crate::upstream::data::DataSchemeDataSource;
use crate::upstream::datasource::{DataSource, DataSourceFactory, DataSpec};
use crate::upstream::file::FileDataSource;
use crate::upstream::http::DefaultHttpDataSource;
use async_trait::async_trait;
use url::Url;

/// Data source that picks a concrete source per opened URI.
///
/// Supports `file`, `asset`, `data`, `http` and `https`. The HTTP source it
/// may hold internally is not reachable through [`DataSource::as_http`], so
/// callers cannot set request headers on it.
pub struct DefaultDataSource {
    context: AppContext,
    config: HttpDataSourceConfig,
    current: Option<Box<dyn DataSource>>,
}

impl DefaultDataSource {
    pub fn new(context: AppContext, config: HttpDataSourceConfig) -> Self {
        Self {
            context,
            config,
            current: None,
        }
    }

    fn source_for(&self, uri: &Url) -> Result<Box<dyn DataSource>, NetError> {
        match uri.scheme() {
            "file" => Ok(Box::new(FileDataSource::new())),
            "asset" => Ok(Box::new(AssetDataSource::new(self.context.clone()))),
            "data" => Ok(Box::new(DataSchemeDataSource::new())),
            "http" | "https" => Ok(Box::new(DefaultHttpDataSource::new(self.config.clone()))),
            other => {
                tracing::debug!(scheme = other, "no data source for scheme");
                Err(NetError::UnknownUrlScheme)
            }
        }
    }
}

#[async_trait]
impl DataSource for DefaultDataSource {
    async fn open(&mut self, spec: &DataSpec) -> Result<Option<u64>, NetError> {
        self.close();
        let mut source = self.source_for(&spec.uri)?;
        let length = source.open(spec).await?;
        self.current = Some(source);
        Ok(length)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        match self.current.as_mut() {
            Some(source) => source.read(buf).await,
            None => Err(NetError::DataSourceNotOpened),
        }
    }

    fn uri(&self) -> Option<&Url> {
        self.current.as_ref().and_then(|source| source.uri())
    }

    fn close(&mut self) {
        if let Some(mut source) = self.current.take() {
            source.close();
        }
    }
}

/// Creates [`DefaultDataSource`]s bound to one application context.
#[derive(Debug, Clone)]
pub struct DefaultDataSourceFactory {
    context: AppContext,
    config: HttpDataSourceConfig,
}

impl DefaultDataSourceFactory {
    pub fn new(context: &AppContext, user_agent: impl Into<String>) -> Self {
        Self::with_config(context, HttpDataSourceConfig::new(user_agent))
    }

    pub fn with_config(context: &AppContext, config: HttpDataSourceConfig) -> Self {
        Self {
            context: context.clone(),
            config,
        }
    }

    pub fn config(&self) -> &HttpDataSourceConfig {
        &self.config
    }
}

impl DataSourceFactory for DefaultDataSourceFactory {
    fn create_data_source(&self) -> Result<Box<dyn DataSource>, NetError> {
        Ok(Box::new(DefaultDataSource::new(
            self.context.clone(),
            self.config.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::datasource::read_to_end;

    fn factory() -> DefaultDataSourceFactory {
        DefaultDataSourceFactory::new(&AppContext::new("/nonexistent"), "Player/1.0")
    }

    #[tokio::test]
    async fn test_dispatches_data_scheme() {
        let mut source = factory().create_data_source().unwrap();
        let spec = DataSpec::new(Url::parse("data:,inline").unwrap());
        assert_eq!(source.open(&spec).await.unwrap(), Some(6));
        assert_eq!(read_to_end(source.as_mut()).await.unwrap(), b"inline");
        source.close();
        assert!(source.uri().is_none());
    }

    #[tokio::test]
    async fn test_unknown_scheme() {
        let mut source = factory().create_data_source().unwrap();
        let spec = DataSpec::new(Url::parse("rtmp://live.example.com/app").unwrap());
        assert_eq!(source.open(&spec).await, Err(NetError::UnknownUrlScheme));
    }

    #[test]
    fn test_hides_http_capability() {
        let mut source = factory().create_data_source().unwrap();
        assert!(source.as_http().is_none());
        assert!(source.as_http_mut().is_none());
    }
}

use crate::base::neterror::NetError;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Application handle given to the generic data sources.
///
/// Bundles the application's packaged asset directory, the root that
/// `asset:///` URIs resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    asset_root: PathBuf,
}

impl AppContext {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Filesystem path of an `asset:///` URI.
    /// Paths that would escape the asset root are refused.
    pub fn resolve_asset(&self, uri: &Url) -> Result<PathBuf, NetError> {
        if uri.scheme() != "asset" {
            return Err(NetError::DisallowedUrlScheme);
        }

        // asset://host/x keeps "host" as part of the asset path.
        let mut relative = PathBuf::new();
        if let Some(host) = uri.host_str().filter(|h| !h.is_empty()) {
            relative.push(host);
        }
        let decoded = percent_encoding::percent_decode_str(uri.path())
            .decode_utf8()
            .map_err(|_| NetError::InvalidUrl)?;
        relative.push(decoded.trim_start_matches('/'));

        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(NetError::AccessDenied),
            }
        }
        if relative.as_os_str().is_empty() {
            return Err(NetError::InvalidUrl);
        }

        Ok(self.asset_root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_resolve_asset() {
        let ctx = AppContext::new("/app/assets");
        assert_eq!(
            ctx.resolve_asset(&url("asset:///media/intro.mp4")).unwrap(),
            PathBuf::from("/app/assets/media/intro.mp4")
        );
        assert_eq!(
            ctx.resolve_asset(&url("asset:///with%20space.mp3")).unwrap(),
            PathBuf::from("/app/assets/with space.mp3")
        );
    }

    #[test]
    fn test_resolve_asset_refuses_escape() {
        let ctx = AppContext::new("/app/assets");
        assert_eq!(
            ctx.resolve_asset(&url("asset:///..%2F..%2Fsecret")),
            Err(NetError::AccessDenied)
        );
    }

    #[test]
    fn test_resolve_asset_requires_path() {
        let ctx = AppContext::new("/app/assets");
        assert_eq!(ctx.resolve_asset(&url("asset:///")), Err(NetError::InvalidUrl));
        assert_eq!(
            ctx.resolve_asset(&url("file:///a.mp4")),
            Err(NetError::DisallowedUrlScheme)
        );
    }
}

//! Where spec documents come from

use crate::error::FetchError;
use std::path::{Component, Path, PathBuf};

/// Source of raw spec text, addressed by public path (`/spec/...`)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SpecSource: Send + Sync {
    /// Fetch the document at `path`
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Static-asset directory standing in for the public root
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create source rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public path onto the root
    ///
    /// # Errors
    /// `FetchError::Traversal` if the path has `..` or a prefix component.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(FetchError::Traversal(path.to_string()));
                }
            }
        }
        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl SpecSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let file = self.resolve(path)?;
        tracing::debug!(path, file = %file.display(), "reading spec");
        tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| FetchError::io_error(file, e))
    }
}

/// Spec documents served over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create source for `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl SpecSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url(path);
        tracing::debug!(%url, "fetching spec");
        let http_error = |source| FetchError::Http {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(http_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_strips_leading_slash() {
        let source = FsSource::new("/srv/public");
        assert_eq!(
            source.resolve("/spec/user-list.screen.json").unwrap(),
            PathBuf::from("/srv/public/spec/user-list.screen.json")
        );
    }

    #[test]
    fn resolve_rejects_parent_components() {
        let source = FsSource::new("/srv/public");
        assert!(matches!(
            source.resolve("/spec/../../etc/passwd"),
            Err(FetchError::Traversal(_))
        ));
    }

    #[tokio::test]
    async fn fs_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("spec")).unwrap();
        std::fs::write(dir.path().join("spec/a.json"), "{}").unwrap();

        let source = FsSource::new(dir.path());
        assert_eq!(source.fetch("/spec/a.json").await.unwrap(), "{}");
        assert!(matches!(
            source.fetch("/spec/missing.json").await,
            Err(FetchError::Io { .. })
        ));
    }

    #[test]
    fn http_url_join() {
        let source = HttpSource::new("http://127.0.0.1:4010/");
        assert_eq!(source.url("/spec/a.json"), "http://127.0.0.1:4010/spec/a.json");
    }
}

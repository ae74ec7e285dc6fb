//! Output sinks: store rendered bytes and hand back a retrievable reference.
//!
//! The export flow only needs "put these bytes somewhere, tell me where".
//! [`LocalDirSink`] writes into the directory the HTTP server exposes under
//! `/static`; another backend (object storage, ...) only has to implement
//! [`OutputSink`].

use crate::error::KitchenError;
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for exported files.
pub trait OutputSink: Send + Sync {
    /// Store `bytes` under `file_name` and return a reference (URL) to it.
    fn store<'a>(
        &'a self,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'a, Result<String, KitchenError>>;
}

/// Writes files into a local directory and returns `<public_prefix>/<file>`.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalDirSink {
    /// `public_prefix` is the absolute URL under which `dir` is served,
    /// e.g. `http://localhost:5001/static`.
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }
}

impl OutputSink for LocalDirSink {
    fn store<'a>(
        &'a self,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'a, Result<String, KitchenError>> {
        async move {
            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| KitchenError::Render {
                    detail: format!(
                        "failed to create output directory '{}': {}",
                        self.dir.display(),
                        e
                    ),
                })?;

            let path = self.dir.join(file_name);
            let size = bytes.len();
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|e| KitchenError::Render {
                    detail: format!("failed to write '{}': {}", path.display(), e),
                })?;

            info!("Wrote {} ({} bytes)", path.display(), size);
            Ok(self.url_for(file_name))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_trailing_slash_is_normalised() {
        let sink = LocalDirSink::new("static", "http://localhost:5001/static/");
        assert_eq!(
            sink.url_for("a.pdf"),
            "http://localhost:5001/static/a.pdf"
        );
    }

    #[test]
    fn store_creates_directory_and_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/static");
        let sink = LocalDirSink::new(&dir, "http://host:1/static");

        let url = tokio_test::block_on(sink.store("plan.pdf", b"%PDF-1.5".to_vec())).unwrap();

        assert_eq!(url, "http://host:1/static/plan.pdf");
        assert_eq!(std::fs::read(dir.join("plan.pdf")).unwrap(), b"%PDF-1.5");
    }
}

//! Local file serving.
//!
//! # Responsibilities
//! - Resolve request paths under the static root
//! - Refuse paths that climb out of the root
//! - Read whole files into memory with their content type

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::config::StaticFilesConfig;
use crate::files::mime::content_type_for;

/// Content type of the root document, whatever its extension.
pub const INDEX_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Errors from resolving or reading a static file.
#[derive(Debug, Error)]
pub enum StaticFileError {
    #[error("path {0:?} leaves the static root")]
    Traversal(String),

    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file loaded into memory, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Serves files from a single root directory.
#[derive(Debug, Clone)]
pub struct StaticFileServer {
    root: PathBuf,
    index_file: String,
}

impl StaticFileServer {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            root: config.root.clone(),
            index_file: config.index_file.clone(),
        }
    }

    /// Map a relative request path onto the root.
    ///
    /// Only normal components (and `.`) are accepted; `..`, absolute paths
    /// and drive prefixes are rejected.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StaticFileError> {
        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StaticFileError::Traversal(relative.to_string()));
                }
            }
        }
        Ok(resolved)
    }

    /// Serve the root document.
    pub async fn serve_index(&self) -> Result<StaticFile, StaticFileError> {
        let path = self.root.join(&self.index_file);
        let body = read_regular_file(&path).await?;
        Ok(StaticFile {
            content_type: INDEX_CONTENT_TYPE.to_string(),
            body,
        })
    }

    /// Serve a file named by a relative request path.
    pub async fn serve_relative(&self, relative: &str) -> Result<StaticFile, StaticFileError> {
        let path = self.resolve(relative)?;
        self.serve(&path).await
    }

    /// Read a file and derive its content type from the extension.
    pub async fn serve(&self, path: &Path) -> Result<StaticFile, StaticFileError> {
        let body = read_regular_file(path).await?;
        Ok(StaticFile {
            content_type: content_type_for(path),
            body,
        })
    }
}

async fn read_regular_file(path: &Path) -> Result<Vec<u8>, StaticFileError> {
    let io_err = |source| StaticFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    if !metadata.is_file() {
        return Err(StaticFileError::NotAFile(path.to_path_buf()));
    }

    tokio::fs::read(path).await.map_err(io_err)
}

//! Downloaded-artifact layout.
//!
//! One file per period, under a directory keyed by year and platform:
//! `<root>/<year>/<platform>/{platform}_{period}.pdf`. Period labels may
//! contain spaces (localized month names); they are normalized to
//! underscores in filenames.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument};

/// Errors writing an artifact to its destination.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// File system error creating directories or writing the file.
    #[error("IO error writing artifact to {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Destination path for one period's artifact.
#[must_use]
pub fn artifact_path(root: &Path, year: i32, platform: &str, period: &str) -> PathBuf {
    let filename = format!("{platform}_{period}.pdf").replace(' ', "_");
    root.join(year.to_string()).join(platform).join(filename)
}

/// Writes `bytes` to the period's destination, creating directories as
/// needed, and returns the written path.
///
/// # Errors
///
/// Returns [`ArtifactError`] when directory creation or the write fails.
#[instrument(skip(root, bytes))]
pub async fn write_artifact(
    root: &Path,
    year: i32,
    platform: &str,
    period: &str,
    bytes: &[u8],
) -> Result<PathBuf, ArtifactError> {
    let path = artifact_path(root, year, platform, period);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|error| ArtifactError::io(parent, error))?;
    }
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|error| ArtifactError::io(path.clone(), error))?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(path)
}

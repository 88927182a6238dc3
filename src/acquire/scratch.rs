//! Scratch-file ownership for in-flight acquisition strategies.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence so concurrent strategies never share a scratch path.
static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// A uniquely named scratch path that removes its file on drop.
///
/// Strategies own the temporary files they create. Engine cancellation is
/// cancellation-by-drop, so cleanup lives in `Drop`: the file is removed on
/// success, on failure, and when a losing strategy is abandoned mid-flight.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Allocates a fresh scratch path under `dir`. No file is created yet;
    /// the strategy writes to the path and the guard removes whatever ends
    /// up there.
    #[must_use]
    pub fn allocate_in(dir: &Path) -> Self {
        let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("artifact-{}-{seq}.part", process::id()));
        Self { path }
    }

    /// The owned scratch path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        // A missing file (never written, or already consumed) is fine.
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_in_yields_distinct_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = ScratchFile::allocate_in(dir.path());
        let b = ScratchFile::allocate_in(dir.path());
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_drop_removes_written_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let scratch = ScratchFile::allocate_in(dir.path());
        std::fs::write(scratch.path(), b"partial download").unwrap();
        let path = scratch.path().to_path_buf();

        drop(scratch);
        assert!(!path.exists(), "scratch file must be removed on drop");
    }

    #[test]
    fn test_drop_tolerates_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let scratch = ScratchFile::allocate_in(dir.path());
        drop(scratch); // nothing was ever written
    }
}

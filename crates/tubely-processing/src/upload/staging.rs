//! Scratch files owned by a single pipeline run.
//!
//! Every path handed out or adopted here is backed by a [`TempPath`], so it is
//! removed when released, when the area is dropped, or when the owning future
//! is cancelled mid-flight.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};

const STAGED_PREFIX: &str = "tubely-upload-";
const STAGED_SUFFIX: &str = ".mp4";

pub struct StagingArea {
    dir: PathBuf,
    files: Vec<TempPath>,
    created: usize,
    removed: usize,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            created: 0,
            removed: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty staged file and open it for writing.
    pub fn create(&mut self) -> io::Result<(tokio::fs::File, PathBuf)> {
        let named = Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(STAGED_SUFFIX)
            .tempfile_in(&self.dir)?;
        let (file, temp_path) = named.into_parts();
        let path = temp_path.to_path_buf();

        self.files.push(temp_path);
        self.created += 1;
        tracing::debug!(path = %path.display(), "Staged file created");

        Ok((tokio::fs::File::from_std(file), path))
    }

    /// Take ownership of a path produced elsewhere, such as a tool's output.
    ///
    /// The file does not need to exist yet. Adopting a tracked path is a no-op.
    pub fn adopt(&mut self, path: impl Into<PathBuf>) -> io::Result<()> {
        let path = path.into();
        if self.position(&path).is_some() {
            return Ok(());
        }
        self.files.push(TempPath::try_from_path(path)?);
        self.created += 1;
        Ok(())
    }

    /// Remove one staged file now.
    pub fn release(&mut self, path: &Path) -> io::Result<()> {
        let Some(index) = self.position(path) else {
            return Ok(());
        };
        let temp_path = self.files.swap_remove(index);
        self.removed += 1;
        close_ignoring_missing(temp_path)
    }

    /// Remove every staged file still tracked. Failures are logged, not returned.
    pub fn release_all(&mut self) {
        for temp_path in self.files.drain(..) {
            let path = temp_path.to_path_buf();
            if let Err(e) = close_ignoring_missing(temp_path) {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove staged file"
                );
            }
            self.removed += 1;
        }
        tracing::debug!(
            created = self.created,
            removed = self.removed,
            "Staging area released"
        );
    }

    /// Number of staged paths not yet released.
    pub fn live_count(&self) -> usize {
        self.files.len()
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.files.iter().position(|p| same_path(p, path))
    }
}

// Tracked paths may have been made absolute on the way in.
fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn close_ignoring_missing(temp_path: TempPath) -> io::Result<()> {
    match temp_path.close() {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

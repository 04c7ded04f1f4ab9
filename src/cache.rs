//! Last-image cache, keyed by session.
//!
//! A scan session remembers the most recent label image so a later scan can
//! run again without re-uploading it. Images are stored as `data:` URLs.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ScanError;

const MAX_SESSION_LEN: usize = 64;

#[async_trait]
pub trait ImageCache: Send + Sync {
    /// The cached image for `session`, if any
    async fn get(&self, session: &str) -> Result<Option<String>, ScanError>;

    /// Replace the cached image for `session`
    async fn set(&self, session: &str, data_url: &str) -> Result<(), ScanError>;

    /// Forget the cached image for `session`; a no-op if nothing is cached
    async fn clear(&self, session: &str) -> Result<(), ScanError>;
}

/// Session ids become file names, so only `[A-Za-z0-9_-]{1,64}` is accepted
fn validate_session(session: &str) -> Result<(), ScanError> {
    let valid = !session.is_empty()
        && session.len() <= MAX_SESSION_LEN
        && session
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ScanError::InvalidSession(session.to_string()))
    }
}

/// In-process cache, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryImageCache {
    images: Mutex<HashMap<String, String>>,
}

impl MemoryImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn images(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Entries are plain strings, so a poisoned map is still consistent.
        self.images.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ImageCache for MemoryImageCache {
    async fn get(&self, session: &str) -> Result<Option<String>, ScanError> {
        validate_session(session)?;
        Ok(self.images().get(session).cloned())
    }

    async fn set(&self, session: &str, data_url: &str) -> Result<(), ScanError> {
        validate_session(session)?;
        self.images()
            .insert(session.to_string(), data_url.to_string());
        Ok(())
    }

    async fn clear(&self, session: &str) -> Result<(), ScanError> {
        validate_session(session)?;
        self.images().remove(session);
        Ok(())
    }
}

/// One file per session under a cache directory
#[derive(Debug, Clone)]
pub struct FileImageCache {
    dir: PathBuf,
}

impl FileImageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, session: &str) -> Result<PathBuf, ScanError> {
        validate_session(session)?;
        Ok(self.dir.join(format!("{}.dataurl", session)))
    }
}

#[async_trait]
impl ImageCache for FileImageCache {
    async fn get(&self, session: &str) -> Result<Option<String>, ScanError> {
        let path = self.entry_path(session)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(data_url) => Ok(Some(data_url)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, session: &str, data_url: &str) -> Result<(), ScanError> {
        let path = self.entry_path(session)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, data_url).await?;
        debug!("Cached image for session '{}' at {}", session, path.display());
        Ok(())
    }

    async fn clear(&self, session: &str) -> Result<(), ScanError> {
        let path = self.entry_path(session)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

//! Session backend stored in a session directory on disk

use super::{CacheResult, SessionBackend};
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Write};
use tempfile::NamedTempFile;
use std::path::{Path, PathBuf};

/// One JSON file per key inside a session directory
///
/// File names are the SHA-256 of the key, so no key can address a path
/// outside the directory. Ending the session removes the directory.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a backend rooted at the given session directory
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.root.join(format!("{}.json", hex::encode(digest)))
    }
}

impl SessionBackend for LocalBackend {
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        match std::fs::read(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, data: Vec<u8>) -> CacheResult<()> {
        std::fs::create_dir_all(&self.root)?;

        // Each writer gets its own temp file, renamed into place when complete
        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(&data)?;
        temp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn values(&self) -> CacheResult<Vec<Vec<u8>>> {
        let read_dir = match std::fs::read_dir(&self.root) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut values = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                values.push(std::fs::read(path)?);
            }
        }
        Ok(values)
    }

    fn clear(&self) -> CacheResult<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

//! In-memory session backend

use super::{CacheResult, SessionBackend};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Session backend held in process memory (tests, server sessions)
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemoryBackend {
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        Ok(data.get(key).cloned())
    }

    fn write(&self, key: &str, data: Vec<u8>) -> CacheResult<()> {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), data);
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn values(&self) -> CacheResult<Vec<Vec<u8>>> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        Ok(data.values().cloned().collect())
    }

    fn clear(&self) -> CacheResult<()> {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::new();

        // Write
        backend.write("discover", b"hello".to_vec()).unwrap();

        // Read
        assert_eq!(backend.read("discover").unwrap(), Some(b"hello".to_vec()));
        assert_eq!(backend.read("missing").unwrap(), None);

        // Overwrite
        backend.write("discover", b"world".to_vec()).unwrap();
        assert_eq!(backend.values().unwrap(), vec![b"world".to_vec()]);

        // Remove is idempotent
        backend.remove("discover").unwrap();
        backend.remove("discover").unwrap();
        assert_eq!(backend.read("discover").unwrap(), None);
    }
}

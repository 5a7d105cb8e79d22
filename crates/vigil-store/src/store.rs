//! Object-store abstraction with in-memory and filesystem backends.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("STORE/io: {0}")]
    Io(#[from] std::io::Error),

    #[error("STORE/serde: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("STORE/{0}")]
    Backend(String),
}

/// Keyed byte storage. Writes are idempotent overwrites; a missing key reads
/// back as `None`, never as an error.
pub trait ObjectStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Keys under a prefix, in lexicographic order.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// In-memory backend for tests and single-process runs.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.objects
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?
            .get(key)
            .cloned())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Filesystem backend rooted at a directory. Keys map directly to relative
/// paths.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path under the root. Absolute keys and keys with
    /// `.` or `..` components never resolve; every returned path stays
    /// inside the root.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(key);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StoreError::Backend(format!(
                "key escapes store root: {:?}",
                key
            )));
        }
        Ok(self.root.join(rel))
    }
}

impl ObjectStore for FsStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.path_for(prefix)?;
        let base = if dir.is_dir() {
            dir
        } else {
            match dir.parent() {
                Some(p) if p.is_dir() => p.to_path_buf(),
                _ => return Ok(Vec::new()),
            }
        };

        let mut keys = Vec::new();
        collect_files(&base, &mut keys)?;

        let mut out: Vec<String> = keys
            .into_iter()
            .filter_map(|p| {
                p.strip_prefix(&self.root)
                    .ok()
                    .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            })
            .filter(|k| k.starts_with(prefix))
            .collect();
        out.sort();
        Ok(out)
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), StoreError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store.put("events/audio/a.json", b"{}").unwrap();
        assert_eq!(store.get("events/audio/a.json").unwrap().unwrap(), b"{}");
        assert_eq!(store.get("events/audio/b.json").unwrap(), None);
    }

    #[test]
    fn memory_store_overwrite_is_idempotent() {
        let store = MemoryStore::new();
        store.put("k", b"one").unwrap();
        store.put("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"two");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_list_is_sorted_by_key() {
        let store = MemoryStore::new();
        store.put("knowledge-base/b.json", b"1").unwrap();
        store.put("knowledge-base/a.json", b"2").unwrap();
        store.put("events/audio/x.json", b"3").unwrap();
        assert_eq!(
            store.list("knowledge-base/").unwrap(),
            vec!["knowledge-base/a.json", "knowledge-base/b.json"]
        );
    }

    #[test]
    fn fs_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("vigil-store-test-{}", std::process::id()));
        let store = FsStore::new(&dir);
        store.put("events/video/a.json", b"{\"x\":1}").unwrap();
        assert_eq!(
            store.get("events/video/a.json").unwrap().unwrap(),
            b"{\"x\":1}"
        );
        assert_eq!(store.get("events/video/missing.json").unwrap(), None);
        assert_eq!(store.list("events/video/").unwrap(), vec![
            "events/video/a.json".to_string()
        ]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn fs_store_rejects_keys_that_leave_the_root() {
        let dir = std::env::temp_dir().join(format!("vigil-store-guard-{}", std::process::id()));
        let store = FsStore::new(dir.join("data"));

        for key in [
            "../outside.json",
            "events/../../outside.json",
            "/etc/outside.json",
            "./outside.json",
        ] {
            assert!(store.put(key, b"{}").is_err(), "put accepted {}", key);
            assert!(store.get(key).is_err(), "get accepted {}", key);
        }
        assert!(store.list("../").is_err());

        // Nothing escaped above the store root.
        assert!(!dir.join("outside.json").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}

use crate::utils::error::{ThumbError, ThumbResult};
use log::debug;
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

/// Flat key/value store of byte blobs.
pub trait Filesystem: Send + Sync {
    fn read(&self, key: &str) -> ThumbResult<Vec<u8>>;

    fn write(&self, key: &str, content: &[u8]) -> ThumbResult<()>;

    fn exists(&self, key: &str) -> bool;

    fn delete(&self, key: &str) -> ThumbResult<()>;

    fn get<'a>(&'a self, key: &str) -> BlobFile<'a>
    where
        Self: Sized,
    {
        BlobFile::new(self, key)
    }
}

pub struct BlobFile<'a> {
    filesystem: &'a dyn Filesystem,
    key: String,
}

impl<'a> BlobFile<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, key: &str) -> Self {
        Self {
            filesystem,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn content(&self) -> ThumbResult<Vec<u8>> {
        self.filesystem.read(&self.key)
    }

    pub fn set_content(&self, content: &[u8]) -> ThumbResult<()> {
        self.filesystem.write(&self.key, content)
    }

    pub fn exists(&self) -> bool {
        self.filesystem.exists(&self.key)
    }
}

/// Keys map to files under a root directory.
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> ThumbResult<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(ThumbError::Storage(format!("Invalid key \"{key}\"")));
        }
        Ok(self.root.join(relative))
    }
}

impl Filesystem for LocalFilesystem {
    fn read(&self, key: &str) -> ThumbResult<Vec<u8>> {
        let path = self.path(key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ThumbError::NotFound(key.to_string()),
            _ => ThumbError::IoError(e),
        })
    }

    fn write(&self, key: &str, content: &[u8]) -> ThumbResult<()> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("Writing {} bytes to {}", content.len(), path.display());
        fs::write(&path, content)?;
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.path(key).is_ok_and(|p| p.is_file())
    }

    fn delete(&self, key: &str) -> ThumbResult<()> {
        let path = self.path(key)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ThumbError::NotFound(key.to_string()),
            _ => ThumbError::IoError(e),
        })
    }
}

#[derive(Default)]
pub struct MemoryFilesystem {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.blobs.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl Filesystem for MemoryFilesystem {
    fn read(&self, key: &str) -> ThumbResult<Vec<u8>> {
        self.blobs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ThumbError::NotFound(key.to_string()))
    }

    fn write(&self, key: &str, content: &[u8]) -> ThumbResult<()> {
        self.blobs.write().insert(key.to_string(), content.to_vec());
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.blobs.read().contains_key(key)
    }

    fn delete(&self, key: &str) -> ThumbResult<()> {
        self.blobs
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ThumbError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let fs = MemoryFilesystem::new();
        let file = fs.get("a/b.jpg");
        assert!(!file.exists());
        file.set_content(b"abc").unwrap();
        assert_eq!(file.content().unwrap(), b"abc");
        assert_eq!(fs.keys(), vec!["a/b.jpg".to_string()]);

        fs.delete("a/b.jpg").unwrap();
        assert!(fs.is_empty());
        assert!(matches!(fs.read("a/b.jpg"), Err(ThumbError::NotFound(_))));
        assert!(matches!(fs.delete("a/b.jpg"), Err(ThumbError::NotFound(_))));
    }

    #[test]
    fn local_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path());

        fs.write("ctx/thumb_1_small.jpg", b"data").unwrap();
        assert!(dir.path().join("ctx/thumb_1_small.jpg").is_file());
        assert!(fs.exists("ctx/thumb_1_small.jpg"));
        assert_eq!(fs.read("ctx/thumb_1_small.jpg").unwrap(), b"data");

        fs.delete("ctx/thumb_1_small.jpg").unwrap();
        assert!(!fs.exists("ctx/thumb_1_small.jpg"));
    }

    #[test]
    fn local_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path());
        assert!(matches!(fs.read("nope.jpg"), Err(ThumbError::NotFound(_))));
    }

    #[test]
    fn local_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path());
        assert!(matches!(fs.write("../x", b""), Err(ThumbError::Storage(_))));
        assert!(matches!(fs.write("/etc/x", b""), Err(ThumbError::Storage(_))));
        assert!(matches!(fs.read(""), Err(ThumbError::Storage(_))));
        assert!(!fs.exists("../x"));
    }
}

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use taskboard_core::storage::{KvStore, KvStoreError};
use tempfile::NamedTempFile;
use tracing::instrument;

/// File-backed store implementing the shared `KvStore` contract.
/// Each key maps to one file under `root`; values are written verbatim.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(sanitize_key(key))
    }
}

#[async_trait]
impl KvStore for FileStore {
    #[instrument(skip_all, fields(key, bytes = value.len()))]
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), KvStoreError> {
        let path = self.path_for(key);
        write_atomically(&path, value)
    }

    #[instrument(skip_all, fields(key))]
    async fn get(&self, key: &str) -> Result<Vec<u8>, KvStoreError> {
        let path = self.path_for(key);
        let mut file = File::open(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                KvStoreError::NotFound {
                    key: key.to_string(),
                }
            } else {
                storage_err(err)
            }
        })?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(storage_err)?;
        Ok(buf)
    }

    #[instrument(skip_all, fields(key))]
    async fn delete(&self, key: &str) -> Result<(), KvStoreError> {
        let path = self.path_for(key);
        match fs::remove_file(path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_err(err)),
        }
    }
}

/// Write to a sibling temp file, then rename over the target so readers never
/// observe a half-written value.
fn write_atomically(path: &Path, value: &[u8]) -> Result<(), KvStoreError> {
    let parent = path.parent().ok_or_else(|| KvStoreError::Storage {
        reason: "invalid storage path".to_string(),
    })?;
    fs::create_dir_all(parent).map_err(storage_err)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
    tmp.write_all(value).map_err(storage_err)?;
    tmp.flush().map_err(storage_err)?;
    tmp.persist(path).map_err(|e| storage_err(e.error))?;
    Ok(())
}

/// Keys may contain `/`; encode them into a flat, filesystem-safe name.
fn sanitize_key(key: &str) -> String {
    URL_SAFE_NO_PAD.encode(key)
}

fn storage_err<E: ToString>(err: E) -> KvStoreError {
    KvStoreError::Storage {
        reason: err.to_string(),
    }
}

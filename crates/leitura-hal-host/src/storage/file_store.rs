use std::{
    fs, io,
    path::{Path, PathBuf},
};

use leitura_core::persistence::KeyValueStore;
use log::debug;

const FILE_EXTENSION: &str = "json";
const FALLBACK_FILE_STEM: &str = "state";

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("failed to create data dir {}: {}", .path.display(), .source)]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to remove {}: {}", .path.display(), .source)]
    Remove { path: PathBuf, source: io::Error },
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Opens the store, creating `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FileStoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        debug!("file-store: open dir={}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem_for_key(key), FILE_EXTENSION))
    }
}

/// `@reading_app_state` -> `reading_app_state`.
pub fn file_stem_for_key(key: &str) -> String {
    let mapped: String = key
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = mapped.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

impl KeyValueStore for FileKvStore {
    type Error = FileStoreError;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStoreError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).map_err(|source| FileStoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| FileStoreError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("file-store: wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileStoreError::Remove { path, source }),
        }
    }
}

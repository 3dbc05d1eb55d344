use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pairs_core::{KeyValueStore, StorageError};

/// One JSON file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(StorageError(format!("invalid key {key:?}")))
        }
    }
}

fn storage_error(err: std::io::Error) -> StorageError {
    StorageError(err.to_string())
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error(err)),
        }
    }

    /// Goes through a temporary file and a rename.
    fn write(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(storage_error)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(storage_error)?;
        fs::rename(&tmp, &path).map_err(storage_error)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(storage_error(err)),
            _ => Ok(()),
        }
    }
}

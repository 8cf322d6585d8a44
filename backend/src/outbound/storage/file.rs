//! JSON file storage for a single browsing context.
//!
//! The whole key space lives in one JSON object. Every write rewrites the
//! file through a staging name and a rename so a crash never leaves a torn
//! document behind. The file has no change feed: watchers are closed.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{KeyValueStore, StorageError, StorageWatch};

/// Key-value storage persisted as a JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    directory: Dir,
    file_name: OsString,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open storage backed by `path`, creating its parent directory when
    /// missing. The file itself is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                StorageError::unavailable(format!("{} has no file name", path.display()))
            })?
            .to_os_string();

        Dir::create_ambient_dir_all(&parent, ambient_authority())
            .map_err(|error| io_error(&parent, &error))?;
        let directory = Dir::open_ambient_dir(&parent, ambient_authority())
            .map_err(|error| io_error(&parent, &error))?;

        Ok(Self {
            path,
            directory,
            file_name,
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match self.directory.read_to_string(Path::new(&self.file_name)) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(io_error(&self.path, &error)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            StorageError::corrupt(format!("{}: {error}", self.path.display()))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let document = serde_json::to_vec_pretty(entries)
            .map_err(|error| StorageError::corrupt(error.to_string()))?;
        let staging = format!(".tmp-mivo-storage-{}", Uuid::new_v4().simple());
        self.directory
            .write(&staging, &document)
            .map_err(|error| io_error(&self.path, &error))?;
        if let Err(error) = self
            .directory
            .rename(&staging, &self.directory, Path::new(&self.file_name))
        {
            let _cleanup = self.directory.remove_file(&staging);
            return Err(io_error(&self.path, &error));
        }
        debug!(path = %self.path.display(), keys = entries.len(), "storage written");
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::unavailable("file storage lock poisoned"))?;
        let mut entries = self.read_entries()?;
        if apply(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

fn io_error(path: &Path, error: &io::Error) -> StorageError {
    StorageError::unavailable(format!("{}: {error}", path.display()))
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            let previous = entries.insert(key.to_owned(), value.to_owned());
            previous.as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn watch(&self) -> StorageWatch {
        StorageWatch::closed()
    }
}

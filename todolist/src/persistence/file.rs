//! File-backed implementation of [`PersistenceAdapter`].
//!
//! Each key maps to `<data_dir>/<key>.json`. Writes go to a hidden temp file
//! in the same directory which is then renamed over the target, so a slot
//! is always either the old or the new value in full.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::{MAX_BACKUPS, PersistenceAdapter, PersistenceError, backup_key};

/// Stores each key as a JSON file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file store rooted at `dir`.
    ///
    /// The directory does not need to exist yet; it is created on the
    /// first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::InvalidKey`] unless the key is non-empty,
    /// does not start with `.`, and only contains ASCII alphanumerics, `-`,
    /// `_` or `.`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        if !is_valid_key(key) {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Copy raw bytes into the first unused backup slot for `key`.
    ///
    /// Existing backups are never overwritten. Returns the backup key.
    fn write_backup(&self, key: &str, bytes: &[u8]) -> Result<String, PersistenceError> {
        for n in 0..MAX_BACKUPS {
            let candidate = backup_key(key, n);
            let path = self.path_for(&candidate)?;
            let mut file = match std::fs::File::options()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Self::io_error(&path, e)),
            };
            file.write_all(bytes)
                .and_then(|()| file.sync_all())
                .map_err(|e| Self::io_error(&path, e))?;
            return Ok(candidate);
        }
        Err(PersistenceError::Unavailable(format!(
            "all {MAX_BACKUPS} backup slots for {key:?} are taken"
        )))
    }

    fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl PersistenceAdapter for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(&path, e)),
        };

        match String::from_utf8(bytes) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), bytes = contents.len(), "loaded slot");
                Ok(Some(contents))
            }
            Err(err) => {
                let backup_key = self.write_backup(key, err.as_bytes())?;
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup_key,
                    "slot is not valid UTF-8, raw bytes backed up"
                );
                Err(PersistenceError::NotUtf8 { path, backup_key })
            }
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;

        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        let result = write_then_rename(&tmp_path, &path, value.as_bytes());
        if result.is_err() {
            // The temp file may or may not exist at this point.
            let _ = std::fs::remove_file(&tmp_path);
        }
        result?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "saved slot");
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, PersistenceError> {
        let path = self.path_for(key)?;
        path.try_exists().map_err(|e| Self::io_error(&path, e))
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let mut tmp = std::fs::File::create(tmp_path).map_err(|e| FileStorage::io_error(tmp_path, e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.sync_all())
        .map_err(|e| FileStorage::io_error(tmp_path, e))?;
    drop(tmp);
    std::fs::rename(tmp_path, path).map_err(|e| FileStorage::io_error(path, e))
}

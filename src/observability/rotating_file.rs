//! Append-only line file with size-based rotation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Rotate once the file grows past 10 MiB.
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated copies kept next to the live file.
const MAX_BACKUP_FILES: usize = 3;

/// Line writer that renames the file to `<name>.<unix-ts>` when it gets too
/// large and prunes old copies. The handle opens lazily on first write.
pub struct RotatingFile {
    path: PathBuf,
    handle: Mutex<Option<File>>,
}

impl RotatingFile {
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            handle: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        if fs::metadata(&self.path).is_ok_and(|meta| meta.len() > MAX_FILE_SIZE_BYTES) {
            *handle = None;
            self.rotate()?;
        }

        if handle.is_none() {
            *handle = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let file = handle
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn rotate(&self) -> io::Result<()> {
        let suffix = chrono::Utc::now().timestamp();
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Invalid file name"))?
            .to_string();

        if self.path.exists() {
            fs::rename(&self.path, self.path.with_file_name(format!("{file_name}.{suffix}")))?;
        }

        let Some(dir) = self.path.parent() else {
            return Ok(());
        };
        Self::prune(dir, &format!("{file_name}."))
    }

    /// Deletes all but the newest backups. Individual failures are ignored.
    fn prune(dir: &Path, prefix: &str) -> io::Result<()> {
        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(prefix))
            })
            .collect();

        backups.sort_by_key(|path| std::cmp::Reverse(fs::metadata(path).and_then(|m| m.modified()).ok()));

        for stale in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(stale);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

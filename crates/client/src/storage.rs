//! Best-effort durable key/value storage.
//!
//! Every persisted piece of console state (tokens, profile, filters, theme)
//! lives under its own string key. Storage is never authoritative: reads of
//! missing or unreadable data yield `None` and write failures are logged and
//! swallowed.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";
pub const THEME_KEY: &str = "theme-dark";

/// String key/value storage that never fails.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("{what} mutex was poisoned, recovering with into_inner()");
        poisoned.into_inner()
    })
}

/// In-process storage, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.values, "memory store").contains_key(key)
    }

    pub fn len(&self) -> usize {
        lock(&self.values, "memory store").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values, "memory store").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.values, "memory store").insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock(&self.values, "memory store").remove(key);
    }
}

/// Storage backed by a single JSON object on disk.
///
/// The whole map is rewritten on every change through a temp file that is
/// renamed into place. The file holds credentials, so on Unix it is created
/// with mode 0600.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing, unreadable or corrupt file is
    /// treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read state file");
                BTreeMap::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) {
        if let Err(e) = write_state_file(&self.path, values) {
            warn!(path = %self.path.display(), error = %e, "failed to write state file");
        }
    }
}

fn write_state_file(path: &Path, values: &BTreeMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(values).map_err(std::io::Error::other)?;

    // Readers see either the old file or the new one, never a partial write.
    let temp_path = temp_path_for(path);
    let result = write_synced(&temp_path, content.as_bytes())
        .and_then(|()| std::fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

/// Sibling temp path, unique per process and write.
fn temp_path_for(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.tmp.{}.{n}", std::process::id()))
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values, "file store").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = lock(&self.values, "file store");
        if values.get(key).map(String::as_str) == Some(value) {
            return;
        }
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = lock(&self.values, "file store");
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }
}

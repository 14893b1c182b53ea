//! Snapshot persistence for entity stores.
//!
//! A store hands its full contents (sorted by id) to [`Persistence::save`]
//! after every mutation and reads them back once with [`Persistence::load`]
//! when it is opened.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Whole-collection snapshot storage for one entity kind.
pub trait Persistence<T>: Send + Sync {
    /// Read the last saved snapshot. A snapshot that was never written is empty.
    fn load(&self) -> Result<Vec<T>>;

    /// Replace the snapshot with `items`.
    fn save(&self, items: &[&T]) -> Result<()>;

    /// Human-readable location used in logs and error messages.
    fn location(&self) -> String;
}

/// One pretty-printed JSON array per file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Bind to `path`, creating its parent directories.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::persistence(parent.display(), e))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Persistence<T> for JsonFilePersistence
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::persistence(self.path.display(), e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| Error::persistence(self.path.display(), e))
    }

    fn save(&self, items: &[&T]) -> Result<()> {
        write_json_atomic(&self.path, items)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serialize `value` as pretty JSON into a sibling temp file, then rename it over `path`.
///
/// Readers see either the previous document or the new one, never a partial write.
pub fn write_json_atomic<V: Serialize + ?Sized>(path: &Path, value: &V) -> Result<()> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| Error::persistence(path.display(), e))?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(Error::persistence(path.display(), e));
    }
    Ok(())
}

/// Process-local snapshot holder. Clones share the same snapshot.
///
/// Writes can be switched to fail, which is how store rollback is exercised.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    snapshot: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the snapshot, as if a previous process had saved `items`.
    pub fn with_items<T: Serialize>(items: &[T]) -> Result<Self> {
        let json =
            serde_json::to_string(items).map_err(|e| Error::persistence("memory", e))?;
        let persistence = Self::new();
        *persistence.lock_snapshot()? = Some(json);
        Ok(persistence)
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    /// Decode the current snapshot.
    pub fn snapshot<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        match self.lock_snapshot()?.as_deref() {
            Some(json) => serde_json::from_str(json).map_err(|e| Error::persistence("memory", e)),
            None => Ok(Vec::new()),
        }
    }

    fn lock_snapshot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.inner
            .snapshot
            .lock()
            .map_err(|_| Error::LockPoisoned("snapshot"))
    }
}

impl<T> Persistence<T> for InMemoryPersistence
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>> {
        self.snapshot()
    }

    fn save(&self, items: &[&T]) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::persistence("memory", "write rejected"));
        }
        let json = serde_json::to_string(items).map_err(|e| Error::persistence("memory", e))?;
        *self.lock_snapshot()? = Some(json);
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

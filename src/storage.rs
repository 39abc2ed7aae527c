//! Key-value persistence.
//!
//! Each namespace key maps to one serialized JSON record. There is exactly
//! one logical writer (the current session), writes are synchronous and
//! local, and a record that is absent or unreadable degrades to the type's
//! default instead of failing. Ledgers call [`persist`] at the end of every
//! mutation, overwriting the prior record.

use std::{collections::HashMap, fs, io, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

pub const CART_KEY: &str = "qa_cart";
pub const FAVORITES_KEY: &str = "qa_favorites";

pub trait Store {
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        (**self).write(key, value)
    }
}

/// One JSON file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)
    }
}

/// Non-durable store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and deserialize the record under `key`, substituting the default
/// when the record is absent, unreadable, or unparsable.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!("Failed to read {key}: {e}");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Corrupt record under {key}, starting from default: {e}");
        T::default()
    })
}

pub fn persist<T, S>(store: &mut S, key: &str, value: &T) -> io::Result<()>
where
    T: Serialize,
    S: Store + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(io::Error::other)?;
    store.write(key, &raw)
}

use crate::error::{Result, TrackerError};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

pub const REPOS_KEY: &str = "repos";
pub const TOKEN_KEY: &str = "github_token";

/// Persistence seam for a single value.
pub trait Store<T> {
    fn load(&self) -> Result<Option<T>>;
    fn save(&self, value: &T) -> Result<()>;
}

/// String-keyed storage backed by one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(TrackerError::Storage(format!("invalid key: {key:?}")));
        }
        Ok(self.dir.join(key))
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)?) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // rename over the old file so a crash never leaves half a value behind
        let tmp = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        tracing::trace!(key, bytes = value.len(), "storage write");
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// JSON-serialized value under one key.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    storage: LocalStorage,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T> {
    pub fn new(storage: LocalStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Store<T> for JsonStore<T> {
    fn load(&self) -> Result<Option<T>> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set_item(&self.key, &raw)
    }
}

/// The raw token string, stored verbatim.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: LocalStorage,
}

impl TokenStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(TOKEN_KEY)
    }
}

impl Store<String> for TokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.storage.get_item(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    fn save(&self, value: &String) -> Result<()> {
        self.storage.set_item(TOKEN_KEY, value)
    }
}

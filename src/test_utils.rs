#![cfg(test)]

use crate::error::{Result, TrackerError};
use crate::github::client::RepoLookup;
use crate::github::types::RepoMetadata;
use crate::storage::Store;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn metadata(full_name: &str) -> RepoMetadata {
    RepoMetadata {
        full_name: full_name.to_string(),
        html_url: Some(format!("https://github.com/{full_name}")),
    }
}

/// Shared in-memory store; clones see the same value.
#[derive(Clone)]
pub struct MemoryStore<T> {
    value: Arc<Mutex<Option<T>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
    fail_loads: Arc<AtomicBool>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            value: Arc::new(Mutex::new(None)),
            writes: Arc::new(AtomicUsize::new(0)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_loads: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn with_value(value: T) -> Self {
        let store = Self::default();
        *store.value.lock().unwrap() = Some(value);
        store
    }

    pub fn value(&self) -> Option<T> {
        self.value.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }
}

impl<T: Clone> Store<T> for MemoryStore<T> {
    fn load(&self) -> Result<Option<T>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(TrackerError::Storage("load failed".into()));
        }
        Ok(self.value())
    }

    fn save(&self, value: &T) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrackerError::Storage("write failed".into()));
        }
        *self.value.lock().unwrap() = Some(value.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Lookup answering from a fixed table and recording every identifier asked.
#[derive(Default)]
pub struct ScriptedLookup {
    answers: HashMap<String, std::result::Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found(mut self, identifier: &str, full_name: &str) -> Self {
        self.answers
            .insert(identifier.to_string(), Ok(full_name.to_string()));
        self
    }

    pub fn failing(mut self, identifier: &str, message: &str) -> Self {
        self.answers
            .insert(identifier.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RepoLookup for ScriptedLookup {
    async fn fetch_repo(&self, identifier: &str) -> Result<RepoMetadata> {
        self.calls.lock().unwrap().push(identifier.to_string());
        match self.answers.get(identifier) {
            Some(Ok(name)) => Ok(metadata(name)),
            Some(Err(message)) => Err(TrackerError::remote(message.clone())),
            None => Err(TrackerError::remote("Not Found")),
        }
    }
}

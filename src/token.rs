use crate::error::Result;
use crate::github::client::ClientConfig;
use crate::storage::Store;

/// Owns the persisted token and keeps the client config in step with it.
pub struct TokenManager<S> {
    store: S,
    token: Option<String>,
}

impl<S: Store<String>> TokenManager<S> {
    /// Stored token first, then `fallback` (config or environment).
    pub fn load(store: S, fallback: Option<String>) -> Self {
        let stored = match store.load() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "stored token unreadable");
                None
            }
        };
        Self {
            store,
            token: stored.or(fallback),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.token.is_some()
    }

    pub fn apply(&self, config: &mut ClientConfig) {
        config.set_token(self.token.clone());
    }

    /// Persists a non-blank token and applies it. Returns false for blank input.
    pub fn save(&mut self, value: &str, config: &mut ClientConfig) -> Result<bool> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        self.store.save(&value.to_string())?;
        self.token = Some(value.to_string());
        self.apply(config);
        tracing::debug!("token saved");
        Ok(true)
    }
}

impl TokenManager<crate::storage::TokenStore> {
    pub fn clear(&mut self, config: &mut ClientConfig) -> Result<()> {
        self.store.clear()?;
        self.token = None;
        self.apply(config);
        tracing::debug!("token cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStorage, TokenStore};
    use crate::test_utils::MemoryStore;

    #[test]
    fn stored_token_wins_over_fallback() {
        let store = MemoryStore::with_value("stored".to_string());
        let tokens = TokenManager::load(store, Some("env".into()));
        assert_eq!(tokens.current(), Some("stored"));
    }

    #[test]
    fn fallback_used_when_nothing_stored() {
        let tokens = TokenManager::load(MemoryStore::<String>::default(), Some("env".into()));
        assert_eq!(tokens.current(), Some("env"));

        let tokens = TokenManager::load(MemoryStore::<String>::default(), None);
        assert!(!tokens.is_set());
    }

    #[test]
    fn save_persists_and_updates_config() {
        let store = MemoryStore::<String>::default();
        let mut tokens = TokenManager::load(store.clone(), None);
        let mut config = ClientConfig::default();

        assert!(tokens.save("  ghp_new  ", &mut config).unwrap());
        assert_eq!(store.value().as_deref(), Some("ghp_new"));
        assert_eq!(config.token(), Some("ghp_new"));
    }

    #[test]
    fn blank_save_is_ignored() {
        let store = MemoryStore::<String>::default();
        let mut tokens = TokenManager::load(store.clone(), None);
        let mut config = ClientConfig::default();

        assert!(!tokens.save("   ", &mut config).unwrap());
        assert_eq!(store.writes(), 0);
        assert!(config.token().is_none());
    }

    #[test]
    fn clear_removes_token_and_header() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(LocalStorage::new(tmp.path()));
        let mut tokens = TokenManager::load(store.clone(), None);
        let mut config = ClientConfig::default();

        tokens.save("ghp_x", &mut config).unwrap();
        tokens.clear(&mut config).unwrap();

        assert!(!tokens.is_set());
        assert!(config.token().is_none());
        assert!(store.load().unwrap().is_none());
    }
}

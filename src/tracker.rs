use crate::error::{Result, TrackerError};
use crate::github::client::{validate_identifier, RepoLookup};
use crate::github::types::RepoMetadata;
use crate::storage::Store;
use serde::{Deserialize, Serialize};

pub const EMPTY_INPUT_MESSAGE: &str = "you need to specify a repository";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRepository {
    /// Canonical `owner/repo` as returned by the API.
    pub name: String,
}

impl TrackedRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}", self.name)
    }
}

/// Ticket for an accepted add; only [`RepoList::begin_add`] hands these out.
#[derive(Debug)]
pub struct PendingAdd {
    identifier: String,
}

impl PendingAdd {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// The tracked list plus the form state bound to it. Every change to the list
/// is written through `store` in full.
pub struct RepoList<S> {
    store: S,
    repositories: Vec<TrackedRepository>,
    input: String,
    is_loading: bool,
    error_message: Option<String>,
}

impl<S: Store<Vec<TrackedRepository>>> RepoList<S> {
    pub fn load(store: S) -> Self {
        let (repositories, error_message) = match store.load() {
            Ok(repos) => (repos.unwrap_or_default(), None),
            Err(e) => {
                tracing::warn!(error = %e, "persisted repository list unreadable, starting empty");
                (Vec::new(), Some(format!("could not read saved repositories: {e}")))
            }
        };

        Self {
            store,
            repositories,
            input: String::new(),
            is_loading: false,
            error_message,
        }
    }

    pub fn repositories(&self) -> &[TrackedRepository] {
        &self.repositories
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the form input. Editing clears any shown error.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.error_message = None;
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
        self.error_message = None;
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
        self.error_message = None;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.repositories.iter().any(|r| r.name == name)
    }

    /// Validates `identifier` and marks the list as loading. The caller then
    /// fetches metadata and hands the outcome to [`RepoList::finish_add`].
    pub fn begin_add(&mut self, identifier: &str) -> Result<PendingAdd> {
        if self.is_loading {
            return Err(TrackerError::Busy);
        }
        self.error_message = None;

        let check = if identifier.is_empty() {
            Err(TrackerError::Validation(EMPTY_INPUT_MESSAGE.to_string()))
        } else if self.contains(identifier) {
            Err(TrackerError::Duplicate(identifier.to_string()))
        } else {
            validate_identifier(identifier)
        };

        if let Err(e) = check {
            tracing::debug!(identifier, error = %e, "add rejected");
            self.error_message = Some(e.to_string());
            return Err(e);
        }

        self.is_loading = true;
        Ok(PendingAdd {
            identifier: identifier.to_string(),
        })
    }

    /// Applies a finished lookup. Returns the stored full name on success.
    pub fn finish_add(
        &mut self,
        pending: PendingAdd,
        result: Result<RepoMetadata>,
    ) -> Result<String> {
        self.is_loading = false;

        let outcome = result.and_then(|meta| {
            // the canonical name can differ from what was typed
            if self.contains(&meta.full_name) {
                Err(TrackerError::Duplicate(meta.full_name))
            } else {
                tracing::debug!(html_url = ?meta.html_url, "lookup resolved");
                Ok(meta.full_name)
            }
        });

        let name = match outcome {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(identifier = pending.identifier(), error = %e, "add failed");
                self.error_message = Some(e.to_string());
                return Err(e);
            }
        };

        tracing::debug!(identifier = pending.identifier(), full_name = %name, "repository added");
        self.repositories.push(TrackedRepository::new(name.clone()));
        self.input.clear();
        self.persist()?;
        Ok(name)
    }

    pub async fn add<L: RepoLookup>(&mut self, lookup: &L, identifier: &str) -> Result<String> {
        let pending = self.begin_add(identifier)?;
        let result = lookup.fetch_repo(pending.identifier()).await;
        self.finish_add(pending, result)
    }

    /// Drops every entry named `identifier`. Returns how many were removed.
    pub fn remove(&mut self, identifier: &str) -> Result<usize> {
        let before = self.repositories.len();
        self.repositories.retain(|r| r.name != identifier);
        let removed = before - self.repositories.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&mut self) -> Result<()> {
        if let Err(e) = self.store.save(&self.repositories) {
            tracing::warn!(error = %e, "failed to save repository list");
            self.error_message = Some(e.to_string());
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn list_with(names: &[&str]) -> (RepoList<MemoryStore<Vec<TrackedRepository>>>, MemoryStore<Vec<TrackedRepository>>) {
        let store = MemoryStore::with_value(names.iter().map(|n| TrackedRepository::new(*n)).collect());
        (RepoList::load(store.clone()), store)
    }

    fn names(list: &RepoList<MemoryStore<Vec<TrackedRepository>>>) -> Vec<&str> {
        list.repositories().iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn add_appends_canonical_name_and_clears_input() {
        let (mut list, store) = list_with(&["a/b"]);
        let lookup = ScriptedLookup::new().found("Rust-Lang/Rust", "rust-lang/rust");

        list.set_input("Rust-Lang/Rust");
        let input = list.input().to_string();
        let name = list.add(&lookup, &input).await.unwrap();

        assert_eq!(name, "rust-lang/rust");
        assert_eq!(names(&list), vec!["a/b", "rust-lang/rust"]);
        assert_eq!(list.input(), "");
        assert!(!list.is_loading());
        assert!(list.error_message().is_none());
        assert_eq!(lookup.calls(), vec!["Rust-Lang/Rust"]);
        assert_eq!(store.value().unwrap(), list.repositories().to_vec());
    }

    #[tokio::test]
    async fn duplicate_is_rejected_without_fetch() {
        let (mut list, store) = list_with(&["a/b", "c/d"]);
        let lookup = ScriptedLookup::new().found("a/b", "a/b");

        let err = list.add(&lookup, "a/b").await.unwrap_err();
        assert!(matches!(err, TrackerError::Duplicate(_)));
        assert_eq!(names(&list), vec!["a/b", "c/d"]);
        assert!(list.error_message().is_some());
        assert!(lookup.calls().is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn duplicate_match_is_case_sensitive() {
        let (mut list, _store) = list_with(&["a/b"]);
        let lookup = ScriptedLookup::new().found("A/B", "A/B");

        list.add(&lookup, "A/B").await.unwrap();
        assert_eq!(names(&list), vec!["a/b", "A/B"]);
    }

    #[tokio::test]
    async fn canonical_name_already_tracked_is_duplicate() {
        let (mut list, _store) = list_with(&["rust-lang/rust"]);
        let lookup = ScriptedLookup::new().found("Rust-Lang/Rust", "rust-lang/rust");

        list.set_input("Rust-Lang/Rust");
        let err = list.add(&lookup, "Rust-Lang/Rust").await.unwrap_err();
        assert!(matches!(err, TrackerError::Duplicate(ref n) if n == "rust-lang/rust"));
        assert_eq!(names(&list), vec!["rust-lang/rust"]);
        assert_eq!(list.input(), "Rust-Lang/Rust");
    }

    #[tokio::test]
    async fn empty_input_is_a_validation_error() {
        let (mut list, _store) = list_with(&["a/b"]);
        let lookup = ScriptedLookup::new();

        let err = list.add(&lookup, "").await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert_eq!(list.error_message(), Some(EMPTY_INPUT_MESSAGE));
        assert_eq!(names(&list), vec!["a/b"]);
        assert!(lookup.calls().is_empty());
        assert!(!list.is_loading());
    }

    #[tokio::test]
    async fn failed_lookup_leaves_list_unchanged() {
        let (mut list, store) = list_with(&["a/b"]);
        let lookup = ScriptedLookup::new().failing("nobody/nothing", "Not Found");

        list.set_input("nobody/nothing");
        let err = list.add(&lookup, "nobody/nothing").await.unwrap_err();
        assert!(matches!(err, TrackerError::GitHub(_)));
        assert_eq!(list.error_message(), Some("Not Found"));
        assert_eq!(names(&list), vec!["a/b"]);
        assert_eq!(list.input(), "nobody/nothing");
        assert!(!list.is_loading());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn second_add_while_loading_is_busy() {
        let (mut list, _store) = list_with(&[]);
        let pending = list.begin_add("a/b").unwrap();
        assert!(list.is_loading());

        assert!(matches!(list.begin_add("c/d"), Err(TrackerError::Busy)));
        assert!(list.is_loading());

        list.finish_add(pending, Ok(metadata("a/b"))).unwrap();
        assert!(!list.is_loading());
        assert!(list.begin_add("c/d").is_ok());
    }

    #[test]
    fn editing_input_clears_error() {
        let (mut list, _store) = list_with(&["a/b"]);
        let _ = list.begin_add("a/b");
        assert!(list.error_message().is_some());
        list.push_input('x');
        assert!(list.error_message().is_none());

        let _ = list.begin_add("");
        list.dismiss_error();
        assert!(list.error_message().is_none());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let (mut list, store) = list_with(&["a/b", "c/d", "e/f"]);
        assert_eq!(list.remove("c/d").unwrap(), 1);
        assert_eq!(names(&list), vec!["a/b", "e/f"]);
        assert_eq!(store.value().unwrap(), list.repositories().to_vec());
    }

    #[test]
    fn remove_missing_is_noop() {
        let (mut list, store) = list_with(&["a/b", "c/d"]);
        assert_eq!(list.remove("x/y").unwrap(), 0);
        assert_eq!(list.remove("A/B").unwrap(), 0);
        assert_eq!(names(&list), vec!["a/b", "c/d"]);
        assert!(list.error_message().is_none());
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn reload_reconstructs_list() {
        let store = MemoryStore::default();
        let lookup = ScriptedLookup::new()
            .found("a/b", "a/b")
            .found("c/d", "c/d")
            .found("e/f", "e/f");

        let mut list = RepoList::load(store.clone());
        list.add(&lookup, "a/b").await.unwrap();
        list.add(&lookup, "c/d").await.unwrap();
        list.add(&lookup, "e/f").await.unwrap();
        list.remove("a/b").unwrap();
        list.add(&lookup, "a/b").await.unwrap();

        let reloaded = RepoList::load(store.clone());
        assert_eq!(reloaded.repositories(), list.repositories());
        assert_eq!(names(&reloaded), vec!["c/d", "e/f", "a/b"]);
    }

    #[test]
    fn unreadable_store_starts_empty_with_error() {
        let store: MemoryStore<Vec<TrackedRepository>> = MemoryStore::default();
        store.fail_loads();
        let list = RepoList::load(store);
        assert!(list.repositories().is_empty());
        assert!(list.error_message().is_some());
    }

    #[test]
    fn failed_write_surfaces_error_but_keeps_mutation() {
        let (mut list, store) = list_with(&["a/b", "c/d"]);
        store.fail_writes();
        assert!(list.remove("a/b").is_err());
        assert_eq!(names(&list), vec!["c/d"]);
        assert!(list.error_message().is_some());
    }

    #[test]
    fn html_url_points_at_github() {
        assert_eq!(
            TrackedRepository::new("a/b").html_url(),
            "https://github.com/a/b"
        );
    }

    #[tokio::test]
    async fn failed_write_on_add_keeps_entry() {
        let (mut list, store) = list_with(&["a/b"]);
        let lookup = ScriptedLookup::new().found("c/d", "c/d");
        store.fail_writes();

        list.set_input("c/d");
        let err = list.add(&lookup, "c/d").await.unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
        assert_eq!(names(&list), vec!["a/b", "c/d"]);
        assert_eq!(list.input(), "");
        assert!(list.error_message().is_some());
        assert!(!list.is_loading());
        assert_eq!(store.value().unwrap(), vec![TrackedRepository::new("a/b")]);
    }

    #[tokio::test]
    async fn malformed_identifier_is_rejected_without_fetch() {
        let (mut list, store) = list_with(&["a/b"]);
        let lookup = ScriptedLookup::new();

        for bad in ["a/b?x=1", "a/b#readme", "../user", "a b/c", "   ", "owner"] {
            let err = list.add(&lookup, bad).await.unwrap_err();
            assert!(matches!(err, TrackerError::Validation(_)), "{bad:?}");
            assert_eq!(
                list.error_message(),
                Some(format!("invalid repository identifier: {bad}").as_str())
            );
            assert!(!list.is_loading());
        }
        assert!(lookup.calls().is_empty());
        assert_eq!(names(&list), vec!["a/b"]);
        assert_eq!(store.writes(), 0);
    }
}

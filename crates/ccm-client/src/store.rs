use std::collections::HashMap;
use std::sync::Arc;

use ccm_core::{ConfigRecord, Scope};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, Level};

use crate::api::{ApiClient, ReferenceCheck};
use crate::busy::BusyFlag;
use crate::notify::{Notification, Notifier};
use crate::{ClientError, Result};

// ─── RecordCache ──────────────────────────────────────────────────────────

/// Records of one scope in backend order.
#[derive(Debug, Clone)]
struct Entry<R> {
    records: Vec<R>,
    warnings: Vec<String>,
}

impl<R: ConfigRecord> Entry<R> {
    fn position(&self, identity: &str) -> Option<usize> {
        self.records.iter().position(|r| r.identity() == identity)
    }

    /// Swap the record addressed by `identity` for `record`, keeping its
    /// slot. Appends when nothing matches.
    fn replace(&mut self, identity: &str, record: R) {
        let slot = self
            .position(identity)
            .or_else(|| self.position(&record.identity()));
        match slot {
            Some(i) => self.records[i] = record,
            None => self.records.push(record),
        }
    }

    fn remove(&mut self, identity: &str) -> bool {
        match self.position(identity) {
            Some(i) => {
                self.records.remove(i);
                true
            }
            None => false,
        }
    }
}

/// Per-project sequences plus the user-scope sequence.
#[derive(Debug)]
struct RecordCache<R> {
    projects: HashMap<String, Entry<R>>,
    user: Option<Entry<R>>,
}

impl<R> Default for RecordCache<R> {
    fn default() -> Self {
        RecordCache {
            projects: HashMap::new(),
            user: None,
        }
    }
}

impl<R> RecordCache<R> {
    fn get(&self, scope: &Scope) -> Option<&Entry<R>> {
        match scope {
            Scope::Project(id) => self.projects.get(id),
            Scope::User => self.user.as_ref(),
        }
    }

    fn get_mut(&mut self, scope: &Scope) -> Option<&mut Entry<R>> {
        match scope {
            Scope::Project(id) => self.projects.get_mut(id),
            Scope::User => self.user.as_mut(),
        }
    }

    fn set(&mut self, scope: &Scope, entry: Entry<R>) {
        match scope {
            Scope::Project(id) => {
                self.projects.insert(id.clone(), entry);
            }
            Scope::User => self.user = Some(entry),
        }
    }

    fn clear(&mut self) {
        self.projects.clear();
        self.user = None;
    }
}

// ─── ScopedRecordStore ────────────────────────────────────────────────────

/// Cache-backed CRUD for one kind of configuration record.
///
/// One instance exists per kind (see [`crate::ConfigStores`]). The backend
/// is authoritative: every successful mutation writes the server's answer
/// into the cache, never the caller's patch. Operations may overlap; the
/// last response to arrive wins.
pub struct ScopedRecordStore<R: ConfigRecord> {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    cache: RwLock<RecordCache<R>>,
    last_error: RwLock<Option<String>>,
    loading: BusyFlag,
}

impl<R: ConfigRecord> ScopedRecordStore<R> {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        ScopedRecordStore {
            api,
            notifier,
            cache: RwLock::new(RecordCache::default()),
            last_error: RwLock::new(None),
            loading: BusyFlag::default(),
        }
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Cached records for `scope` (empty when never loaded).
    pub async fn records(&self, scope: &Scope) -> Vec<R> {
        self.cache
            .read()
            .await
            .get(scope)
            .map(|e| e.records.clone())
            .unwrap_or_default()
    }

    pub async fn get(&self, scope: &Scope, identity: &str) -> Option<R> {
        let cache = self.cache.read().await;
        let entry = cache.get(scope)?;
        entry.position(identity).map(|i| entry.records[i].clone())
    }

    pub async fn is_loaded(&self, scope: &Scope) -> bool {
        self.cache.read().await.get(scope).is_some()
    }

    /// Warnings returned by the last successful load of `scope`.
    pub async fn warnings(&self, scope: &Scope) -> Vec<String> {
        self.cache
            .read()
            .await
            .get(scope)
            .map(|e| e.warnings.clone())
            .unwrap_or_default()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        *self.last_error.write().await = None;
    }

    // ── Operations ─────────────────────────────────────────────────────────

    /// Fetch every record in `scope` and replace the cached sequence.
    ///
    /// On failure the previous sequence stays in place.
    pub async fn load(&self, scope: &Scope) -> Result<Vec<R>> {
        let _busy = self.loading.enter();
        scope.validate()?;
        match self.api.list::<R>(scope).await {
            Ok(listing) => {
                debug!(kind = %R::KIND, %scope, count = listing.records.len(), "loaded records");
                let records = listing.records.clone();
                self.cache.write().await.set(
                    scope,
                    Entry {
                        records: listing.records,
                        warnings: listing.warnings,
                    },
                );
                *self.last_error.write().await = None;
                Ok(records)
            }
            Err(e) => {
                self.fail(&format!("Failed to load {}s", R::KIND.label()), &e)
                    .await;
                Err(e)
            }
        }
    }

    /// Patch one record and cache the backend's canonical version.
    pub async fn update(&self, scope: &Scope, identity: &str, patch: &Value) -> Result<R> {
        let _busy = self.loading.enter();
        scope.validate()?;
        match self.api.update::<R>(scope, identity, patch).await {
            Ok(record) => {
                if let Some(entry) = self.cache.write().await.get_mut(scope) {
                    entry.replace(identity, record.clone());
                }
                *self.last_error.write().await = None;
                self.notifier.notify(Notification::success(format!(
                    "{} '{}' updated",
                    R::KIND.label(),
                    record.identity()
                )));
                Ok(record)
            }
            Err(e) => {
                self.fail(&format!("Failed to update {} '{identity}'", R::KIND.label()), &e)
                    .await;
                Err(e)
            }
        }
    }

    /// Delete one record.
    ///
    /// Kinds whose identities are positional (hooks) reload the whole scope
    /// afterwards, since every later sibling's identity has shifted.
    pub async fn delete(&self, scope: &Scope, identity: &str) -> Result<()> {
        let _busy = self.loading.enter();
        scope.validate()?;
        if let Err(e) = self.api.delete(R::KIND, scope, identity).await {
            self.fail(&format!("Failed to delete {} '{identity}'", R::KIND.label()), &e)
                .await;
            return Err(e);
        }

        self.notifier.notify(Notification::success(format!(
            "{} '{identity}' deleted",
            R::KIND.label()
        )));

        if R::RELOAD_AFTER_DELETE {
            // The record is gone either way; a failed reload leaves stale
            // positional ids, so report it but don't fail the delete.
            if let Err(e) = self.load(scope).await {
                debug!(kind = %R::KIND, %scope, error = %e, "reload after delete failed");
            }
        } else if let Some(entry) = self.cache.write().await.get_mut(scope) {
            entry.remove(identity);
        }
        Ok(())
    }

    /// Ask the backend what refers to a record.
    ///
    /// Fails open: transport or server errors yield "no references" with the
    /// error text attached, so a broken lookup never blocks an edit.
    pub async fn check_references(&self, scope: &Scope, identity: &str) -> Result<ReferenceCheck> {
        scope.validate()?;
        match self.api.references(R::KIND, scope, identity).await {
            Ok(check) => Ok(check),
            Err(e) => {
                log_failure("reference check", &e);
                Ok(ReferenceCheck {
                    has_references: false,
                    references: Vec::new(),
                    error: Some(e.to_string()),
                })
            }
        }
    }

    async fn fail(&self, action: &str, e: &ClientError) {
        log_failure(action, e);
        *self.last_error.write().await = Some(e.to_string());
        self.notifier
            .notify(Notification::error(format!("{action}: {e}")));
    }
}

/// Only unexpected failures reach the error log; user-facing ones are
/// already surfaced through notifications.
pub(crate) fn log_failure(action: &str, e: &ClientError) {
    log_at(failure_level(e), action, e);
}

/// Expected, user-facing failures stay at debug; everything else is an error.
pub(crate) fn failure_level(e: &ClientError) -> Level {
    if e.is_expected() {
        Level::DEBUG
    } else {
        Level::ERROR
    }
}

pub(crate) fn log_at(level: Level, action: &str, e: &ClientError) {
    if level == Level::ERROR {
        error!(error = %e, "{action}");
    } else {
        debug!(error = %e, "{action}");
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

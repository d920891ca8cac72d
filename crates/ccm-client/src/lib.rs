//! `ccm-client`: cache-backed REST client for Claude Code configuration.
//!
//! # Architecture
//!
//! ```text
//! ConfigStores            ← one explicitly owned bundle, no globals
//!   ├─ ScopedRecordStore<Agent | Command | Hook | Skill | McpServer>
//!   │     cache per (scope, project) · load / update / delete / refs
//!   └─ CopyOrchestrator   ← one POST per copy; 409 → ConflictReport
//!         │
//!         ▼
//! ApiClient               ← reqwest, JSON bodies, per-request timeout
//!         │
//!         ▼
//! Notifier                ← success / failure messages for the user
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ccm_client::{ApiClient, ConfigStores, TracingNotifier};
//! use ccm_core::Scope;
//!
//! let stores = ConfigStores::new(
//!     ApiClient::new("http://localhost:3000/api", 30)?,
//!     Arc::new(TracingNotifier),
//! );
//! let agents = stores.agents.load(&Scope::project("web")).await?;
//! ```

pub mod api;
pub(crate) mod busy;
pub mod copy;
pub mod error;
pub mod notify;
pub mod store;
pub mod stores;
#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, CopyResult, HealthStatus, Listing, ReferenceCheck};
pub use copy::{CopyOrchestrator, CopyOutcome};
pub use error::ClientError;
pub use notify::{MemoryNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use store::ScopedRecordStore;
pub use stores::{ConfigStores, ScopeSummary};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;

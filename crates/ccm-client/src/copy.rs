use std::sync::Arc;

use ccm_core::{ConflictReport, CopyRequest};
use tokio::sync::RwLock;
use tracing::{debug, Level};

use crate::api::{ApiClient, CopyBody, CopyResponse, CopyResult};
use crate::busy::BusyFlag;
use crate::notify::{Notification, Notifier};
use crate::store::{failure_level, log_at};
use crate::{ClientError, Result};

/// What came back from one copy attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CopyOutcome {
    Copied(CopyResult),
    /// The target already holds a record with the same identity. Choosing
    /// a strategy and trying again is up to the caller.
    Conflict(ConflictReport),
}

impl CopyOutcome {
    /// Treat a conflict as an error, for callers with no way to ask the user.
    pub fn into_copied(self) -> Result<CopyResult> {
        match self {
            CopyOutcome::Copied(result) => Ok(result),
            CopyOutcome::Conflict(report) => Err(ClientError::Conflict(Box::new(report))),
        }
    }
}

/// Copies records between scopes, one request per call.
///
/// Conflicts are returned, never retried with another strategy.
pub struct CopyOrchestrator {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    last_result: RwLock<Option<CopyResult>>,
    copying: BusyFlag,
}

impl CopyOrchestrator {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        CopyOrchestrator {
            api,
            notifier,
            last_result: RwLock::new(None),
            copying: BusyFlag::default(),
        }
    }

    pub fn is_copying(&self) -> bool {
        self.copying.is_set()
    }

    pub async fn last_result(&self) -> Option<CopyResult> {
        self.last_result.read().await.clone()
    }

    pub async fn clear_last_result(&self) {
        *self.last_result.write().await = None;
    }

    /// Run one copy. Validation failures return before any request is sent.
    pub async fn copy(&self, request: &CopyRequest) -> Result<CopyOutcome> {
        let _busy = self.copying.enter();
        let valid = request.validate()?;
        let kind = valid.kind;
        let body = CopyBody {
            source_path: valid.source_path,
            target_scope: valid.target.kind(),
            target_project_id: valid.target.project_id().map(str::to_string),
            conflict_strategy: valid.strategy,
        };
        debug!(%kind, target = %valid.target, strategy = %valid.strategy, "copying record");

        let response = match self.api.copy(kind, &body).await {
            Ok(r) => r,
            Err(e) => return Err(self.fail(e)),
        };
        match response {
            CopyResponse::Conflict(report) => {
                debug!(%kind, target = %report.target_file.path, "copy conflict");
                Ok(CopyOutcome::Conflict(report))
            }
            CopyResponse::Copied(result) if !result.success => {
                let message = if result.message.is_empty() {
                    "backend reported failure".to_string()
                } else {
                    result.message
                };
                Err(self.fail(ClientError::CopyFailed(message)))
            }
            CopyResponse::Copied(result) => {
                *self.last_result.write().await = Some(result.clone());
                let message = match (&result.created_path, result.message.is_empty()) {
                    (_, false) => result.message.clone(),
                    (Some(path), true) => format!("{} copied to {path}", kind.label()),
                    (None, true) => format!("{} copied", kind.label()),
                };
                self.notifier.notify(Notification::success(message));
                Ok(CopyOutcome::Copied(result))
            }
        }
    }

    fn fail(&self, e: ClientError) -> ClientError {
        let (e, level) = copy_error(e);
        log_at(level, "copy", &e);
        self.notifier
            .notify(Notification::error(format!("Copy failed: {e}")));
        e
    }
}

/// Transport failures are reported as copy failures; timeouts and
/// malformed responses keep their own kind. The log level comes from the
/// original error.
fn copy_error(e: ClientError) -> (ClientError, Level) {
    let level = failure_level(&e);
    let e = match e {
        ClientError::BackendUnavailable(msg) => ClientError::CopyFailed(msg),
        other => other,
    };
    (e, level)
}

// ─── Tests ────────────────────────────────────────────────────────────────

use crate::conflict::ConflictStrategy;
use crate::error::{CoreError, Result};
use crate::types::{Kind, Scope, ScopeKind};
use serde::{Deserialize, Serialize};

/// The record being copied. Some callers only know the record's `filePath`,
/// so both locations are accepted and `path` wins when both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl SourceRecord {
    pub fn new(kind: Kind, path: impl Into<String>) -> Self {
        SourceRecord {
            kind,
            path: Some(path.into()),
            file_path: None,
        }
    }

    /// `path`, falling back to `file_path`. Blank values count as absent.
    pub fn resolve_path(&self) -> Result<&str> {
        self.path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| self.file_path.as_deref().filter(|p| !p.trim().is_empty()))
            .ok_or(CoreError::MissingSourcePath)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRequest {
    pub source_record: SourceRecord,
    pub target_scope: ScopeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_project_id: Option<String>,
    #[serde(default)]
    pub conflict_strategy: ConflictStrategy,
}

/// A copy request that passed validation and can be sent as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCopy {
    pub kind: Kind,
    pub source_path: String,
    pub target: Scope,
    pub strategy: ConflictStrategy,
}

impl CopyRequest {
    pub fn new(source_record: SourceRecord, target: &Scope, strategy: ConflictStrategy) -> Self {
        CopyRequest {
            source_record,
            target_scope: target.kind(),
            target_project_id: target.project_id().map(str::to_string),
            conflict_strategy: strategy,
        }
    }

    /// Check the request without touching the network.
    pub fn validate(&self) -> Result<ValidatedCopy> {
        let target = match self.target_scope {
            ScopeKind::Project => match self.target_project_id.as_deref() {
                Some(id) if !id.trim().is_empty() => Scope::project(id),
                _ => return Err(CoreError::MissingTargetProject),
            },
            ScopeKind::User => Scope::User,
        };
        let source_path = self.source_record.resolve_path()?.to_string();
        Ok(ValidatedCopy {
            kind: self.source_record.kind,
            source_path,
            target,
            strategy: self.conflict_strategy,
        })
    }
}

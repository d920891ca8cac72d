//! Conflict policy for copies between scopes.
//!
//! A conflict means the target scope already holds a record with the same
//! identity. Choosing how to resolve it is the user's call; this module only
//! lists the legal strategies and previews the name a rename would produce.
//! The backend performs the authoritative collision check when the copy runs.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ConflictStrategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    Skip,
    Overwrite,
    #[default]
    Rename,
}

impl ConflictStrategy {
    pub fn all() -> &'static [ConflictStrategy] {
        &[
            ConflictStrategy::Skip,
            ConflictStrategy::Overwrite,
            ConflictStrategy::Rename,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConflictStrategy::Skip => "skip",
            ConflictStrategy::Overwrite => "overwrite",
            ConflictStrategy::Rename => "rename",
        }
    }

    /// Only overwrite loses data at the target.
    pub fn is_destructive(self) -> bool {
        matches!(self, ConflictStrategy::Overwrite)
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConflictStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "skip" => Ok(ConflictStrategy::Skip),
            "overwrite" => Ok(ConflictStrategy::Overwrite),
            "rename" => Ok(ConflictStrategy::Rename),
            other => Err(CoreError::UnknownStrategy(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ConflictReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Both sides of a naming collision, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub source_file: FileDescriptor,
    pub target_file: FileDescriptor,
}

impl ConflictReport {
    /// Preview of the name a `rename` resolution would give the copy.
    pub fn suggested_rename<S: AsRef<str>>(&self, existing: &[S]) -> String {
        derive_renamed_name(&self.target_file.name, existing)
    }

    /// `Some(true)` when the source is newer than the file it would replace.
    pub fn source_is_newer(&self) -> Option<bool> {
        match (self.source_file.modified_at, self.target_file.modified_at) {
            (Some(s), Some(t)) => Some(s > t),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rename derivation
// ---------------------------------------------------------------------------

/// Split `filename` into stem and extension at the last `.`.
///
/// A leading dot (`.env`) belongs to the stem.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => filename.split_at(pos),
        _ => (filename, ""),
    }
}

/// First name of the form `stem-N.ext` (N >= 2) not present in `existing`.
pub fn derive_renamed_name<S: AsRef<str>>(filename: &str, existing: &[S]) -> String {
    let (stem, ext) = split_extension(filename);
    let taken = |candidate: &str| existing.iter().any(|e| e.as_ref() == candidate);
    let mut n: u32 = 2;
    loop {
        let candidate = format!("{stem}-{n}{ext}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

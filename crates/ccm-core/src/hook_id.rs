//! Composite keys for hooks.
//!
//! Hooks have no natural unique name, so each one is addressed as
//! `event::matcher::index`, where `index` disambiguates hooks that share the
//! same event and matcher. Indices shift when an earlier sibling is deleted;
//! a `HookId` must not be reused across a delete in the same group.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SEPARATOR: &str = "::";

// ---------------------------------------------------------------------------
// HookEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
    PermissionRequest,
    Notification,
    UserPromptSubmit,
    Stop,
    SubagentStop,
    PreCompact,
    SessionStart,
    SessionEnd,
}

impl HookEvent {
    pub fn all() -> &'static [HookEvent] {
        &[
            HookEvent::PreToolUse,
            HookEvent::PostToolUse,
            HookEvent::PermissionRequest,
            HookEvent::Notification,
            HookEvent::UserPromptSubmit,
            HookEvent::Stop,
            HookEvent::SubagentStop,
            HookEvent::PreCompact,
            HookEvent::SessionStart,
            HookEvent::SessionEnd,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::PreToolUse => "PreToolUse",
            HookEvent::PostToolUse => "PostToolUse",
            HookEvent::PermissionRequest => "PermissionRequest",
            HookEvent::Notification => "Notification",
            HookEvent::UserPromptSubmit => "UserPromptSubmit",
            HookEvent::Stop => "Stop",
            HookEvent::SubagentStop => "SubagentStop",
            HookEvent::PreCompact => "PreCompact",
            HookEvent::SessionStart => "SessionStart",
            HookEvent::SessionEnd => "SessionEnd",
        }
    }

    /// Whether the matcher part of a hook is meaningful for this event.
    pub fn supports_matcher(self) -> bool {
        matches!(
            self,
            HookEvent::PreToolUse
                | HookEvent::PostToolUse
                | HookEvent::PermissionRequest
                | HookEvent::Notification
                | HookEvent::PreCompact
                | HookEvent::SessionStart
        )
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HookEvent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        HookEvent::all()
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| CoreError::malformed_hook_id(s, format!("unknown hook event '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// HookId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookId {
    pub event: HookEvent,
    /// Empty when the hook has no matcher.
    pub matcher: String,
    pub index: u32,
}

impl HookId {
    pub fn new(event: HookEvent, matcher: Option<&str>, index: Option<u32>) -> Self {
        HookId {
            event,
            matcher: matcher.unwrap_or_default().to_string(),
            index: index.unwrap_or(0),
        }
    }

    /// `None` when the matcher part is empty.
    pub fn matcher(&self) -> Option<&str> {
        Some(self.matcher.as_str()).filter(|m| !m.is_empty())
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.event, self.matcher, self.index
        )
    }
}

impl std::str::FromStr for HookId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Build the composite key for a hook. Missing parts become `""` and `0`.
///
/// A matcher that itself contains `::` produces a key that [`parse`] rejects;
/// such hooks cannot be addressed by id.
pub fn build(event: HookEvent, matcher: Option<&str>, index: Option<u32>) -> String {
    HookId::new(event, matcher, index).to_string()
}

/// Split a composite key back into its parts.
///
/// The id must contain exactly two `::` separators, name a known event, and
/// end in a canonical decimal index: digits only, no sign, no leading zeros.
pub fn parse(id: &str) -> Result<HookId> {
    let parts: Vec<&str> = id.split(SEPARATOR).collect();
    let [event, matcher, index] = parts.as_slice() else {
        return Err(CoreError::malformed_hook_id(
            id,
            format!("expected 3 '::'-separated parts, found {}", parts.len()),
        ));
    };
    let event = event
        .parse::<HookEvent>()
        .map_err(|_| CoreError::malformed_hook_id(id, format!("unknown hook event '{event}'")))?;
    let canonical = !index.is_empty()
        && index.bytes().all(|b| b.is_ascii_digit())
        && (*index == "0" || !index.starts_with('0'));
    let index = canonical
        .then(|| index.parse::<u32>().ok())
        .flatten()
        .ok_or_else(|| CoreError::malformed_hook_id(id, format!("invalid index '{index}'")))?;
    Ok(HookId {
        event,
        matcher: matcher.to_string(),
        index,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_uses_defaults() {
        assert_eq!(build(HookEvent::Stop, None, None), "Stop::::0");
        assert_eq!(
            build(HookEvent::PreToolUse, Some("Bash"), Some(2)),
            "PreToolUse::Bash::2"
        );
    }

    #[test]
    fn roundtrip_every_event() {
        for &event in HookEvent::all() {
            for matcher in [None, Some(""), Some("Write|Edit"), Some("mcp__.*")] {
                for index in [None, Some(0), Some(7)] {
                    let id = parse(&build(event, matcher, index)).unwrap();
                    assert_eq!(id.event, event);
                    assert_eq!(id.matcher, matcher.unwrap_or(""));
                    assert_eq!(id.index, index.unwrap_or(0));
                }
            }
        }
    }

    #[test]
    fn parse_rejects_wrong_separator_count() {
        for bad in ["", "PreToolUse", "PreToolUse::Bash", "PreToolUse::a::b::0"] {
            assert!(
                matches!(parse(bad), Err(CoreError::MalformedHookId { .. })),
                "expected MalformedHookId for {bad:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_unknown_event_and_bad_index() {
        assert!(matches!(
            parse("OnSave::x::0"),
            Err(CoreError::MalformedHookId { .. })
        ));
        assert!(matches!(
            parse("Stop::::-1"),
            Err(CoreError::MalformedHookId { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_canonical_index() {
        for id in ["Stop::::+1", "Stop::::01", "Stop::::00", "Stop::::", "Stop::::1 "] {
            assert!(
                matches!(parse(id), Err(CoreError::MalformedHookId { .. })),
                "{id} should be rejected"
            );
        }
        assert_eq!(parse("Stop::::0").unwrap().index, 0);
        assert_eq!(parse("Stop::::10").unwrap().index, 10);
    }

    #[test]
    fn matcher_with_separator_does_not_round_trip() {
        let id = build(HookEvent::PreToolUse, Some("a::b"), None);
        assert_eq!(id, "PreToolUse::a::b::0");
        assert!(matches!(parse(&id), Err(CoreError::MalformedHookId { .. })));
    }

    #[test]
    fn empty_matcher_reads_as_none() {
        let id: HookId = "SessionEnd::::3".parse().unwrap();
        assert_eq!(id.matcher(), None);
        assert_eq!(id.index, 3);
    }

    #[test]
    fn matcher_support() {
        assert!(HookEvent::PreToolUse.supports_matcher());
        assert!(!HookEvent::Stop.supports_matcher());
        assert_eq!(HookEvent::all().len(), 10);
    }
}

use crate::hook_id::{HookEvent, HookId};
use crate::types::Kind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// ConfigRecord
// ---------------------------------------------------------------------------

/// One configuration artifact as served by the backend.
///
/// `identity()` is unique per kind within one scope: a plain name for
/// agents, skills and MCP servers, a relative path for commands, and a
/// composite [`HookId`] for hooks.
pub trait ConfigRecord:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: Kind;

    /// Deleting one record shifts the identities of its siblings, so the
    /// whole scope must be fetched again instead of splicing the cache.
    const RELOAD_AFTER_DELETE: bool = false;

    fn identity(&self) -> String;

    /// Location of the backing file, when the backend reports one.
    fn file_path(&self) -> Option<&str>;
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ConfigRecord for Agent {
    const KIND: Kind = Kind::Agent;

    fn identity(&self) -> String {
        self.name.clone()
    }

    fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A slash command. Nested commands live under a namespace directory, so
/// `git/commit` is addressed by its relative path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ConfigRecord for Command {
    const KIND: Kind = Kind::Command;

    fn identity(&self) -> String {
        match self.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            Some(ns) => format!("{ns}/{}", self.name),
            None => self.name.clone(),
        }
    }

    fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Hook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub event: HookEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    #[serde(default)]
    pub index: u32,
    #[serde(rename = "type", default = "default_hook_type")]
    pub hook_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

fn default_hook_type() -> String {
    "command".to_string()
}

impl Hook {
    pub fn hook_id(&self) -> HookId {
        HookId::new(self.event, self.matcher.as_deref(), Some(self.index))
    }
}

impl ConfigRecord for Hook {
    const KIND: Kind = Kind::Hook;
    const RELOAD_AFTER_DELETE: bool = true;

    fn identity(&self) -> String {
        self.hook_id().to_string()
    }

    fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Skill
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ConfigRecord for Skill {
    const KIND: Kind = Kind::Skill;

    fn identity(&self) -> String {
        self.name.clone()
    }

    fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// McpServer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpTransport {
    Stdio {
        command: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        env: BTreeMap<String, String>,
    },
    Sse {
        url: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
    Http {
        url: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
}

impl McpTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            McpTransport::Stdio { .. } => "stdio",
            McpTransport::Sse { .. } => "sse",
            McpTransport::Http { .. } => "http",
        }
    }

    /// Command line for stdio servers, URL otherwise.
    pub fn target(&self) -> String {
        match self {
            McpTransport::Stdio { command, args, .. } if args.is_empty() => command.clone(),
            McpTransport::Stdio { command, args, .. } => format!("{command} {}", args.join(" ")),
            McpTransport::Sse { url, .. } | McpTransport::Http { url, .. } => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub name: String,
    pub transport: McpTransport,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl ConfigRecord for McpServer {
    const KIND: Kind = Kind::Mcp;

    fn identity(&self) -> String {
        self.name.clone()
    }

    fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Project / references
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Something that refers to a record, e.g. a command that invokes an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_identity_includes_namespace() {
        let cmd: Command =
            serde_json::from_str(r#"{"name": "commit", "namespace": "git"}"#).unwrap();
        assert_eq!(cmd.identity(), "git/commit");
        let plain: Command = serde_json::from_str(r#"{"name": "review"}"#).unwrap();
        assert_eq!(plain.identity(), "review");
    }

    #[test]
    fn hook_identity_is_composite() {
        let hook: Hook = serde_json::from_str(
            r#"{"event": "PreToolUse", "matcher": "Bash", "index": 1, "type": "command", "command": "./lint.sh"}"#,
        )
        .unwrap();
        assert_eq!(hook.identity(), "PreToolUse::Bash::1");
        assert!(Hook::RELOAD_AFTER_DELETE);
        assert!(!Agent::RELOAD_AFTER_DELETE);
    }

    #[test]
    fn hook_defaults() {
        let hook: Hook = serde_json::from_str(r#"{"event": "Stop"}"#).unwrap();
        assert_eq!(hook.identity(), "Stop::::0");
        assert_eq!(hook.hook_type, "command");
    }

    #[test]
    fn agent_reads_camel_case_fields() {
        let agent: Agent = serde_json::from_str(
            r#"{"name": "reviewer", "tools": ["Read"], "filePath": "/p/.claude/agents/reviewer.md"}"#,
        )
        .unwrap();
        assert_eq!(agent.file_path(), Some("/p/.claude/agents/reviewer.md"));
        assert_eq!(agent.tools, vec!["Read".to_string()]);
    }

    #[test]
    fn mcp_transport_tagged() {
        let server: McpServer = serde_json::from_str(
            r#"{"name": "github", "transport": {"type": "stdio", "command": "npx", "args": ["-y", "gh-mcp"]}}"#,
        )
        .unwrap();
        assert!(server.enabled);
        assert_eq!(server.transport.as_str(), "stdio");
        assert_eq!(server.transport.target(), "npx -y gh-mcp");

        let remote: McpServer = serde_json::from_str(
            r#"{"name": "docs", "enabled": false, "transport": {"type": "http", "url": "https://x/mcp"}}"#,
        )
        .unwrap();
        assert!(!remote.enabled);
        assert_eq!(remote.transport.target(), "https://x/mcp");
    }
}

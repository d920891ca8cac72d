use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Where a configuration record lives: inside one project, or in the user's
/// global profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Project(String),
    User,
}

impl Scope {
    pub fn project(id: impl Into<String>) -> Self {
        Scope::Project(id.into())
    }

    /// Build a scope from its wire form (`"project"` / `"user"` plus an
    /// optional project id).
    ///
    /// A project scope needs a non-empty id; a user scope must not carry one.
    pub fn from_parts(scope: &str, project_id: Option<&str>) -> Result<Self> {
        match (scope, project_id) {
            ("project", Some(id)) if !id.trim().is_empty() => Ok(Scope::Project(id.to_string())),
            ("project", _) => Err(CoreError::InvalidScope(
                "project scope requires a project id".into(),
            )),
            ("user", None) => Ok(Scope::User),
            ("user", Some(_)) => Err(CoreError::InvalidScope(
                "user scope must not carry a project id".into(),
            )),
            (other, _) => Err(CoreError::InvalidScope(format!(
                "'{other}' is not one of: project, user"
            ))),
        }
    }

    /// Reject a project scope whose id is blank.
    pub fn validate(&self) -> Result<()> {
        match self {
            Scope::Project(id) if id.trim().is_empty() => Err(CoreError::InvalidScope(
                "project scope requires a project id".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Project(_) => ScopeKind::Project,
            Scope::User => ScopeKind::User,
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            Scope::Project(id) => Some(id),
            Scope::User => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Scope::User)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Project(id) => write!(f, "project:{id}"),
            Scope::User => f.write_str("user"),
        }
    }
}

/// The scope discriminator without its project id, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Project,
    User,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Project => "project",
            ScopeKind::User => "user",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScopeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "project" => Ok(ScopeKind::Project),
            "user" => Ok(ScopeKind::User),
            other => Err(CoreError::InvalidScope(format!(
                "'{other}' is not one of: project, user"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// The five kinds of configuration artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Agent,
    Command,
    Hook,
    Skill,
    Mcp,
}

impl Kind {
    pub fn all() -> &'static [Kind] {
        &[Kind::Agent, Kind::Command, Kind::Hook, Kind::Skill, Kind::Mcp]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Agent => "agent",
            Kind::Command => "command",
            Kind::Hook => "hook",
            Kind::Skill => "skill",
            Kind::Mcp => "mcp",
        }
    }

    /// URL segment of the collection, e.g. `projects/{id}/agents`.
    pub fn collection_segment(self) -> &'static str {
        match self {
            Kind::Agent => "agents",
            Kind::Command => "commands",
            Kind::Hook => "hooks",
            Kind::Skill => "skills",
            Kind::Mcp => "mcp",
        }
    }

    /// JSON field holding the record list in a collection response.
    pub fn collection_field(self) -> &'static str {
        match self {
            Kind::Agent => "agents",
            Kind::Command => "commands",
            Kind::Hook => "hooks",
            Kind::Skill => "skills",
            Kind::Mcp => "servers",
        }
    }

    /// JSON field holding the single record in an update response.
    pub fn record_field(self) -> &'static str {
        match self {
            Kind::Agent => "agent",
            Kind::Command => "command",
            Kind::Hook => "hook",
            Kind::Skill => "skill",
            Kind::Mcp => "server",
        }
    }

    /// Human-readable label used in notifications.
    pub fn label(self) -> &'static str {
        match self {
            Kind::Agent => "Agent",
            Kind::Command => "Command",
            Kind::Hook => "Hook",
            Kind::Skill => "Skill",
            Kind::Mcp => "MCP server",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "agent" | "agents" => Ok(Kind::Agent),
            "command" | "commands" => Ok(Kind::Command),
            "hook" | "hooks" => Ok(Kind::Hook),
            "skill" | "skills" => Ok(Kind::Skill),
            "mcp" | "mcp-server" | "mcp_server" | "mcpserver" => Ok(Kind::Mcp),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_project_requires_id() {
        assert!(matches!(
            Scope::from_parts("project", None),
            Err(CoreError::InvalidScope(_))
        ));
        assert!(matches!(
            Scope::from_parts("project", Some("  ")),
            Err(CoreError::InvalidScope(_))
        ));
        assert_eq!(
            Scope::from_parts("project", Some("p1")).unwrap(),
            Scope::project("p1")
        );
    }

    #[test]
    fn from_parts_user_rejects_id() {
        assert_eq!(Scope::from_parts("user", None).unwrap(), Scope::User);
        assert!(matches!(
            Scope::from_parts("user", Some("p1")),
            Err(CoreError::InvalidScope(_))
        ));
    }

    #[test]
    fn from_parts_unknown_scope() {
        let err = Scope::from_parts("global", None).unwrap_err();
        assert!(err.to_string().contains("global"));
    }

    #[test]
    fn validate_rejects_blank_project() {
        assert!(Scope::project("").validate().is_err());
        assert!(Scope::project("p").validate().is_ok());
        assert!(Scope::User.validate().is_ok());
    }

    #[test]
    fn kind_parse_accepts_plurals() {
        assert_eq!("agents".parse::<Kind>().unwrap(), Kind::Agent);
        assert_eq!("mcp".parse::<Kind>().unwrap(), Kind::Mcp);
        assert!(matches!(
            "plugin".parse::<Kind>(),
            Err(CoreError::UnknownKind(k)) if k == "plugin"
        ));
    }

    #[test]
    fn mcp_uses_server_fields() {
        assert_eq!(Kind::Mcp.collection_segment(), "mcp");
        assert_eq!(Kind::Mcp.collection_field(), "servers");
        assert_eq!(Kind::Mcp.record_field(), "server");
    }

    #[test]
    fn scope_display() {
        assert_eq!(Scope::project("abc").to_string(), "project:abc");
        assert_eq!(Scope::User.to_string(), "user");
    }
}

pub mod config;
pub mod conflict;
pub mod copy;
pub mod error;
pub mod hook_id;
pub mod io;
pub mod paths;
pub mod records;
pub mod types;

pub use conflict::{derive_renamed_name, ConflictReport, ConflictStrategy, FileDescriptor};
pub use copy::{CopyRequest, SourceRecord, ValidatedCopy};
pub use error::{CoreError, Result};
pub use hook_id::{HookEvent, HookId};
pub use records::{
    Agent, Command, ConfigRecord, Hook, McpServer, McpTransport, Project, ReferenceDescriptor,
    Skill,
};
pub use types::{Kind, Scope, ScopeKind};

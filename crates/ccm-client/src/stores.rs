use std::sync::Arc;

use ccm_core::{Agent, Command, Hook, McpServer, Project, Scope, Skill};
use serde::Serialize;

use crate::api::{ApiClient, HealthStatus};
use crate::copy::CopyOrchestrator;
use crate::notify::Notifier;
use crate::store::ScopedRecordStore;
use crate::Result;

/// Record counts for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub agents: usize,
    pub commands: usize,
    pub hooks: usize,
    pub skills: usize,
    pub mcp_servers: usize,
}

/// Every store plus the copy orchestrator, sharing one client and one
/// notifier. Build one and hand it to whatever renders the records.
pub struct ConfigStores {
    api: Arc<ApiClient>,
    pub agents: ScopedRecordStore<Agent>,
    pub commands: ScopedRecordStore<Command>,
    pub hooks: ScopedRecordStore<Hook>,
    pub skills: ScopedRecordStore<Skill>,
    pub mcp: ScopedRecordStore<McpServer>,
    pub copier: CopyOrchestrator,
}

impl ConfigStores {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        let api = Arc::new(api);
        ConfigStores {
            agents: ScopedRecordStore::new(api.clone(), notifier.clone()),
            commands: ScopedRecordStore::new(api.clone(), notifier.clone()),
            hooks: ScopedRecordStore::new(api.clone(), notifier.clone()),
            skills: ScopedRecordStore::new(api.clone(), notifier.clone()),
            mcp: ScopedRecordStore::new(api.clone(), notifier.clone()),
            copier: CopyOrchestrator::new(api.clone(), notifier),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.api.list_projects().await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.api.health().await
    }

    /// Load all five kinds for `scope` concurrently.
    pub async fn load_all(&self, scope: &Scope) -> Result<ScopeSummary> {
        let (agents, commands, hooks, skills, mcp) = tokio::try_join!(
            self.agents.load(scope),
            self.commands.load(scope),
            self.hooks.load(scope),
            self.skills.load(scope),
            self.mcp.load(scope),
        )?;
        Ok(ScopeSummary {
            agents: agents.len(),
            commands: commands.len(),
            hooks: hooks.len(),
            skills: skills.len(),
            mcp_servers: mcp.len(),
        })
    }

    pub async fn clear_all(&self) {
        self.agents.clear_cache().await;
        self.commands.clear_cache().await;
        self.hooks.clear_cache().await;
        self.skills.clear_cache().await;
        self.mcp.clear_cache().await;
        self.copier.clear_last_result().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::TracingNotifier;
    use serde_json::json;

    #[tokio::test]
    async fn load_all_counts_every_kind() {
        let mut server = mockito::Server::new_async().await;
        for (path, body) in [
            ("/projects/p/agents", json!({"agents": [{"name": "a"}]})),
            ("/projects/p/commands", json!({"commands": [{"name": "c"}, {"name": "d", "namespace": "git"}]})),
            ("/projects/p/hooks", json!({"hooks": []})),
            ("/projects/p/skills", json!({"skills": [{"name": "s"}]})),
            ("/projects/p/mcp", json!({"servers": [{"name": "m", "transport": {"type": "sse", "url": "http://x"}}]})),
        ] {
            server
                .mock("GET", path)
                .with_status(200)
                .with_body(body.to_string())
                .create_async()
                .await;
        }
        let stores = ConfigStores::new(
            ApiClient::new(server.url(), 5).unwrap(),
            Arc::new(TracingNotifier),
        );
        let scope = Scope::project("p");
        let summary = stores.load_all(&scope).await.unwrap();
        assert_eq!(
            summary,
            ScopeSummary {
                agents: 1,
                commands: 2,
                hooks: 0,
                skills: 1,
                mcp_servers: 1
            }
        );
        assert!(stores.commands.get(&scope, "git/d").await.is_some());

        stores.clear_all().await;
        assert!(!stores.agents.is_loaded(&scope).await);
    }
}

use anyhow::Context;
use ccm_client::{ApiClient, ConfigStores, Notification, NotificationLevel, Notifier};
use ccm_core::config::ClientConfig;
use ccm_core::{paths, Scope};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags shared by every subcommand.
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub config: Option<PathBuf>,
    pub project: Option<String>,
    pub user: bool,
    pub timeout: Option<u64>,
    pub json: bool,
}

impl GlobalArgs {
    /// `--config` / `CCM_CONFIG`, else `~/.ccm/config.yaml`.
    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(p) => Ok(p.clone()),
            None => paths::default_config_path().context("failed to locate config file"),
        }
    }

    pub fn load_config(&self) -> anyhow::Result<ClientConfig> {
        let path = self.config_path()?;
        ClientConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))
    }

    /// The config file with command-line overrides applied.
    pub fn effective_config(&self) -> anyhow::Result<ClientConfig> {
        let mut cfg = self.load_config()?;
        if let Some(url) = &self.api_url {
            cfg.api_url = url.clone();
        }
        if let Some(t) = self.timeout {
            cfg.timeout_secs = t;
        }
        if let Some(p) = &self.project {
            cfg.default_project = Some(p.clone());
        }
        Ok(cfg)
    }

    /// `--user`, else `--project`, else the configured default project.
    pub fn scope(&self, cfg: &ClientConfig) -> anyhow::Result<Scope> {
        let (scope, project_id) = if self.user {
            ("user", None)
        } else {
            ("project", cfg.default_project.as_deref())
        };
        Scope::from_parts(scope, project_id)
            .context("no scope selected: pass --project <ID> or --user, or set a default project")
    }

    pub fn stores(&self, cfg: &ClientConfig) -> anyhow::Result<ConfigStores> {
        let api = ApiClient::from_config(cfg).context("failed to create API client")?;
        Ok(ConfigStores::new(api, Arc::new(ConsoleNotifier { quiet: self.json })))
    }
}

/// Run a future to completion on a fresh runtime.
pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok(rt.block_on(fut))
}

/// Prints store notifications to stderr, keeping stdout clean for output.
struct ConsoleNotifier {
    quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if self.quiet {
            return;
        }
        match notification.level {
            NotificationLevel::Success => eprintln!("✓ {}", notification.message),
            // Failures also come back as errors and are printed by main.
            NotificationLevel::Error => tracing::debug!("{}", notification.message),
        }
    }
}

use crate::context::GlobalArgs;
use crate::output::print_json;
use anyhow::Context;
use ccm_core::config::{ClientConfig, WarnLevel};
use clap::Subcommand;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the config file and the values in effect
    Show,

    /// Set the backend base URL
    SetUrl { url: String },

    /// Set the request timeout in seconds
    SetTimeout { secs: u64 },

    /// Set the project used when neither --project nor --user is given
    SetProject {
        /// Project id; omit to clear
        id: Option<String>,
    },

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(g: &GlobalArgs, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(g),
        ConfigSubcommand::SetUrl { url } => edit(g, |cfg| {
            cfg.api_url = url.trim_end_matches('/').to_string();
            format!("API URL set to {}", cfg.api_url)
        }),
        ConfigSubcommand::SetTimeout { secs } => edit(g, |cfg| {
            cfg.timeout_secs = secs;
            format!("Timeout set to {secs}s")
        }),
        ConfigSubcommand::SetProject { id } => edit(g, |cfg| {
            cfg.default_project = id.filter(|p| !p.trim().is_empty());
            match &cfg.default_project {
                Some(p) => format!("Default project set to {p}"),
                None => "Default project cleared".to_string(),
            }
        }),
        ConfigSubcommand::Validate => validate(g),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(g: &GlobalArgs) -> anyhow::Result<()> {
    let path = g.config_path()?;
    let cfg = g.effective_config()?;

    if g.json {
        return print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "config": cfg,
        }));
    }

    println!("Config file:     {}", path.display());
    println!("API URL:         {}", cfg.api_url);
    println!("Timeout:         {}s", cfg.timeout_secs);
    println!(
        "Default project: {}",
        cfg.default_project.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// set-*
// ---------------------------------------------------------------------------

/// Load the file as written (no command-line overrides), change it, save it.
fn edit(g: &GlobalArgs, apply: impl FnOnce(&mut ClientConfig) -> String) -> anyhow::Result<()> {
    let path = g.config_path()?;
    let mut cfg = g.load_config()?;
    let message = apply(&mut cfg);

    let errors: Vec<String> = cfg
        .validate()
        .into_iter()
        .filter(|w| w.level == WarnLevel::Error)
        .map(|w| w.message)
        .collect();
    if !errors.is_empty() {
        anyhow::bail!("refusing to save invalid config: {}", errors.join("; "));
    }

    cfg.save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{message}");
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(g: &GlobalArgs) -> anyhow::Result<()> {
    let config = g.effective_config()?;
    let warnings = config.validate();

    if g.json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

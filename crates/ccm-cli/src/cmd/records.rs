use crate::context::{block_on, GlobalArgs};
use crate::output::{print_json, print_table, truncate};
use anyhow::{anyhow, bail, Context};
use ccm_client::{ConfigStores, ScopedRecordStore};
use ccm_core::{hook_id, Agent, Command, ConfigRecord, Hook, Kind, McpServer, Skill};
use clap::Subcommand;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum RecordSubcommand {
    /// List records in the selected scope
    List,

    /// Show one record
    Show { identity: String },

    /// Change fields on one record
    Update {
        identity: String,
        /// Field to set; VALUE is parsed as JSON when possible (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// JSON object merged into the patch before --set values
        #[arg(long)]
        patch: Option<String>,
    },

    /// Delete one record
    Delete {
        identity: String,
        /// Delete even when other records refer to it
        #[arg(long)]
        force: bool,
    },

    /// Show what refers to a record
    Refs { identity: String },
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

pub trait Tabular {
    const HEADERS: &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl Tabular for Agent {
    const HEADERS: &'static [&'static str] = &["NAME", "MODEL", "TOOLS", "DESCRIPTION"];

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.model.clone().unwrap_or_else(|| "-".into()),
            if self.tools.is_empty() {
                "(all)".into()
            } else {
                self.tools.join(",")
            },
            truncate(self.description.as_deref().unwrap_or(""), 60),
        ]
    }
}

impl Tabular for Command {
    const HEADERS: &'static [&'static str] = &["PATH", "ARGS", "DESCRIPTION"];

    fn row(&self) -> Vec<String> {
        vec![
            self.identity(),
            self.argument_hint.clone().unwrap_or_default(),
            truncate(self.description.as_deref().unwrap_or(""), 60),
        ]
    }
}

impl Tabular for Hook {
    const HEADERS: &'static [&'static str] = &["ID", "EVENT", "MATCHER", "COMMAND"];

    fn row(&self) -> Vec<String> {
        vec![
            self.identity(),
            self.event.to_string(),
            self.matcher.clone().unwrap_or_else(|| "*".into()),
            truncate(self.command.as_deref().unwrap_or(""), 60),
        ]
    }
}

impl Tabular for Skill {
    const HEADERS: &'static [&'static str] = &["NAME", "DESCRIPTION"];

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            truncate(self.description.as_deref().unwrap_or(""), 70),
        ]
    }
}

impl Tabular for McpServer {
    const HEADERS: &'static [&'static str] = &["NAME", "TRANSPORT", "TARGET", "ENABLED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.transport.as_str().to_string(),
            truncate(&self.transport.target(), 60),
            if self.enabled { "yes" } else { "no" }.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn run_agents(g: &GlobalArgs, sub: RecordSubcommand) -> anyhow::Result<()> {
    run(g, sub, |s| &s.agents)
}

pub fn run_commands(g: &GlobalArgs, sub: RecordSubcommand) -> anyhow::Result<()> {
    run(g, sub, |s| &s.commands)
}

pub fn run_hooks(g: &GlobalArgs, sub: RecordSubcommand) -> anyhow::Result<()> {
    run(g, sub, |s| &s.hooks)
}

pub fn run_skills(g: &GlobalArgs, sub: RecordSubcommand) -> anyhow::Result<()> {
    run(g, sub, |s| &s.skills)
}

pub fn run_mcp(g: &GlobalArgs, sub: RecordSubcommand) -> anyhow::Result<()> {
    run(g, sub, |s| &s.mcp)
}

fn run<R: ConfigRecord + Tabular>(
    g: &GlobalArgs,
    sub: RecordSubcommand,
    pick: fn(&ConfigStores) -> &ScopedRecordStore<R>,
) -> anyhow::Result<()> {
    let cfg = g.effective_config()?;
    let scope = g.scope(&cfg)?;
    let stores = g.stores(&cfg)?;
    let store = pick(&stores);
    let label = R::KIND.label();

    if let RecordSubcommand::Show { identity }
    | RecordSubcommand::Update { identity, .. }
    | RecordSubcommand::Delete { identity, .. }
    | RecordSubcommand::Refs { identity } = &sub
    {
        check_identity(R::KIND, identity)?;
    }

    block_on(async {
        match sub {
            RecordSubcommand::List => {
                let records = store
                    .load(&scope)
                    .await
                    .with_context(|| format!("failed to list {label}s in {scope}"))?;
                let warnings = store.warnings(&scope).await;
                if g.json {
                    return print_json(&json!({
                        "scope": scope.to_string(),
                        "records": records,
                        "warnings": warnings,
                    }));
                }
                for w in &warnings {
                    eprintln!("warning: {w}");
                }
                let rows: Vec<Vec<String>> = records.iter().map(Tabular::row).collect();
                print_table(R::HEADERS, &rows, &format!("No {label}s in {scope}."));
                Ok(())
            }
            RecordSubcommand::Show { identity } => {
                store
                    .load(&scope)
                    .await
                    .with_context(|| format!("failed to list {label}s in {scope}"))?;
                let record = store
                    .get(&scope, &identity)
                    .await
                    .ok_or_else(|| anyhow!("{label} '{identity}' not found in {scope}"))?;
                if g.json {
                    return print_json(&record);
                }
                print_yamlish(&serde_json::to_value(&record)?);
                Ok(())
            }
            RecordSubcommand::Update {
                identity,
                set,
                patch,
            } => {
                let patch = build_patch(&set, patch.as_deref())?;
                let record = store
                    .update(&scope, &identity, &patch)
                    .await
                    .with_context(|| format!("failed to update {label} '{identity}'"))?;
                if g.json {
                    return print_json(&record);
                }
                Ok(())
            }
            RecordSubcommand::Delete { identity, force } => {
                let check = store.check_references(&scope, &identity).await?;
                if let Some(err) = &check.error {
                    eprintln!("warning: could not check references: {err}");
                }
                if check.has_references && !force {
                    let names: Vec<String> =
                        check.references.iter().map(|r| r.name.clone()).collect();
                    bail!(
                        "{label} '{identity}' is referenced by: {}\nPass --force to delete anyway.",
                        names.join(", ")
                    );
                }
                store
                    .delete(&scope, &identity)
                    .await
                    .with_context(|| format!("failed to delete {label} '{identity}'"))?;
                if g.json {
                    return print_json(&json!({ "deleted": identity }));
                }
                Ok(())
            }
            RecordSubcommand::Refs { identity } => {
                let check = store.check_references(&scope, &identity).await?;
                if g.json {
                    return print_json(&check);
                }
                if let Some(err) = &check.error {
                    eprintln!("warning: could not check references: {err}");
                }
                let rows: Vec<Vec<String>> = check
                    .references
                    .iter()
                    .map(|r| {
                        vec![
                            r.kind.clone().unwrap_or_else(|| "-".into()),
                            r.name.clone(),
                            r.path.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                print_table(
                    &["KIND", "NAME", "PATH"],
                    &rows,
                    &format!("Nothing refers to {label} '{identity}'."),
                );
                Ok(())
            }
        }
    })?
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Hook ids are checked locally so a typo never reaches the backend.
fn check_identity(kind: Kind, identity: &str) -> anyhow::Result<()> {
    if identity.trim().is_empty() {
        bail!("identity must not be empty");
    }
    if kind == Kind::Hook {
        hook_id::parse(identity)?;
    }
    Ok(())
}

fn build_patch(set: &[String], patch: Option<&str>) -> anyhow::Result<Value> {
    let mut value = match patch {
        Some(p) => serde_json::from_str::<Value>(p).context("--patch is not valid JSON")?,
        None => json!({}),
    };
    let map = value
        .as_object_mut()
        .ok_or_else(|| anyhow!("--patch must be a JSON object"))?;
    for pair in set {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("--set expects KEY=VALUE, got '{pair}'"))?;
        let parsed = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.trim().to_string(), parsed);
    }
    if map.is_empty() {
        bail!("nothing to update: pass --set KEY=VALUE or --patch JSON");
    }
    Ok(value)
}

fn print_yamlish(value: &Value) {
    let Value::Object(map) = value else {
        println!("{value}");
        return;
    };
    for (key, v) in map {
        match v {
            Value::String(s) if s.contains('\n') => {
                println!("{key}:");
                for line in s.lines() {
                    println!("  {line}");
                }
            }
            Value::String(s) => println!("{key}: {s}"),
            other => println!("{key}: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_from_set_pairs() {
        let p = build_patch(
            &["description=Reviews code".into(), "tools=[\"Read\"]".into()],
            None,
        )
        .unwrap();
        assert_eq!(p["description"], "Reviews code");
        assert_eq!(p["tools"], json!(["Read"]));
    }

    #[test]
    fn set_overrides_patch() {
        let p = build_patch(&["model=opus".into()], Some(r#"{"model": "haiku", "color": "red"}"#))
            .unwrap();
        assert_eq!(p["model"], "opus");
        assert_eq!(p["color"], "red");
    }

    #[test]
    fn empty_patch_rejected() {
        assert!(build_patch(&[], None).is_err());
        assert!(build_patch(&[], Some("[1]")).is_err());
        assert!(build_patch(&["novalue".into()], None).is_err());
    }

    #[test]
    fn hook_identity_checked_locally() {
        assert!(check_identity(Kind::Hook, "Stop::::0").is_ok());
        assert!(check_identity(Kind::Hook, "Stop").is_err());
        assert!(check_identity(Kind::Agent, "Stop").is_ok());
        assert!(check_identity(Kind::Agent, " ").is_err());
    }
}

use crate::context::{block_on, GlobalArgs};
use crate::output::{print_json, print_table};
use anyhow::Context;

pub fn list(g: &GlobalArgs) -> anyhow::Result<()> {
    let cfg = g.effective_config()?;
    let stores = g.stores(&cfg)?;
    let projects = block_on(stores.list_projects())?.context("failed to list projects")?;

    if g.json {
        return print_json(&projects);
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            let marker = if cfg.default_project.as_deref() == Some(p.id.as_str()) {
                "*"
            } else {
                ""
            };
            vec![
                format!("{}{marker}", p.id),
                p.name.clone(),
                p.path.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "PATH"], &rows, "No projects.");
    Ok(())
}

pub fn health(g: &GlobalArgs) -> anyhow::Result<()> {
    let cfg = g.effective_config()?;
    let stores = g.stores(&cfg)?;
    let status = block_on(stores.health())?
        .with_context(|| format!("backend at {} is not reachable", cfg.api_url))?;

    if g.json {
        return print_json(&status);
    }
    println!("{}: {}", cfg.api_url, status.status);
    Ok(())
}

/// Record counts per kind for one scope.
pub fn summary(g: &GlobalArgs) -> anyhow::Result<()> {
    let cfg = g.effective_config()?;
    let scope = g.scope(&cfg)?;
    let stores = g.stores(&cfg)?;
    let summary = block_on(stores.load_all(&scope))?
        .with_context(|| format!("failed to load {scope}"))?;

    if g.json {
        return print_json(&serde_json::json!({
            "scope": scope.to_string(),
            "summary": summary,
        }));
    }

    println!("Scope: {scope}");
    let rows = vec![
        vec!["agents".to_string(), summary.agents.to_string()],
        vec!["commands".to_string(), summary.commands.to_string()],
        vec!["hooks".to_string(), summary.hooks.to_string()],
        vec!["skills".to_string(), summary.skills.to_string()],
        vec!["mcp servers".to_string(), summary.mcp_servers.to_string()],
    ];
    print_table(&["KIND", "COUNT"], &rows, "");
    Ok(())
}

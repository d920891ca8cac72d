use crate::context::{block_on, GlobalArgs};
use crate::output::print_json;
use anyhow::Context;
use ccm_client::CopyOutcome;
use ccm_core::{
    ConflictReport, ConflictStrategy, CopyRequest, FileDescriptor, Kind, ScopeKind, SourceRecord,
};

pub fn run(
    g: &GlobalArgs,
    kind: &str,
    source: String,
    to: &str,
    to_project: Option<String>,
    strategy: &str,
) -> anyhow::Result<()> {
    let kind: Kind = kind.parse()?;
    let strategy: ConflictStrategy = strategy.parse()?;
    let request = CopyRequest {
        source_record: SourceRecord::new(kind, source),
        target_scope: to.parse::<ScopeKind>()?,
        target_project_id: to_project,
        conflict_strategy: strategy,
    };
    // Fail on bad input before any config or network work.
    let target = request.validate()?.target;

    let cfg = g.effective_config()?;
    let stores = g.stores(&cfg)?;
    let outcome = block_on(stores.copier.copy(&request))?
        .with_context(|| format!("failed to copy {} to {target}", kind.label()))?;

    if let CopyOutcome::Conflict(report) = &outcome {
        if g.json {
            print_json(&serde_json::json!({ "conflict": report }))?;
        } else {
            print_conflict(kind, report);
        }
    }

    let result = outcome.into_copied()?;
    if g.json {
        return print_json(&result);
    }
    if let Some(path) = &result.created_path {
        println!("{path}");
    }
    Ok(())
}

fn print_conflict(kind: Kind, report: &ConflictReport) {
    eprintln!("A {} with this name already exists in the target.", kind.label());
    describe("source", &report.source_file);
    describe("target", &report.target_file);
    match report.source_is_newer() {
        Some(true) => eprintln!("The source is newer."),
        Some(false) => eprintln!("The target is newer."),
        None => {}
    }
    eprintln!(
        "Retry with --strategy overwrite to replace it, or --strategy rename to copy as {}.",
        report.suggested_rename(&[report.target_file.name.as_str()])
    );
}

fn describe(side: &str, file: &FileDescriptor) {
    let modified = file
        .modified_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    eprintln!("  {side}: {} (modified {modified})", file.path);
}

mod cmd;
mod context;
mod output;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, hook_id::HookIdSubcommand, records::RecordSubcommand,
};
use context::GlobalArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ccm",
    about = "Browse, edit and copy Claude Code agents, commands, hooks, skills and MCP servers",
    version,
    propagate_version = true
)]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "CCM_API_URL")]
    api_url: Option<String>,

    /// Config file (default: ~/.ccm/config.yaml)
    #[arg(long, global = true, env = "CCM_CONFIG")]
    config: Option<PathBuf>,

    /// Work in this project's scope
    #[arg(long, short = 'p', global = true, env = "CCM_PROJECT", conflicts_with = "user")]
    project: Option<String>,

    /// Work in the user scope
    #[arg(long, short = 'u', global = true)]
    user: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects known to the backend
    Projects,

    /// Check that the backend is reachable
    Health,

    /// Count every kind of record in the selected scope
    Summary,

    /// Manage agents
    Agent {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },

    /// Manage slash commands (identity is the relative path, e.g. git/commit)
    Command {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },

    /// Manage hooks (identity is EVENT::MATCHER::INDEX)
    Hook {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },

    /// Manage skills
    Skill {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },

    /// Manage MCP servers
    Mcp {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },

    /// Build or parse hook identifiers
    HookId {
        #[command(subcommand)]
        subcommand: HookIdSubcommand,
    },

    /// Copy a record into another scope
    Copy {
        /// Record kind: agent, command, hook, skill or mcp
        kind: String,
        /// Path of the source record's file
        source: String,
        /// Target scope: project or user
        #[arg(long, value_name = "SCOPE")]
        to: String,
        /// Target project id (required with --to project)
        #[arg(long, value_name = "ID")]
        to_project: Option<String>,
        /// What to do if the target already exists: skip, overwrite or rename
        #[arg(long, default_value = "rename")]
        strategy: String,
    },

    /// Show and edit client settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let globals = GlobalArgs {
        api_url: cli.api_url,
        config: cli.config,
        project: cli.project,
        user: cli.user,
        timeout: cli.timeout,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Projects => cmd::projects::list(&globals),
        Commands::Health => cmd::projects::health(&globals),
        Commands::Summary => cmd::projects::summary(&globals),
        Commands::Agent { subcommand } => cmd::records::run_agents(&globals, subcommand),
        Commands::Command { subcommand } => cmd::records::run_commands(&globals, subcommand),
        Commands::Hook { subcommand } => cmd::records::run_hooks(&globals, subcommand),
        Commands::Skill { subcommand } => cmd::records::run_skills(&globals, subcommand),
        Commands::Mcp { subcommand } => cmd::records::run_mcp(&globals, subcommand),
        Commands::HookId { subcommand } => cmd::hook_id::run(subcommand, globals.json),
        Commands::Copy {
            kind,
            source,
            to,
            to_project,
            strategy,
        } => cmd::copy::run(&globals, &kind, source, &to, to_project, &strategy),
        Commands::Config { subcommand } => cmd::config::run(&globals, subcommand),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

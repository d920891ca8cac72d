use crate::output::print_json;
use ccm_core::hook_id::{self, HookEvent};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum HookIdSubcommand {
    /// Print the identifier for a hook
    Build {
        /// Hook event, e.g. PreToolUse
        event: String,
        #[arg(long)]
        matcher: Option<String>,
        #[arg(long)]
        index: Option<u32>,
    },

    /// Split an identifier into event, matcher and index
    Parse { id: String },

    /// List the hook events the identifier accepts
    Events,
}

pub fn run(subcmd: HookIdSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        HookIdSubcommand::Build {
            event,
            matcher,
            index,
        } => {
            let event: HookEvent = event.parse()?;
            let id = hook_id::build(event, matcher.as_deref(), index);
            if json {
                print_json(&serde_json::json!({ "id": id }))
            } else {
                println!("{id}");
                Ok(())
            }
        }
        HookIdSubcommand::Parse { id } => {
            let parsed = hook_id::parse(&id)?;
            if json {
                print_json(&serde_json::json!({
                    "event": parsed.event,
                    "matcher": parsed.matcher(),
                    "index": parsed.index,
                }))
            } else {
                println!("event:   {}", parsed.event);
                println!("matcher: {}", parsed.matcher().unwrap_or("(none)"));
                println!("index:   {}", parsed.index);
                Ok(())
            }
        }
        HookIdSubcommand::Events => {
            if json {
                return print_json(&HookEvent::all());
            }
            for event in HookEvent::all() {
                let note = if event.supports_matcher() {
                    "  (matcher)"
                } else {
                    ""
                };
                println!("{event}{note}");
            }
            Ok(())
        }
    }
}

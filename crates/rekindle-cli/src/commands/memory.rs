//! Journal memory commands.

use clap::Subcommand;
use rekindle_core::Database;

use super::{open_tracker, save_tracker};

#[derive(Subcommand)]
pub enum MemoryAction {
    /// Attach a journal note to a pledge
    Add {
        /// Pledge ID
        pledge_id: String,
        /// Note text
        text: String,
    },
    /// List memories, newest first
    List {
        /// Limit to one pledge
        #[arg(long)]
        pledge_id: Option<String>,
    },
}

pub fn run(action: MemoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = open_tracker(&db)?;

    match action {
        MemoryAction::Add { pledge_id, text } => {
            let memory = tracker.add_memory(&pledge_id, text)?;
            save_tracker(&db, &tracker)?;
            println!("Memory added: {}", memory.id);
        }
        MemoryAction::List { pledge_id } => {
            let memories = tracker.fetch_recent_memories(pledge_id.as_deref());
            println!("{}", serde_json::to_string_pretty(&memories)?);
        }
    }
    Ok(())
}

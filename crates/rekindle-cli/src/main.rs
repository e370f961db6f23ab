use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rekindle-cli", version, about = "Rekindle CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pledge management
    Pledge {
        #[command(subcommand)]
        action: commands::pledge::PledgeAction,
    },
    /// Daily check-ins
    Checkin {
        #[command(subcommand)]
        action: commands::checkin::CheckinAction,
    },
    /// Repair a slipped pledge
    Repair {
        #[command(subcommand)]
        action: commands::repair::RepairAction,
    },
    /// Rhythm status
    Rhythm {
        #[command(subcommand)]
        action: commands::rhythm::RhythmAction,
    },
    /// Journal memories
    Memory {
        #[command(subcommand)]
        action: commands::memory::MemoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Pledge { action } => commands::pledge::run(action),
        Commands::Checkin { action } => commands::checkin::run(action),
        Commands::Repair { action } => commands::repair::run(action),
        Commands::Rhythm { action } => commands::rhythm::run(action),
        Commands::Memory { action } => commands::memory::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

//! Configuration commands.

use clap::Subcommand;
use rekindle_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Key: user-name or default-target-days
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "user-name" => config.user_name = value,
                "default-target-days" => {
                    config.default_target_days = value
                        .parse()
                        .map_err(|_| format!("'{value}' is not a valid day count"))?;
                }
                other => {
                    println!("Unknown key: {other}");
                    return Ok(());
                }
            }
            config.save()?;
            println!("Configuration updated");
        }
    }
    Ok(())
}

//! `qibla config` - inspect and edit the settings file.

use clap::Subcommand;
use console::style;
use qibla::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value
    Get {
        /// Dotted key, e.g. heading.smoothing_factor
        key: String,
    },

    /// Store one value; an empty string clears optional settings
    Set {
        /// Dotted key, e.g. location.latitude
        key: String,

        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Print every key with its current value
    List,

    /// Print where the settings file lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
        }
        ConfigCommands::Get { key } => {
            let key = lookup_key(&key)?;
            let config = ConfigFile::load()?;
            match stored_value(key, &config) {
                Some(value) => println!("{}", value),
                None => println!("{}", style("unset").dim()),
            }
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup_key(&key)?;
            let mut config = ConfigFile::load()?;
            key.set(&mut config, &value)?;
            config.save()?;

            let shown = stored_value(key, &config).unwrap_or_else(|| "unset".to_string());
            println!("{} {} -> {}", style("updated").green(), key.name(), shown);
        }
        ConfigCommands::List => {
            let config = ConfigFile::load()?;
            println!("{}", style(config_file_path().display()).dim());
            for (name, value) in listing(&config) {
                match value {
                    Some(value) => println!("{}  {}", name, value),
                    None => println!("{}  {}", name, style("-").dim()),
                }
            }
        }
    }
    Ok(())
}

fn lookup_key(name: &str) -> Result<ConfigKey, CliError> {
    name.parse().map_err(|_| {
        CliError::Config(format!(
            "no setting named '{}' (see `qibla config list`)",
            name
        ))
    })
}

/// `None` when the key holds no value.
fn stored_value(key: ConfigKey, config: &ConfigFile) -> Option<String> {
    Some(key.get(config)).filter(|value| !value.is_empty())
}

/// Every key with its value, names padded to a common width.
fn listing(config: &ConfigFile) -> Vec<(String, Option<String>)> {
    let width = ConfigKey::all()
        .iter()
        .map(|key| key.name().len())
        .max()
        .unwrap_or(0);

    ConfigKey::all()
        .iter()
        .map(|&key| {
            (
                format!("{:<width$}", key.name(), width = width),
                stored_value(key, config),
            )
        })
        .collect()
}

//! Optional `config.toml` for the command runner.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 65_536;

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default log filter when `RUST_LOG` is unset, e.g. `"debug"`.
    pub log_level: String,
    /// Print the sheet dump once every command has run.
    pub dump_on_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "warn".to_string(),
            dump_on_exit: false,
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "cellgraph", "cellgraph")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Load the config from `explicit`, or from the user config dir if none is
/// given. Problems never abort the run: they come back as warnings and the
/// defaults are used instead.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_config(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    (config.unwrap_or_default(), warnings)
}

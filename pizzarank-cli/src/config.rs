/// Config file loading and creation for the pizzarank CLI.
///
/// Config lives at ~/.config/pizzarank/config.toml.
/// All fields are optional; CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

/// Used for share links when neither `--base-url` nor the config sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PizzarankConfig {
    pub base_url: Option<String>,
    pub sort: Option<String>,
    pub descending: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# pizzarank configuration
# All values here can be overridden by CLI flags.

# Page that share links point at. The offers are appended as ?data=...
# base_url = \"http://localhost:8080/\"

# Default sort column: quantity, diameter, unit-price, total-area,
# total-price or price-per-area
# sort = \"price-per-area\"

# Sort descending instead of ascending
# descending = false
";

/// Returns the default config path: ~/.config/pizzarank/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("pizzarank").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> PizzarankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            PizzarankConfig::default()
        }
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

pub fn parse_config(content: &str) -> Result<PizzarankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the default config file at `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    // Create parent directories
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}

pub mod chat;
pub mod doctor;
pub mod serve;

use std::path::Path;

use personachat_config::{AppConfig, CONFIG_FILE};

/// Load configuration from `path`, or from `./personachat.toml`.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = path.unwrap_or(Path::new(CONFIG_FILE));
    let config =
        AppConfig::load_with_env(path).map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(config)
}

//! `personachat doctor`: Check configuration and persona files.

use std::path::Path;

use personachat_config::{AppConfig, CONFIG_FILE};
use personachat_notify::pushover::is_placeholder;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("PersonaChat Doctor");
    println!("==================\n");

    let mut issues = 0;

    let path = config_path.unwrap_or(Path::new(CONFIG_FILE));
    if path.exists() {
        println!("  ok    Config file: {}", path.display());
    } else {
        println!("  info  No config file at {}, using defaults", path.display());
    }

    let config = match AppConfig::load_with_env(path) {
        Ok(config) => {
            println!("  ok    Configuration valid");
            config
        }
        Err(e) => {
            println!("  FAIL  Configuration invalid: {e}");
            println!();
            println!("  1 issue found. Fix the configuration and run doctor again.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ok    API key configured ({})", config.api_url);
    } else {
        println!("  FAIL  No API key, set OPENAI_API_KEY");
        issues += 1;
    }

    let token = config.notifications.pushover_token.as_deref().unwrap_or_default();
    let user = config.notifications.pushover_user.as_deref().unwrap_or_default();
    if is_placeholder(token) || is_placeholder(user) {
        println!("  warn  Pushover not configured, notifications will only be logged");
        issues += 1;
    } else {
        println!("  ok    Pushover notifications configured");
    }

    for (label, file) in [
        ("Resume PDF", &config.persona.resume_path),
        ("Summary", &config.persona.summary_path),
    ] {
        if file.is_file() {
            println!("  ok    {label}: {}", file.display());
        } else {
            println!("  warn  {label} not found at {}", file.display());
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
        if !path.exists() {
            println!();
            println!("  A starting {CONFIG_FILE}:");
            println!();
            for line in AppConfig::default_toml().lines() {
                println!("    {line}");
            }
        }
    }

    Ok(())
}

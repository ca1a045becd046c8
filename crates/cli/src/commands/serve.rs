//! `personachat serve`: Start the web chat server.

use std::path::Path;

use tracing::warn;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    if !config.has_api_key() {
        warn!(
            "No API key configured; every chat will answer with an apology until OPENAI_API_KEY is set"
        );
    }

    println!("PersonaChat");
    println!("   Persona:   {}", config.persona.name);
    println!("   Model:     {}", config.model);
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);

    personachat_gateway::start(config).await?;

    Ok(())
}

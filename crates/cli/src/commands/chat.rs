//! `personachat chat`: Talk to the persona from the terminal.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use personachat_core::message::Message;
use personachat_core::notify::Notifier;
use personachat_notify::LogNotifier;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
    no_notify: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    // Fail early with setup instructions when no API key is set
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables (or put it in .env):");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!("    PERSONACHAT_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add `api_key = \"sk-...\"` to personachat.toml");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let notifier: Arc<dyn Notifier> = if no_notify {
        Arc::new(LogNotifier)
    } else {
        personachat_notify::build_from_config(&config.notifications)
    };

    let engine = personachat_gateway::build_engine(&config, notifier).await?;

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let response = engine.respond(&msg, &[]).await;
        eprint!("\r              \r");
        println!("{response}");
        return Ok(());
    }

    println!();
    println!("  PersonaChat: Interactive Mode");
    println!();
    println!("  Persona:   {}", engine.persona().name);
    println!("  Model:     {}", engine.model());
    let context = if engine.persona().has_background() {
        "loaded"
    } else {
        "none (add files under me/)"
    };
    println!("  Context:   {context}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        eprint!("  ...");
        let response = engine.respond(input, &history).await;
        eprint!("\r     \r");

        println!();
        for line in response.lines() {
            println!("  {} > {line}", engine.persona().name);
        }
        println!();

        history.push(Message::user(input));
        history.push(Message::assistant(response));
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

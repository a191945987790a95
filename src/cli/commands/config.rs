use anyhow::{Context, Result};
use clap::Subcommand;
use std::process::Command;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Initialize configuration file")]
    Init {
        #[arg(long, short = 'f', help = "Force overwrite existing config")]
        force: bool,
    },
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Show configuration file path")]
    Path,
    #[command(about = "Edit configuration file")]
    Edit,
}

pub async fn handle_config(cmd: ConfigCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    let formatter = get_formatter(format);

    match cmd {
        ConfigCommand::Init { force } => handle_init(force, formatter.as_ref()),
        ConfigCommand::Show => handle_show(format),
        ConfigCommand::Path => handle_path(),
        ConfigCommand::Edit => handle_edit(formatter.as_ref()),
    }
}

fn handle_init(force: bool, formatter: &dyn crate::cli::output::Formatter) -> Result<()> {
    let config_path = Config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    Config::default().save().context("failed to write config")?;
    println!(
        "{}",
        formatter.format_message(&format!("Created config at: {}", config_path.display()))
    );

    Ok(())
}

fn handle_show(format: OutputFormat) -> Result<()> {
    let mut config = Config::load()?;

    // Real keys are never printed, in either format.
    config.embedding.api_key = config.embedding.api_key.map(|_| "********".to_string());
    config.vector_store.api_key = config.vector_store.api_key.map(|_| "********".to_string());

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if let Some(path) = Config::config_path()
        && path.exists()
    {
        println!("# Config file: {}", path.display());
        println!();
    }

    println!("[embedding]");
    println!("url = \"{}\"", config.embedding.url);
    println!("model = \"{}\"", config.embedding.model);
    println!("timeout_secs = {}", config.embedding.timeout_secs);
    if config.embedding.api_key.is_some() {
        println!("api_key = \"********\"");
    }
    println!();

    println!("[vector_store]");
    println!("environment = \"{}\"", config.vector_store.environment);
    println!("index = \"{}\"", config.vector_store.index);
    println!("dimension = {}", config.vector_store.dimension);
    println!("metric = \"{}\"", config.vector_store.metric);
    println!("timeout_secs = {}", config.vector_store.timeout_secs);
    if config.vector_store.api_key.is_some() {
        println!("api_key = \"********\"");
    }
    if let Some(ref url) = config.vector_store.controller_url {
        println!("controller_url = \"{}\"", url);
    }
    if let Some(ref url) = config.vector_store.data_url {
        println!("data_url = \"{}\"", url);
    }
    println!();

    println!("[transcript]");
    println!("data_dir = \"{}\"", config.transcript.data_dir.display());
    println!();

    println!("[search]");
    println!("top_k = {}", config.search.top_k);
    println!("default_format = \"{}\"", config.search.default_format);
    println!();

    println!("[logging]");
    println!("file = \"{}\"", config.logging.file.display());
    println!("filter = \"{}\"", config.logging.filter);

    Ok(())
}

fn handle_path() -> Result<()> {
    let config_path = Config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

    if config_path.exists() {
        println!("Config file (active): {}", config_path.display());
    } else {
        println!("Config file (would be): {}", config_path.display());
    }

    if let Ok(cwd) = std::env::current_dir() {
        let env_path = cwd.join(".env");
        if env_path.exists() {
            println!(".env file (active): {}", env_path.display());
        }
    }

    Ok(())
}

fn handle_edit(formatter: &dyn crate::cli::output::Formatter) -> Result<()> {
    let config_path = Config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

    if !config_path.exists() {
        Config::default().save().context("failed to create config")?;
        println!(
            "{}",
            formatter.format_message(&format!("Created config at: {}", config_path.display()))
        );
    }

    let editor = std::env::var("EDITOR")
        .unwrap_or_else(|_| std::env::var("VISUAL").unwrap_or_else(|_| "vim".into()));

    Command::new(&editor)
        .arg(&config_path)
        .status()
        .context(format!("failed to open editor: {}", editor))?;

    Ok(())
}

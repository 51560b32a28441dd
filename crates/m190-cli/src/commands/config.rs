//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use m190_core::M190Config;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "extraction.lookahead_chars")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let target = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&target),
        ConfigCommand::Init(init_args) => init_config(init_args.output.unwrap_or(target), init_args.force),
        ConfigCommand::Get { key } => get_config(&target, &key),
        ConfigCommand::Set { key, value } => set_config(&target, &key, &value),
        ConfigCommand::Path => show_path(&target),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("m190")
        .join("config.json")
}

/// Load the configuration used by the extraction commands.
///
/// An explicit path must exist; otherwise the default file is used when
/// present, and built-in defaults when it is not.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<M190Config> {
    if let Some(path) = config_path {
        return Ok(M190Config::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(M190Config::from_file(&default_path)?)
    } else {
        Ok(M190Config::default())
    }
}

/// Read the file at `path`, or the defaults when it does not exist yet.
fn read_or_default(path: &Path) -> anyhow::Result<M190Config> {
    if path.exists() {
        Ok(M190Config::from_file(path)?)
    } else {
        Ok(M190Config::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file at {}, showing defaults.",
            style("ℹ").blue(),
            path.display()
        );
    }
    let config = read_or_default(path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(output_path: PathBuf, force: bool) -> anyhow::Result<()> {
    if output_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    M190Config::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Walk a dotted key such as `extraction.lookahead_chars`.
fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').try_fold(json, |node, part| node.get(part))
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(read_or_default(path)?)?;
    let value = lookup(&json, key).ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut json = serde_json::to_value(read_or_default(path)?)?;

    let (section, field) = key
        .rsplit_once('.')
        .ok_or_else(|| anyhow::anyhow!("Expected a dotted key such as extraction.lookahead_chars"))?;
    let pointer = format!("/{}", section.replace('.', "/"));
    let obj = json
        .pointer_mut(&pointer)
        .and_then(|node| node.as_object_mut())
        .filter(|obj| obj.contains_key(field))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    let parsed_value = parse_value(value, &obj[field]);
    obj.insert(field.to_string(), parsed_value.clone());

    let config: M190Config = serde_json::from_value(json)?;
    config.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

/// Parse a command-line value as JSON. Bare words, and JSON that would
/// replace a string setting with another type, are taken as strings.
fn parse_value(value: &str, current: &serde_json::Value) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(value) {
        Ok(parsed) if !current.is_string() || parsed.is_string() => parsed,
        _ => serde_json::Value::String(value.to_string()),
    }
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'm190 config init' to create a configuration file.");
    }

    Ok(())
}

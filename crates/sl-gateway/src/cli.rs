use clap::{Parser, Subcommand};

/// skill-learnerd — turns completed conversational sessions into durable
/// per-learning-space skills.
#[derive(Debug, Parser)]
#[command(name = "skill-learnerd", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the distillation and skill-agent consumers (default).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any issues.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load configuration from the path named by `SL_CONFIG` (default
/// `config.toml`). Missing file falls back to `Config::default()` —
/// `llm.base_url`/`llm.model` still need setting via env/file before
/// `serve` will do anything useful, which `validate` catches.
pub fn load_config() -> anyhow::Result<(sl_domain::config::Config, String)> {
    let config_path = std::env::var("SL_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        sl_domain::config::Config::default()
    };

    Ok((config, config_path))
}

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ConfigCommand};
use sl_bus::AmqpBus;
use sl_bus::{AGENT_BINDING, DISTILL_BINDING};
use sl_db::{PgStore, Store};
use sl_domain::config::Config;
use sl_kv::{KvStore, RedisKvStore};
use sl_llm::{HttpLlmProvider, LlmProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => {
            let (config, _path) = cli::load_config()?;
            init_tracing(&config.observability);
            run(config).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, path) = cli::load_config()?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("Config OK ({path})");
                Ok(())
            } else {
                for issue in &issues {
                    println!("{issue}");
                }
                println!("\n{} issue(s) in {path}", issues.len());
                std::process::exit(1);
            }
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _path) = cli::load_config()?;
            print!("{}", toml::to_string_pretty(&config).context("serializing config")?);
            Ok(())
        }
        Some(Command::Version) => {
            println!("skill-learnerd {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_tracing(config: &sl_domain::config::ObservabilityConfig) {
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
    );
    if config.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            tracing::error!("config: {issue}");
        }
        anyhow::bail!("config validation failed with {} issue(s)", issues.len());
    }
    tracing::info!("skill-learnerd starting");

    let kv: Arc<dyn KvStore> =
        Arc::new(RedisKvStore::connect(&config.kv.url).await.context("connecting to kv store")?);
    tracing::info!(url = %config.kv.url, "kv store ready");

    let bus = Arc::new(AmqpBus::connect(&config.bus.url).context("connecting to message bus")?);
    bus.declare(&DISTILL_BINDING).await.context("declaring distill binding")?;
    bus.declare(&AGENT_BINDING).await.context("declaring agent binding")?;
    tracing::info!(url = %config.bus.url, "message bus ready");

    let store: Arc<dyn Store> = Arc::new(
        PgStore::connect(&config.db.url, config.db.max_connections)
            .await
            .context("connecting to database")?,
    );
    tracing::info!(url = %config.db.url, "relational store ready");

    let llm: Arc<dyn LlmProvider> = Arc::new(HttpLlmProvider::new(&config.llm)?);
    tracing::info!(model = %config.llm.model, "llm provider ready");

    std::fs::create_dir_all(&config.skill_learn.skills_root)
        .with_context(|| format!("creating skills root {}", config.skill_learn.skills_root))?;

    let distill_task = tokio::spawn(sl_orchestrator::run_distill_consumer(
        bus.clone(),
        store.clone(),
        llm.clone(),
        config.bus.clone(),
    ));
    let agent_task = tokio::spawn(sl_orchestrator::run_skill_agent_consumer(
        bus,
        store,
        kv,
        llm,
        config.bus.clone(),
        config.kv.clone(),
        config.skill_learn.clone(),
    ));
    tracing::info!("consumers started");

    tokio::select! {
        res = distill_task => {
            res.context("distillation consumer task panicked")?
                .context("distillation consumer exited")?;
        }
        res = agent_task => {
            res.context("skill-agent consumer task panicked")?
                .context("skill-agent consumer exited")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}

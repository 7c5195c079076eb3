use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use db::{BucketRepository, RequirementRepository, SquadRepository};
use drafting::Credentials;
use server::config::{ServerConfig, CONFIG_FILE};
use server::create_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pm-studio")]
#[command(about = "Requirement backlog with ROI ranking and AI-drafted PRDs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file.
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and create the database.
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API.
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        /// Skip inserting the sample backlog into an empty database.
        #[arg(long)]
        no_samples: bool,
    },
    /// Print the backlog in priority order.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { force }) => init(&cli.config, force).await,
        Some(Commands::Serve { port, no_samples }) => serve(&cli.config, port, no_samples).await,
        Some(Commands::Status) => status(&cli.config).await,
        None => serve(&cli.config, None, false).await,
    }
}

async fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!("Config already exists at {}", config_path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let config = ServerConfig::default();
    config
        .write(config_path)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let pool = db::create_pool(&config.server.database_url)
        .await
        .context("Failed to create database")?;
    db::run_migrations(&pool).await?;
    let report = db::seed_reference_data(&pool).await?;

    println!();
    println!("Initialized PM Studio");
    println!();
    println!("Created:");
    println!("  {}", config_path.display());
    println!(
        "  {} ({} buckets, {} squads)",
        config.server.database_url, report.buckets, report.squads
    );
    println!();
    println!("Next steps:");
    println!("  1. Export GEMINI_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY");
    println!("  2. Run 'pm-studio serve'");

    Ok(())
}

async fn serve(config_path: &Path, port: Option<u16>, no_samples: bool) -> Result<()> {
    init_tracing();

    let mut config = ServerConfig::load(config_path).await;
    if let Some(port) = port {
        config.server.port = port;
    }
    if no_samples {
        config.server.seed_sample_data = false;
    }

    let credentials = Credentials::from_env();
    tracing::info!(database = %config.server.database_url, "Opening database");
    tracing::info!(
        provider = %config.ai.default_provider,
        model = %config.ai.default_model,
        credentials = ?credentials,
        "Drafting configured"
    );

    let state = server::build_state(&config, credentials)
        .await
        .context("Failed to prepare database")?;
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    println!();
    println!("PM Studio");
    println!("════════════════════════════════════════");
    println!();
    println!("  API Server:  http://{}", address);
    println!("  Swagger UI:  http://{}/swagger-ui", address);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn status(config_path: &Path) -> Result<()> {
    let config = ServerConfig::load(config_path).await;

    let pool = db::create_pool(&config.server.database_url)
        .await
        .context("Failed to open database")?;
    db::run_migrations(&pool).await?;

    let requirements = RequirementRepository::new(pool.clone());
    let mut backlog = requirements.find_all().await?;
    backlog.sort_by_key(|r| r.priority);

    let buckets = BucketRepository::new(pool.clone()).find_all().await?;
    let squads = SquadRepository::new(pool).find_all().await?;

    println!();
    println!("Database: {}", config.server.database_url);
    println!();

    if backlog.is_empty() {
        println!("No requirements yet.");
        println!();
        return Ok(());
    }

    println!("Backlog ({}):", backlog.len());
    for r in &backlog {
        let bucket = buckets
            .iter()
            .find(|b| b.id == r.bucket_id)
            .map(|b| b.name.as_str())
            .unwrap_or("?");
        let squad = squads
            .iter()
            .find(|s| s.id == r.squad_id)
            .map(|s| s.name.as_str())
            .unwrap_or("?");
        let drafted = if r.prd_id.is_some() { "●" } else { "○" };

        println!(
            "  {:>3}. {} {:<40} ROI {:>10.2}  {:>2} sprint(s)  [{}] {}/{}  {} test case(s)",
            r.priority,
            drafted,
            r.title,
            r.roi(),
            r.metrics.sprint_estimate,
            r.status.as_str(),
            bucket,
            squad,
            r.test_case_ids.len(),
        );
    }
    println!();
    println!("● has a PRD   ○ no PRD yet");
    println!();

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pm_studio=info,server=info,drafting=info,db=info,pm_core=info,tower_http=info"
                    .into()
            }),
        )
        .init();
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;

/// sociable - post feed with live like counts
#[derive(Parser)]
#[command(name = "sociable")]
#[command(about = "Social feed backend with live like counts", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = sociable::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    sociable::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Serve { host, port } => sociable::server::serve(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: sociable::config::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    sociable::run_migrations(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: sociable::config::Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await
}

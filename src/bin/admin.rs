//! CLI administration tool for slug-shortener.
//!
//! Inspects and seeds the store without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Count stored links
//! cargo run --bin admin -- stats
//!
//! # Show where a slug points
//! cargo run --bin admin -- lookup abc
//!
//! # Create a link (prompts for confirmation)
//! cargo run --bin admin -- create https://example.com --slug docs
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `DB_*` pool
//! settings apply.

use slug_shortener::application::services::{
    ClientKey, CreationService, RedirectResolver, ThrottlePolicy, Throttler,
};
use slug_shortener::config::{self, Config, Environment};
use slug_shortener::domain::repositories::UrlStore;
use slug_shortener::infrastructure::persistence::PgUrlStore;
use slug_shortener::server::connect_pool;
use slug_shortener::utils::slug_generator::RandomSlugGenerator;
use slug_shortener::utils::validator::Candidate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing slug-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics
    Stats,

    /// Show the record stored under a slug
    Lookup {
        /// Slug to look up (case-insensitive)
        slug: String,
    },

    /// Create a short URL
    Create {
        /// Target URL
        url: String,

        /// Custom slug (random if omitted)
        #[arg(short, long)]
        slug: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv_for(Environment::from_env()?);

    let cli = Cli::parse();
    let config = config::load_from_env().context("Invalid configuration")?;

    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Lookup { slug } => handle_lookup(&pool, &slug).await?,
        Commands::Create { url, slug, yes } => {
            handle_create(&config, &pool, url, slug, yes).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn store(pool: &PgPool) -> Arc<dyn UrlStore> {
    Arc::new(PgUrlStore::new(Arc::new(pool.clone())))
}

/// Displays the number of stored links.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links = store(pool)
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!("  Links: {}", links.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_lookup(pool: &PgPool, slug: &str) -> Result<()> {
    let resolver = RedirectResolver::new(store(pool));

    match resolver.lookup(slug).await {
        Some(record) => {
            println!("  Slug:    {}", record.slug.cyan());
            println!("  URL:     {}", record.url.bright_white());
            println!(
                "  Created: {}",
                record
                    .created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
        }
        None => {
            println!("{}", format!("❌ No link for slug '{slug}'").red());
        }
    }

    Ok(())
}

/// Creates a link through the same validation and slug assignment as
/// `POST /url`, without the creation throttle.
async fn handle_create(
    config: &Config,
    pool: &PgPool,
    url: String,
    slug: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Short URL".bright_blue().bold());
    println!();
    println!("  URL:  {}", url.cyan());
    println!(
        "  Slug: {}",
        slug.as_deref().unwrap_or("(random)").bright_yellow()
    );
    println!("  Env:  {}", config.environment.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let service = CreationService::new(
        store(pool),
        Arc::new(RandomSlugGenerator::default()),
        Arc::new(Throttler::new(ThrottlePolicy::unlimited())),
    );

    let record = service
        .create(Candidate { slug, url }, &ClientKey::new("admin-cli"))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!("  Slug: {}", record.slug.bright_yellow().bold());
    println!("  URL:  {}", record.url.bright_white());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

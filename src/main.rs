use std::{process::ExitCode, str::FromStr};

use anyhow::Context;
use clap::Parser;
use customer_batch::{
    customer::repository::InMemoryCustomerRepository,
    item::rdbc::SqliteCustomerRepository,
    migration::{MigrationOptions, MigrationSummary, run_migration},
};
use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(summary) => {
            info!(
                "Migration finished in {:?}: {} created, {} duplicates, {} rows in {}",
                summary.execution.duration,
                summary.stats.created,
                summary.stats.duplicates,
                summary.report_entries,
                cli.errors.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<MigrationSummary> {
    let options = MigrationOptions {
        input: cli.migration.clone(),
        errors: cli.errors.clone(),
        delimiter: cli.delimiter,
        chunk_size: usize::try_from(cli.chunk_size).unwrap_or(usize::MAX),
        skip_limit: cli.skip_limit.unwrap_or(usize::MAX),
        progress: cli.debug,
    };

    if cli.dry_run {
        info!("Dry run: customers are kept in memory");
        let repository = InMemoryCustomerRepository::new();
        return run_migration(&options, &repository).context("migration failed");
    }

    let connect_options = SqliteConnectOptions::from_str(&cli.database_url)
        .with_context(|| format!("invalid database url {}", cli.database_url))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .with_context(|| format!("cannot connect to {}", cli.database_url))?;

    let repository = SqliteCustomerRepository::new(&pool);
    if cli.init_schema {
        repository.create_table_if_missing().await?;
    }

    let summary = run_migration(&options, &repository).context("migration failed");
    pool.close().await;
    summary
}

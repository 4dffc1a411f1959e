//! Command line of the customer migration.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "customers-migration",
    version,
    about = "Import customers from a CSV file and report the rows that failed validation",
    long_about = "Import customers from a CSV file into a SQLite database.\n\n\
                  Rows failing validation are written to an .xlsx report. Rows whose\n\
                  only problem is an unknown location are still imported."
)]
pub struct Cli {
    /// CSV file to import, written as `migration=<path>` or `<path>`.
    #[arg(value_name = "migration=PATH", value_parser = path_arg("migration"))]
    pub migration: PathBuf,

    /// Report to write, written as `errors=<path>` or `<path>`.
    #[arg(value_name = "errors=PATH", value_parser = path_arg("errors"))]
    pub errors: PathBuf,

    /// Print the running totals after every row.
    #[arg(long)]
    pub debug: bool,

    /// Database holding the customers.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://customers.db")]
    pub database_url: String,

    /// Create the customers table if it does not exist.
    #[arg(long)]
    pub init_schema: bool,

    /// Validate and write the report without touching the database.
    #[arg(long)]
    pub dry_run: bool,

    /// Field delimiter of the CSV file.
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Rows per chunk.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: u64,

    /// Rows that may fail to be read or stored before the run aborts (default: unlimited).
    #[arg(long, value_name = "N")]
    pub skip_limit: Option<usize>,
}

/// Parser for a path given either bare or as `<key>=<path>`.
fn path_arg(
    key: &'static str,
) -> impl Fn(&str) -> Result<PathBuf, String> + Clone + Send + Sync + 'static {
    move |value: &str| {
        let path = value
            .split_once('=')
            .filter(|(prefix, _)| *prefix == key)
            .map_or(value, |(_, path)| path);

        if path.is_empty() {
            Err(format!("missing path in '{}'", value))
        } else {
            Ok(PathBuf::from(path))
        }
    }
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ if value == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", value)),
    }
}

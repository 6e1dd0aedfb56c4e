use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tabular_ingest::config::IngestConfig;
use tabular_ingest::ingestion::{IngestionSeverity, TracingObserver};
use tabular_ingest::pipeline::IngestionPipeline;
use tabular_ingest::storage::{SqliteStorage, Storage, TableStatus};

#[derive(Parser)]
#[command(name = "tabular-ingest")]
#[command(about = "Load a CSV/Excel file into a SQL table and write a header cleaning report")]
struct Args {
    /// File to ingest (.csv, .xlsx, .xls)
    file: PathBuf,

    /// Target table name
    #[arg(short, long)]
    table: String,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Database name recorded in the report
    #[arg(long)]
    database_name: Option<String>,

    /// Schema qualifier for the target table
    #[arg(long)]
    schema: Option<String>,

    /// Directory for cleaning reports
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Directory uploads are staged in
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Maximum header length in characters
    #[arg(long)]
    max_header_len: Option<usize>,

    /// Excel worksheet to read (first sheet by default)
    #[arg(long)]
    sheet: Option<String>,

    /// Create every column as unbounded text instead of inferring tiers
    #[arg(long)]
    no_infer_types: bool,
}

impl Args {
    fn into_config(self) -> Result<(IngestConfig, PathBuf, String)> {
        let mut config = match &self.config {
            Some(path) => IngestConfig::from_json_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => IngestConfig::default(),
        };

        if let Some(path) = self.database {
            config.database.path = path;
        }
        if let Some(name) = self.database_name {
            config.database.name = name;
        }
        if self.schema.is_some() {
            config.database.schema = self.schema;
        }
        if let Some(dir) = self.report_dir {
            config.report_dir = dir;
        }
        if let Some(dir) = self.temp_dir {
            config.temp_dir = dir;
        }
        if let Some(n) = self.max_header_len {
            config.max_header_len = n;
        }
        if self.sheet.is_some() {
            config.excel_sheet = self.sheet;
        }
        if self.no_infer_types {
            config.infer_types = false;
        }

        Ok((config, self.file, self.table))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (config, file, table) = Args::parse().into_config()?;

    let storage = SqliteStorage::open(&config.database.path, config.database.name.clone())
        .with_context(|| format!("failed to open database {}", config.database.path.display()))?;
    let mut pipeline = IngestionPipeline::new(storage, config)?
        .with_observer(Arc::new(TracingObserver), IngestionSeverity::Critical);

    let outcome = pipeline
        .ingest_path(&file, &table)
        .with_context(|| format!("failed to ingest {}", file.display()))?;

    println!("Header cleaning:");
    if outcome.header_trims.is_empty() {
        println!("  no header changes were necessary");
    }
    for trim in &outcome.header_trims {
        println!("  - {trim}");
    }

    println!("Column types:");
    for (name, storage) in outcome.column_types.iter() {
        println!("  {name}: {}", storage.sql_type());
    }

    let status = match outcome.table_status {
        TableStatus::Created => "created",
        TableStatus::AlreadyExists => "existing",
    };
    println!(
        "Inserted {} rows into {status} table {}.{}",
        outcome.rows_inserted,
        pipeline.storage().database_name(),
        outcome.table.name
    );
    println!("Cleaning report saved: {}", outcome.report_path.display());

    Ok(())
}

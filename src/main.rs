use clap::Parser;
use docq::{count_table, parse_filters, query_table, Pagination, QueryResult, Record};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docq", about = "Query SQLite tables with Mongo-style filter documents")]
struct Cli {
    #[arg(long, env = "DOCQ_DB")]
    db: Option<PathBuf>,

    #[arg(long, short, help = "Table to query")]
    table: String,

    #[arg(long, short, help = "Filter document, e.g. '[{\"age\": {\"$gte\": 30}}]'")]
    filter: Option<String>,

    #[arg(long, help = "Sort key as field[:ASC|DESC], repeatable")]
    sort: Vec<String>,

    #[arg(long, default_value_t = 0)]
    offset: i64,

    #[arg(long, default_value_t = 0)]
    limit: i64,

    #[arg(long, help = "Print {\"count\": n} instead of rows")]
    count: bool,

    #[arg(long, help = "Print the generated SQL without running it")]
    explain: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("docq={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(db_path) = cli.db.as_deref() else {
        eprintln!("Error: No database specified. Use --db or set DOCQ_DB");
        return ExitCode::from(2);
    };

    match run(&cli, db_path) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Query error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli, db_path: &Path) -> QueryResult<ExitCode> {
    let conn = open_database(db_path)?;

    let filters = match &cli.filter {
        Some(doc) => parse_filters(doc)?,
        None => Vec::new(),
    };

    if cli.count {
        let result = count_table(&conn, &cli.table, Some(filters.as_slice()))?;
        print_json(&result)?;
        return Ok(ExitCode::from(0));
    }

    let pagination = Pagination {
        offset: cli.offset,
        limit: cli.limit,
        sort: vec![cli.sort.iter().map(|key| parse_sort_key(key)).collect()],
    };

    let query = query_table::<Record>(&conn, &cli.table, Some(filters.as_slice()), Some(&pagination))?;
    if cli.explain {
        println!("{}", query.to_sql());
        return Ok(ExitCode::from(0));
    }

    let records = query.fetch()?;
    debug!(rows = records.len(), "query finished");
    for record in &records {
        print_json(record)?;
    }

    if records.is_empty() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::from(0))
    }
}

fn open_database(path: &Path) -> QueryResult<Connection> {
    info!(path = %path.display(), "Opening SQLite database");
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI;
    Ok(Connection::open_with_flags(path, flags)?)
}

/// `age:desc` -> ("age", "desc"); a bare field sorts ascending.
fn parse_sort_key(key: &str) -> (String, String) {
    match key.rsplit_once(':') {
        Some((field, direction)) => (field.to_string(), direction.to_string()),
        None => (key.to_string(), "ASC".to_string()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> QueryResult<()> {
    let line = serde_json::to_string(value)?;
    println!("{}", line);
    Ok(())
}

mod filter;
mod records;
mod values;

use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

use filter::{Catalog, Record};

#[derive(Parser)]
#[command(
    name = "viewq",
    about = "Apply saved-view filter expressions to exported node records"
)]
struct Cli {
    #[arg(long, env = "VIEWQ_DATA", help = "Directory of exported .json record files")]
    data: Option<PathBuf>,

    #[arg(long, help = "List unique values for a field")]
    values: Option<String>,

    #[arg(long, help = "Show count for each value (use with --values)")]
    count: bool,

    #[arg(long, help = "Read file paths from stdin")]
    stdin: bool,

    #[arg(help = "Filter clause in saved-view JSON ($filter/$and/$or)")]
    query: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let files = if cli.stdin {
        records::read_paths_from_stdin()
    } else {
        match cli.data {
            Some(path) => records::collect_export_files(&path),
            None => {
                eprintln!("Error: No data directory specified. Use --data or set VIEWQ_DATA");
                return ExitCode::from(2);
            }
        }
    };

    let mut loaded: Vec<Record> = Vec::new();
    for path in &files {
        match records::load_records(path) {
            Ok(mut batch) => loaded.append(&mut batch),
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        }
    }

    if let Some(property) = cli.values {
        return run_values_mode(&loaded, &property, cli.count);
    }

    let Some(query_str) = cli.query else {
        eprintln!("Error: No filter provided");
        return ExitCode::from(2);
    };

    run_query_mode(&loaded, &query_str)
}

fn run_values_mode(records: &[Record], property: &str, show_count: bool) -> ExitCode {
    let counts = values::collect_values(records, property);

    if counts.is_empty() {
        return ExitCode::from(1);
    }

    let lines = values::format_values(counts, show_count);
    for line in lines {
        println!("{}", line);
    }

    ExitCode::from(0)
}

fn run_query_mode(records: &[Record], query_str: &str) -> ExitCode {
    let clause = match filter::from_str(query_str) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Filter error: {}", e);
            return ExitCode::from(2);
        }
    };

    let catalog = Catalog::standard();
    let matched = match filter::apply(&catalog, &clause, records) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Filter error: {}", e);
            return ExitCode::from(2);
        }
    };

    if matched.is_empty() {
        return ExitCode::from(1);
    }

    for record in matched {
        println!("{}", Value::Object(record.clone()));
    }

    ExitCode::from(0)
}

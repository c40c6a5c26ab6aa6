use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use stardict::utils::diagnostics::LOG_TARGET;
use stardict::Dictionary;

/// Parse and query stardict dictionary files.
#[derive(Parser)]
#[command(name = "stardict", version, about)]
struct Cli {
    /// Directory holding .ifo/.idx/.dict(.dz) files
    #[arg(value_parser = existing_path)]
    dict_path: PathBuf,

    /// Word to look up
    word: String,

    /// Show diagnostic messages.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Print each dictionary's name and word count before the result
    #[arg(long, default_value_t = false)]
    info: bool,
}

fn existing_path(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("Path '{}' does not exist.", s))
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    if debug {
        info!(target: LOG_TARGET, "Verbose messages are enabled.");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let dictionary = match Dictionary::open(&cli.dict_path) {
        Ok(dictionary) => dictionary,
        Err(e) => {
            error!(target: LOG_TARGET, "{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.info {
        for bundle in dictionary.bundles() {
            let word_count = bundle.descriptor().get("wordcount").map(String::as_str).unwrap_or("?");
            println!("{} ({} words)", bundle.book_name(), word_count);
        }
    }

    match dictionary.lookup(&cli.word) {
        Ok(Some(definition)) => println!("{}", definition),
        Ok(None) => println!("Not found: {}", cli.word),
        Err(e) => {
            error!(target: LOG_TARGET, "{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

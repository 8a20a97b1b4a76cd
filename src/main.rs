use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use starfind::app::App;
use starfind::cache::log_path;
use starfind::config::{CacheWritePolicy, Config, ttl_from_hours};
use starfind::error::FetchError;
use starfind::fetch::Fetcher;
use starfind::github::GitHubClient;
use starfind::search::{SearchFields, StrategyKind};
use starfind::state::{SessionState, run_session};
use starfind::ui::format_result_line;

#[derive(Parser)]
#[command(name = "starfind")]
#[command(about = "Find your starred GitHub repositories by relevance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Words to search for
    #[arg(required = true)]
    words: Vec<String>,

    /// Scoring strategy: weighted or indexed
    #[arg(short, long)]
    strategy: Option<StrategyKind>,

    /// Fields to search, comma separated: name, description, readme
    #[arg(short, long)]
    fields: Option<SearchFields>,

    /// Match case-insensitively (weighted strategy)
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Skip the cache and fetch from GitHub
    #[arg(long)]
    no_cache: bool,

    /// Directory for the cache and log file
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Hours before the cache must be refetched
    #[arg(long)]
    ttl_hours: Option<u64>,

    /// Show fetched results even if they could not be cached
    #[arg(long)]
    keep_on_cache_failure: bool,

    /// Print results without the interactive view
    #[arg(long)]
    plain: bool,
}

impl Args {
    /// Apply command line overrides on top of environment configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(fields) = self.fields {
            config.search_fields = fields;
        }
        if self.ignore_case {
            config.case_sensitive = false;
        }
        if self.no_cache {
            config.use_cache = false;
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(hours) = self.ttl_hours {
            config.ttl = ttl_from_hours(hours);
        }
        if self.keep_on_cache_failure {
            config.cache_write_policy = CacheWritePolicy::ReturnData;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let mut config = Config::from_env();
    args.apply(&mut config);

    if let Err(e) = init_logging(&config.cache_dir) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    tracing::info!("Starting starfind v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?config, "Configuration");

    let client = match GitHubClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", FetchError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let fetcher = Fetcher::from_config(client, &config);
    let strategy = config
        .strategy
        .build(config.case_sensitive, config.search_fields);
    let (tx, rx) = mpsc::unbounded_channel();

    if args.plain {
        drop(rx);
        return match run_session(fetcher, args.words, strategy, tx).await {
            Ok(results) => {
                for item in &results {
                    println!("{}", format_result_line(item));
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let session = tokio::spawn(run_session(fetcher, args.words.clone(), strategy, tx));

    let mut app = App::new(args.words, config.strategy, rx);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    // Quitting mid-fetch abandons the session; cache writes are atomic
    session.abort();

    if let Err(e) = result {
        eprintln!("Terminal error: {}", e);
        return ExitCode::FAILURE;
    }

    match app.state() {
        SessionState::Done { results, .. } => {
            for item in results {
                println!("{}", format_result_line(item));
            }
            ExitCode::SUCCESS
        }
        SessionState::Failed { message } => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
        _ => ExitCode::SUCCESS,
    }
}

/// Send logs to a file in the cache directory so they never corrupt the terminal UI.
fn init_logging(cache_dir: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(cache_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(cache_dir))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("starfind=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "starfind",
            "--strategy",
            "indexed",
            "-i",
            "--no-cache",
            "--cache-dir",
            "/tmp/stars",
            "--ttl-hours",
            "1",
            "--keep-on-cache-failure",
            "--fields",
            "name,description",
            "rust",
            "tui",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(args.words, ["rust", "tui"]);
        assert_eq!(config.strategy, StrategyKind::Indexed);
        assert!(!config.case_sensitive);
        assert!(!config.use_cache);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/stars"));
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.cache_write_policy, CacheWritePolicy::ReturnData);
        assert!(!config.search_fields.readme);
        assert!(config.search_fields.name && config.search_fields.description);
    }

    #[test]
    fn test_huge_ttl_hours_saturate() {
        let max = u64::MAX.to_string();
        let args = Args::parse_from(["starfind", "--ttl-hours", max.as_str(), "rust"]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.ttl, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_words_are_required() {
        assert!(Args::try_parse_from(["starfind"]).is_err());
    }
}

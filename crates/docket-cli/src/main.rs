use clap::{Parser, Subcommand};
use docket_core::config::AuthScheme;
use docket_core::query::Aggregations;
use docket_core::report::console;
use docket_core::storage::Store;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "docket",
    version,
    about = "District-court case-law ingestion and aggregation queries"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch sources, rebuild the store, and report counts
    Ingest(IngestArgs),
    /// Case counts and shares per state
    AllCases(QueryArgs),
    /// List every case containing a word
    CasesMatching(TermArgs),
    /// Per-state share of cases containing a word
    MapMatching(TermArgs),
    /// Word frequency over decision dates
    TimePlot(WordsArgs),
    /// Interactive query prompt
    Shell(QueryArgs),
    /// Write a starter config
    Init(InitArgs),
    Version,
}

#[derive(Parser, Clone)]
struct IngestArgs {
    #[arg(long, default_value = "docket.yaml")]
    config: PathBuf,
    #[arg(long, default_value = ".docket/law.db")]
    db: PathBuf,
    #[arg(long, default_value = ".docket/cache.json")]
    cache: PathBuf,
}

#[derive(Parser, Clone)]
struct QueryArgs {
    #[arg(long, default_value = ".docket/law.db")]
    db: PathBuf,
}

#[derive(Parser, Clone)]
struct TermArgs {
    word: String,
    #[arg(long, default_value = ".docket/law.db")]
    db: PathBuf,
}

#[derive(Parser, Clone)]
struct WordsArgs {
    #[arg(required = true)]
    words: Vec<String>,
    #[arg(long, default_value = ".docket/law.db")]
    db: PathBuf,
}

#[derive(Parser, Clone)]
struct InitArgs {
    #[arg(long, default_value = "docket.yaml")]
    config: PathBuf,
}

mod exit_codes {
    pub const OK: i32 = 0;
    pub const RUN_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::RUN_FAILED
        }
    };
    std::process::exit(code);
}

async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Ingest(args) => cmd_ingest(args).await,
        Command::AllCases(args) => {
            let Some(agg) = open_aggregations(&args.db)? else {
                return Ok(exit_codes::CONFIG_ERROR);
            };
            console::print_counts(&agg.counts_by_state()?);
            Ok(exit_codes::OK)
        }
        Command::CasesMatching(args) => {
            let Some(agg) = open_aggregations(&args.db)? else {
                return Ok(exit_codes::CONFIG_ERROR);
            };
            console::print_case_matches(&args.word, &agg.cases_containing(&args.word)?);
            Ok(exit_codes::OK)
        }
        Command::MapMatching(args) => {
            let Some(agg) = open_aggregations(&args.db)? else {
                return Ok(exit_codes::CONFIG_ERROR);
            };
            console::print_match_rates(&args.word, &agg.percent_containing(&args.word)?);
            Ok(exit_codes::OK)
        }
        Command::TimePlot(args) => {
            let Some(agg) = open_aggregations(&args.db)? else {
                return Ok(exit_codes::CONFIG_ERROR);
            };
            console::print_word_trends(&agg.word_frequency_by_date(&args.words)?);
            Ok(exit_codes::OK)
        }
        Command::Shell(args) => cmd_shell(args),
        Command::Init(args) => cmd_init(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

async fn cmd_ingest(args: IngestArgs) -> anyhow::Result<i32> {
    let cfg = match docket_core::config::load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let api_key = std::env::var(&cfg.api_key_env).ok();
    if api_key.is_none() && cfg.auth_scheme != AuthScheme::None {
        tracing::warn!(
            env = %cfg.api_key_env,
            "api key env not set; case API requests go out unauthenticated"
        );
    }

    ensure_parent_dir(&args.db)?;
    let store = Store::open(&args.db)?;
    let cache = docket_core::cache::FetchCache::load(&args.cache);
    let fetcher = Arc::new(docket_core::providers::http::HttpFetcher::new(
        cfg.auth_scheme,
        api_key,
    ));

    let mut ingestor = docket_core::ingest::Ingestor {
        store,
        cache,
        fetcher,
    };
    let report = ingestor.run(&cfg).await?;
    console::print_ingest_summary(&report);
    Ok(exit_codes::OK)
}

fn cmd_init(args: InitArgs) -> anyhow::Result<i32> {
    if args.config.exists() {
        eprintln!("note: {} already exists", args.config.display());
        return Ok(exit_codes::OK);
    }
    if let Some(parent) = args.config.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    docket_core::config::write_sample_config(&args.config).map_err(|e| anyhow::anyhow!(e))?;
    eprintln!("created {}", args.config.display());
    Ok(exit_codes::OK)
}

fn open_aggregations(db: &Path) -> anyhow::Result<Option<Aggregations>> {
    if !db.exists() {
        eprintln!("no store at {}; run `docket ingest` first", db.display());
        return Ok(None);
    }
    Ok(Some(Aggregations::new(Store::open(db)?)))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// One parsed line of shell input. Parsing is separate from execution so
/// malformed input can answer with guidance instead of an error path.
#[derive(Debug, PartialEq)]
enum ShellCommand {
    Help,
    Exit,
    AllCases,
    CasesMatching(String),
    MapMatching(String),
    TimePlot(Vec<String>),
    Empty,
    Invalid(&'static str),
}

impl ShellCommand {
    fn parse(line: &str) -> Self {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            return ShellCommand::Empty;
        };
        match command {
            "exit" => ShellCommand::Exit,
            "help" => ShellCommand::Help,
            "all_cases" => ShellCommand::AllCases,
            "cases_matching" => match rest.first() {
                Some(word) => ShellCommand::CasesMatching(word.to_string()),
                None => ShellCommand::Invalid(
                    "The 'cases_matching' command must be used with a word (e.g., 'cases_matching woman').",
                ),
            },
            "map_matching" => match rest.first() {
                Some(word) => ShellCommand::MapMatching(word.to_string()),
                None => ShellCommand::Invalid(
                    "The 'map_matching' command must be used with a word (e.g., 'map_matching woman').",
                ),
            },
            "time_plot" => {
                if rest.is_empty() {
                    ShellCommand::Invalid(
                        "The 'time_plot' command must be used with one or more words (e.g., 'time_plot woman women gender').",
                    )
                } else {
                    ShellCommand::TimePlot(rest.iter().map(|w| w.to_string()).collect())
                }
            }
            _ => ShellCommand::Invalid(
                "Please enter a valid command, or type 'help' to view a list of available commands.",
            ),
        }
    }
}

const SHELL_HELP: &str = "
    all_cases
        case counts and shares per state

    cases_matching <word>
        list every case containing the word

    map_matching <word>
        per-state share of cases containing the word

    time_plot <word or list of words>
        frequency of the words over decision dates

    exit
        leave the prompt

    help
        these instructions
";

fn cmd_shell(args: QueryArgs) -> anyhow::Result<i32> {
    let Some(agg) = open_aggregations(&args.db)? else {
        return Ok(exit_codes::CONFIG_ERROR);
    };

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        eprint!("Enter command (or 'help' for options): ");
        std::io::stderr().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        match ShellCommand::parse(&line) {
            ShellCommand::Exit => {
                eprintln!("Exiting...");
                break;
            }
            ShellCommand::Help => println!("{}", SHELL_HELP),
            ShellCommand::AllCases => console::print_counts(&agg.counts_by_state()?),
            ShellCommand::CasesMatching(word) => {
                console::print_case_matches(&word, &agg.cases_containing(&word)?)
            }
            ShellCommand::MapMatching(word) => {
                console::print_match_rates(&word, &agg.percent_containing(&word)?)
            }
            ShellCommand::TimePlot(words) => {
                console::print_word_trends(&agg.word_frequency_by_date(&words)?)
            }
            ShellCommand::Empty => {}
            ShellCommand::Invalid(guidance) => eprintln!("{}", guidance),
        }
    }
    Ok(exit_codes::OK)
}

mod config;
mod interactive;
mod logging;
mod output;
mod parse;

use clap::Parser;
use pizzarank_core::{EntryInput, Session, SortDirection, SortKey};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use crate::config::PizzarankConfig;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "pizzarank", version, about = "Rank pizza offers by price per area")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file (default: ~/.config/pizzarank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank a list of offers
    Rank(RankArgs),
    /// Print a share link for a list of offers
    Share(ShareArgs),
    /// Interactive session: add, edit, delete, sort and share offers
    Session(SessionArgs),
    /// Create a default config file at ~/.config/pizzarank/config.toml
    Init,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Inline offer "name,quantity,diameter,price" (repeatable)
    #[arg(long = "entry")]
    entries: Vec<String>,

    /// File with offers: JSON array or one "name,quantity,diameter,price" per line
    #[arg(long)]
    file: Option<PathBuf>,

    /// Share link or encoded payload to start from
    #[arg(long)]
    data: Option<String>,
}

#[derive(clap::Args)]
struct RankArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Sort column: quantity, diameter, unit-price, total-area, total-price, price-per-area
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct ShareArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Page the link points at (default: config base_url, then http://localhost:8080/)
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Share link or encoded payload to start from
    #[arg(long)]
    data: Option<String>,
}

/// Start a session from a share link, if one was given. A link without usable
/// data is reported and ignored.
fn session_from_data(data: Option<&str>) -> Session {
    let mut session = Session::new();
    if let Some(data) = data {
        match session.import_state(data) {
            Ok(count) => tracing::info!(count, "loaded offers from shared state"),
            Err(e) => tracing::warn!("ignoring --data: {e}"),
        }
    }
    session
}

fn add_offers(session: &mut Session, offers: Vec<EntryInput>, origin: &str) {
    for offer in offers {
        let name = offer.name.clone();
        if let Err(e) = session.add(offer.name, offer.quantity, offer.diameter, offer.unit_price) {
            bail(format!("Invalid offer {name:?} from {origin}: {e}"));
        }
    }
}

/// Load offers from all sources: --data link, --file, --entry flags, or stdin.
fn load_session(source: &SourceArgs) -> Session {
    let mut session = session_from_data(source.data.as_deref());

    // From file (auto-detects JSON array vs one-per-line)
    if let Some(ref path) = source.file {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read offers file {}: {e}", path.display())));
        let offers = parse::parse_offers_from_str(&content)
            .unwrap_or_else(|e| bail(format!("{}: {e}", path.display())));
        add_offers(&mut session, offers, &path.display().to_string());
    }

    // From inline --entry flags
    let inline: Vec<EntryInput> = source
        .entries
        .iter()
        .map(|spec| parse::parse_offer(spec).unwrap_or_else(|e| bail(format!("--entry: {e}"))))
        .collect();
    add_offers(&mut session, inline, "--entry");

    // From stdin (only if nothing else produced offers)
    if session.is_empty() {
        let mut stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No offers provided. Use --entry, --file, --data, or pipe offers via stdin.");
        }
        let mut content = String::new();
        stdin
            .read_to_string(&mut content)
            .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")));
        let offers = parse::parse_offers_from_str(&content)
            .unwrap_or_else(|e| bail(format!("stdin: {e}")));
        add_offers(&mut session, offers, "stdin");
    }

    if session.is_empty() {
        bail("No offers to rank.");
    }
    session
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);

    match cli.command {
        Commands::Rank(args) => run_rank(args, &config::load_config(&config_path)),
        Commands::Share(args) => run_share(args, &config::load_config(&config_path)),
        Commands::Session(args) => run_session(args, &config::load_config(&config_path)),
        Commands::Init => {
            config::create_default_config(&config_path);
            println!("Created config at {}", config_path.display());
            println!("Edit it to set your default base URL and sort order.");
        }
    }
}

fn base_url(cli_value: Option<String>, cfg: &PizzarankConfig) -> String {
    cli_value
        .or_else(|| cfg.base_url.clone())
        .unwrap_or_else(|| config::DEFAULT_BASE_URL.to_string())
}

fn run_rank(args: RankArgs, cfg: &PizzarankConfig) {
    // CLI wins over config, config over the built-in default
    let key = match args.sort.as_deref().or(cfg.sort.as_deref()) {
        Some(label) => label
            .parse::<SortKey>()
            .unwrap_or_else(|e| bail(format!("{e}. Use one of: {}", sortable_keys()))),
        None => SortKey::PricePerArea,
    };
    let direction = if args.desc || cfg.descending.unwrap_or(false) {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    let mut session = load_session(&args.source);
    session
        .set_sort(key, direction)
        .unwrap_or_else(|e| bail(format!("{e}. Use one of: {}", sortable_keys())));

    tracing::info!(offers = session.len(), key = %key, direction = %direction, "ranking offers");

    if args.json {
        output::print_json(session.ranked(), session.sort());
    } else {
        output::print_table(session.ranked(), session.sort());
    }
}

fn run_share(args: ShareArgs, cfg: &PizzarankConfig) {
    let base = base_url(args.base_url, cfg);
    let session = load_session(&args.source);

    match session.share_link(&base) {
        Ok(Some(link)) => println!("{link}"),
        Ok(None) => bail("Add at least one offer before sharing."),
        Err(e) => bail(e),
    }
}

fn run_session(args: SessionArgs, cfg: &PizzarankConfig) {
    let base = base_url(None, cfg);
    let mut session = session_from_data(args.data.as_deref());

    if let Some(label) = cfg.sort.as_deref() {
        let direction = if cfg.descending.unwrap_or(false) {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        match label.parse::<SortKey>() {
            Ok(key) => {
                if let Err(e) = session.set_sort(key, direction) {
                    tracing::warn!("ignoring configured sort: {e}");
                }
            }
            Err(e) => tracing::warn!("ignoring configured sort: {e}"),
        }
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout();

    if interactive {
        println!("pizzarank session. Type \"help\" for commands.");
        if !session.is_empty() {
            output::print_table(session.ranked(), session.sort());
        }
    }

    if let Err(e) = interactive::run(&mut session, stdin.lock(), &mut stdout, &base, interactive) {
        bail(format!("Session ended: {e}"));
    }
}

fn sortable_keys() -> String {
    SortKey::SORTABLE
        .iter()
        .map(|k| k.label())
        .collect::<Vec<_>>()
        .join(", ")
}

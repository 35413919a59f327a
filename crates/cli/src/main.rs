use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;

use book_scout_core::config::{config_path, load_config, presenter_from_config, AppConfig};
use book_scout_core::presenter::{Presenter, ViewState};
use book_scout_core::render::{render_rows, RowView, ThumbnailView};

#[derive(Parser)]
#[command(name = "book-scout")]
#[command(about = "Search a public book catalog and list matching titles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the matching rows
    Search {
        /// Search term(s)
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Prompt loop: type a query, press enter, see the list
    Interactive,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize default config file
    Init,
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
}

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let result = match &cli.command {
        Commands::Search { query } => run_search(&query.join(" "), cli.json),
        Commands::Interactive => run_interactive(cli.json),
        Commands::Config { action } => run_config(action, cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_search(query: &str, json: bool) -> CliResult {
    let cfg = load_config();
    tracing::debug!(query, "one-shot search");
    let mut presenter = presenter_from_config(&cfg)?;
    search_once(&mut presenter, query, json)
}

fn run_interactive(json: bool) -> CliResult {
    let cfg = load_config();
    let mut presenter = presenter_from_config(&cfg)?;
    if let ViewState::Empty { message } = presenter.state() {
        println!("{message}");
    }

    let stdin = std::io::stdin();
    loop {
        print!("search> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
            break;
        }
        search_once(&mut presenter, query, json)?;
    }
    Ok(())
}

/// Trigger one search on the presenter and print the resulting view.
fn search_once(presenter: &mut Presenter, query: &str, json: bool) -> CliResult {
    presenter.search(query);

    let spinner = (!json).then(|| {
        let s = indicatif::ProgressBar::new_spinner();
        s.set_message("searching...");
        s.enable_steady_tick(Duration::from_millis(80));
        s
    });
    while presenter.is_searching() {
        std::thread::sleep(Duration::from_millis(50));
    }
    presenter.poll();
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let rows = render_rows(presenter.records());
    if json {
        let (status, message) = match presenter.state() {
            ViewState::Populated => ("populated", None),
            ViewState::Empty { message } => ("empty", Some(message.clone())),
            ViewState::Error { message } => ("error", Some(message.clone())),
        };
        let out = serde_json::json!({ "status": status, "message": message, "rows": rows });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match presenter.state() {
        ViewState::Populated => {
            for row in &rows {
                println!("{}", format_row(row));
            }
        }
        ViewState::Empty { message } | ViewState::Error { message } => println!("{message}"),
    }
    Ok(())
}

/// One text row: cover size (or a blank slot), title, comma-joined authors.
fn format_row(row: &RowView) -> String {
    let cover = match &row.thumbnail {
        ThumbnailView::Image { width, height } => format!("[{}x{}]", width, height),
        ThumbnailView::Placeholder => "[     ]".to_string(),
    };
    if row.authors_line.is_empty() {
        format!("{} {}", cover, row.title)
    } else {
        format!("{} {} - {}", cover, row.title, row.authors_line)
    }
}

fn run_config(action: &ConfigAction, json: bool) -> CliResult {
    match action {
        ConfigAction::Init => {
            let path = config_path().ok_or("no config directory available")?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, toml::to_string_pretty(&AppConfig::default())?)?;
            if !json {
                println!("Wrote: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let cfg = load_config();
            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else {
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_path().ok_or("no config directory available")?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use issue_lens::chart::TerminalChart;
use issue_lens::config::loader::expand_tilde;
use issue_lens::config::{ConfigError, Resolver, keys};
use issue_lens::keyword::KeywordSearch;
use issue_lens::labels::LabelAnalysis;
use issue_lens::loader::DataLoader;

#[derive(Parser)]
#[command(name = "issue-lens", version, about = "Issue tracker analytics")]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the exported issues JSON file.
    #[arg(short, long)]
    data: Option<String>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find issues mentioning a keyword and quote the evidence.
    Keyword {
        /// Word or phrase to search for (case-insensitive).
        #[arg(short, long)]
        keyword: Option<String>,
        /// Where to write the report.
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Label frequency and average resolution time per label.
    Labels,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    let mut config = Resolver::discover(cli.config.as_deref())?;
    config.set_opt(keys::DATA_PATH, cli.data);

    match cli.command {
        Commands::Keyword { keyword, output } => {
            config.set_opt(keys::KEYWORD, keyword);
            config.set_opt(keys::OUTPUT_PATH, output);
            run_keyword(&config)
        }
        Commands::Labels => run_labels(&config),
    }
}

fn run_keyword(config: &Resolver) -> Result<()> {
    // Fail fast, before any data is read.
    let keyword = match config.require_str(keys::KEYWORD) {
        Ok(keyword) => keyword,
        Err(err @ ConfigError::MissingParameter { .. }) => {
            eprintln!("error: {err}");
            eprintln!("usage: issue-lens keyword --keyword <WORD>");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    let loader = data_loader(config);
    let output = config
        .get_str(keys::OUTPUT_PATH)
        .unwrap_or_else(|| keys::DEFAULT_OUTPUT_PATH.to_owned());
    let chart = terminal_chart(config)?;

    tracing::info!(%keyword, output = %output, "keyword search starting");
    let mut search = KeywordSearch::new(expand_tilde(&output), chart);
    search.run(loader.issues()?, &keyword, &mut std::io::stdout().lock())?;
    Ok(())
}

fn run_labels(config: &Resolver) -> Result<()> {
    let loader = data_loader(config);
    let mut chart = terminal_chart(config)?;
    LabelAnalysis::run(loader.issues()?, &mut chart, &mut std::io::stdout().lock())?;
    Ok(())
}

fn data_loader(config: &Resolver) -> DataLoader {
    let path = config
        .get_str(keys::DATA_PATH)
        .unwrap_or_else(|| keys::DEFAULT_DATA_PATH.to_owned());
    DataLoader::new(expand_tilde(&path))
}

fn terminal_chart(config: &Resolver) -> Result<TerminalChart<std::io::Stdout>> {
    let width = config.get_usize(keys::CHART_WIDTH, keys::DEFAULT_CHART_WIDTH)?;
    Ok(TerminalChart::stdout(width).with_color(std::io::stdout().is_terminal()))
}

//! Benchmark CLI: run every heuristic and mode over a file of start|goal
//! cases and write a TSV report.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;
use wikiracer::bench::{load_cases, BenchmarkHarness};
use wikiracer::cli::{LogArgs, ProviderArgs, TfIdfArgs};
use wikiracer::heuristic::{HeuristicContext, HeuristicKind};
use wikiracer::search::SearchMode;
use wikiracer::{logging, provider, Config};

#[derive(Parser, Debug)]
#[command(name = "bench")]
struct Args {
    /// Case file: one start|goal pair per line, # for comments
    cases: PathBuf,

    /// Report file (default: results.tsv)
    #[arg(long, default_value = "results.tsv")]
    results: PathBuf,

    /// Heuristic to run (repeatable; default bfs and dfs)
    #[arg(long = "heuristic", value_enum)]
    heuristics: Vec<HeuristicKind>,

    /// Search modes to run, comma separated
    #[arg(long, value_delimiter = ',', default_value = "astar")]
    modes: Vec<ModeArg>,

    /// Abandon a single search after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(flatten)]
    provider: ProviderArgs,

    #[command(flatten)]
    tfidf: TfIdfArgs,

    #[command(flatten)]
    log: LogArgs,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Astar,
    Greedy,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Astar => SearchMode::AStar,
            ModeArg::Greedy => SearchMode::Greedy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    args.provider.apply(&mut config);
    args.tfidf.apply(&mut config);
    config.validate()?;
    logging::init(&args.log.options(&config.log_level))?;

    let cases = load_cases(&args.cases)
        .with_context(|| format!("Failed to read cases from {}", args.cases.display()))?;
    if cases.is_empty() {
        anyhow::bail!("No cases in {}", args.cases.display());
    }

    let heuristics = if args.heuristics.is_empty() {
        vec![HeuristicKind::Bfs, HeuristicKind::Dfs]
    } else {
        args.heuristics.clone()
    };
    let modes: Vec<SearchMode> = args.modes.iter().copied().map(SearchMode::from).collect();
    let context = HeuristicContext::prepare(&heuristics, &config.tfidf)?;

    let provider = provider::build(&config)?;
    provider.load().await.context("Failed to load content provider")?;

    let timeout = args.timeout.or(config.search.timeout_secs).map(Duration::from_secs);
    let harness = BenchmarkHarness::new(provider, context, heuristics, modes).with_timeout(timeout);

    let file = File::create(&args.results)
        .with_context(|| format!("Failed to create {}", args.results.display()))?;
    let mut writer = BufWriter::new(file);
    let rows = harness.run_report(&cases, &mut writer).await?;

    println!(
        "Wrote {} rows for {} cases to {}",
        rows.len(),
        cases.len(),
        args.results.display()
    );
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use std::time::{Duration, Instant};
use wikiracer::cli::{LogArgs, ProviderArgs, TfIdfArgs};
use wikiracer::heuristic::{HeuristicContext, HeuristicKind};
use wikiracer::search::{SearchEngine, SearchMode};
use wikiracer::{logging, provider, Config};

/// Find a path between two Wikipedia articles with the given heuristic.
#[derive(Parser, Debug)]
#[command(name = "wikiracer", version)]
struct Args {
    /// The starting article name
    start: String,

    /// The goal article name
    goal: String,

    /// Heuristic used to order the frontier (default from config)
    #[arg(long, value_enum)]
    heuristic: Option<HeuristicKind>,

    /// Rank by heuristic score alone instead of accumulated cost
    #[arg(long)]
    greedy: bool,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(flatten)]
    provider: ProviderArgs,

    #[command(flatten)]
    tfidf: TfIdfArgs,

    #[command(flatten)]
    log: LogArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    args.provider.apply(&mut config);
    args.tfidf.apply(&mut config);
    config.validate()?;
    logging::init(&args.log.options(&config.log_level))?;

    let kind = args.heuristic.unwrap_or(config.search.heuristic);
    let mode = SearchMode::from_greedy(args.greedy || config.search.greedy);
    let context = HeuristicContext::prepare(&[kind], &config.tfidf)?;

    let provider = provider::build(&config)?;
    provider.load().await.context("Failed to load content provider")?;

    let start = provider
        .canonical_name(&args.start)
        .await
        .with_context(|| format!("Cannot resolve start article {:?}", args.start))?;
    let goal = provider
        .canonical_name(&args.goal)
        .await
        .with_context(|| format!("Cannot resolve goal article {:?}", args.goal))?;
    log::info!("Searching {} -> {} with {} ({})", start, goal, kind, mode);

    let engine = SearchEngine::new(provider);
    let mut heuristic = context.build(kind)?;
    let started = Instant::now();
    let search = engine.run(&start, &goal, heuristic.as_mut(), mode);
    let outcome = match args.timeout.or(config.search.timeout_secs) {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), search)
            .await
            .map_err(|_| anyhow::anyhow!("Search timed out after {}s", secs))??,
        None => search.await?,
    };
    let elapsed = started.elapsed().as_secs_f64();

    if outcome.is_found() {
        println!("{}", outcome.path.join(" -> "));
        println!(
            "Path length {} found in {:.2}s with {} expansions",
            outcome.path_length(),
            elapsed,
            outcome.nodes_expanded
        );
    } else {
        println!(
            "No path from {} to {} ({} expansions, {:.2}s)",
            start, goal, outcome.nodes_expanded, elapsed
        );
    }

    Ok(())
}

//! Estimate the branching factor of the article graph by sampling random
//! articles and averaging their link counts.

use anyhow::{Context, Result};
use clap::Parser;
use wikiracer::cli::{LogArgs, ProviderArgs};
use wikiracer::{logging, provider, Config};

#[derive(Parser, Debug)]
#[command(name = "branching")]
struct Args {
    /// Number of random articles to sample
    #[arg(default_value_t = 10)]
    samples: usize,

    #[command(flatten)]
    provider: ProviderArgs,

    #[command(flatten)]
    log: LogArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    args.provider.apply(&mut config);
    config.validate()?;
    logging::init(&args.log.options(&config.log_level))?;

    if args.samples == 0 {
        anyhow::bail!("samples must be greater than 0");
    }

    let provider = provider::build(&config)?;
    provider.load().await.context("Failed to load content provider")?;

    let mut link_total = 0usize;
    let mut sampled = 0usize;
    for i in 0..args.samples {
        let title = provider.random_title().await.context("Failed to sample an article")?;
        match provider.text_and_links(&title).await {
            Ok((_, links)) => {
                log::info!("[{}/{}] {}: {} links", i + 1, args.samples, title, links.len());
                link_total += links.len();
                sampled += 1;
            }
            Err(e) => log::warn!("Skipping {}: {}", title, e),
        }
    }

    if sampled == 0 {
        anyhow::bail!("No article could be fetched");
    }
    let average = link_total as f64 / sampled as f64;
    log::info!("Average links per article over {} samples: {:.2}", sampled, average);
    println!("{:.2}", average);
    Ok(())
}

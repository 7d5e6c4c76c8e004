//! Build a TF-IDF corpus file from random articles, one flattened article
//! text per line.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use wikiracer::cli::{LogArgs, ProviderArgs};
use wikiracer::{corpus, logging, provider, Config};

#[derive(Parser, Debug)]
#[command(name = "corpus")]
struct Args {
    /// Number of random articles to sample
    count: usize,

    /// Corpus file to write (default: first free corpus-<count>.txt)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

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

    if args.count == 0 {
        anyhow::bail!("count must be greater than 0");
    }

    let output = args
        .output
        .unwrap_or_else(|| corpus::default_output_path(Path::new("."), args.count));
    log::info!("Generating corpus of {} random articles into {}", args.count, output.display());

    let provider = provider::build(&config)?;
    provider.load().await.context("Failed to load content provider")?;

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let written = corpus::write_random_corpus(provider.as_ref(), args.count, &mut writer)
        .await
        .context("Corpus generation failed")?;

    if written == 0 {
        anyhow::bail!("No article text could be fetched");
    }
    println!("{}", output.display());
    Ok(())
}

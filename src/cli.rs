//! Command-line flags shared by the binaries.

use clap::Args;
use std::path::PathBuf;

use crate::config::{Config, ProviderKind};
use crate::logging::LogOptions;

/// Content provider selection; each flag overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// Content provider to search with
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// SQLite database for the sql provider
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// JSON graph for the memory provider
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// REST API root for the rest provider
    #[arg(long, value_name = "URL")]
    pub api_root: Option<String>,

    /// Concurrent summary requests for the rest provider
    #[arg(long)]
    pub workers: Option<usize>,
}

impl ProviderArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(kind) = self.provider {
            config.provider.kind = kind;
        }
        if let Some(db) = &self.db {
            config.sql.db_path = db.clone();
        }
        if let Some(graph) = &self.graph {
            config.memory.graph_path = Some(graph.clone());
        }
        if let Some(api_root) = &self.api_root {
            config.rest.api_root = api_root.clone();
        }
        if let Some(workers) = self.workers {
            config.rest.worker_count = workers;
        }
    }
}

/// TF-IDF heuristic inputs.
#[derive(Args, Debug, Clone, Default)]
pub struct TfIdfArgs {
    /// Corpus for the tfidf heuristic, one document per line
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Goal keywords compared by the tfidf heuristic
    #[arg(long)]
    pub keywords: Option<usize>,
}

impl TfIdfArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(corpus) = &self.corpus {
            config.tfidf.corpus_path = Some(corpus.clone());
        }
        if let Some(keywords) = self.keywords {
            config.tfidf.keyword_limit = keywords;
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Fewer log messages (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// More log messages (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of the console
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Disable console logging
    #[arg(long)]
    pub no_console: bool,
}

impl LogArgs {
    pub fn options(&self, default_level: &str) -> LogOptions {
        LogOptions {
            quiet: self.quiet,
            verbose: self.verbose,
            log_file: self.log_file.clone(),
            console: !self.no_console,
            default_level: default_level.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        provider: ProviderArgs,
        #[command(flatten)]
        tfidf: TfIdfArgs,
        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn test_flags_override_config() {
        let cli = TestCli::parse_from([
            "test",
            "--provider",
            "memory",
            "--graph",
            "graph.json",
            "--workers",
            "2",
            "--corpus",
            "corpus.txt",
            "-qq",
        ]);
        let mut config = Config::default();
        cli.provider.apply(&mut config);
        cli.tfidf.apply(&mut config);

        assert_eq!(config.provider.kind, ProviderKind::Memory);
        assert_eq!(config.memory.graph_path, Some(PathBuf::from("graph.json")));
        assert_eq!(config.rest.worker_count, 2);
        assert_eq!(config.tfidf.corpus_path, Some(PathBuf::from("corpus.txt")));
        assert_eq!(config.tfidf.keyword_limit, 5);

        let options = cli.log.options("info");
        assert_eq!(options.quiet, 2);
        assert!(options.console);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(TestCli::try_parse_from(["test", "--provider", "bz2"]).is_err());
    }
}

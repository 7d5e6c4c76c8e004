//! Benchmark harness: every case × heuristic × mode, timed, as a TSV report.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Result, WikiracerError};
use crate::heuristic::{HeuristicContext, HeuristicKind};
use crate::provider::ContentProvider;
use crate::search::{SearchEngine, SearchMode, SearchOutcome};
use crate::title::abbreviate_path;

/// Column header of the report.
pub const TSV_HEADER: &str =
    "start\tgoal\theuristic\tgreedy\ttime_seconds\tnodes_expanded\tpath_length\tpath";

/// One `start|goal` line of a case file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkCase {
    pub start: String,
    pub goal: String,
}

/// Parse a case file. Blank lines and `#` comments are skipped.
pub fn parse_cases(content: &str) -> Result<Vec<BenchmarkCase>> {
    let mut cases = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (start, goal) = line.split_once('|').ok_or_else(|| {
            WikiracerError::Parse(format!("line {}: expected start|goal, got {:?}", i + 1, line))
        })?;
        let (start, goal) = (start.trim(), goal.trim());
        if start.is_empty() || goal.is_empty() {
            return Err(WikiracerError::Parse(format!(
                "line {}: start and goal must not be empty",
                i + 1
            )));
        }
        cases.push(BenchmarkCase {
            start: start.to_string(),
            goal: goal.to_string(),
        });
    }
    Ok(cases)
}

pub fn load_cases<P: AsRef<Path>>(path: P) -> Result<Vec<BenchmarkCase>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_cases(&content)
}

/// One finished search.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub start: String,
    pub goal: String,
    pub heuristic: String,
    pub mode: SearchMode,
    pub time_seconds: f64,
    pub outcome: SearchOutcome,
}

fn tsv_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

impl BenchmarkRow {
    pub fn to_tsv_line(&self) -> String {
        [
            tsv_field(&self.start),
            tsv_field(&self.goal),
            self.heuristic.clone(),
            self.mode.is_greedy().to_string(),
            format!("{:.3}", self.time_seconds),
            self.outcome.nodes_expanded.to_string(),
            self.outcome.path_length().to_string(),
            tsv_field(&self.outcome.path.join(" -> ")),
        ]
        .join("\t")
    }
}

/// Write a complete report: header then one line per row.
pub fn write_tsv<W: Write>(rows: &[BenchmarkRow], writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", TSV_HEADER)?;
    for row in rows {
        writeln!(writer, "{}", row.to_tsv_line())?;
    }
    writer.flush()?;
    Ok(())
}

/// Runs the search engine over a list of cases.
pub struct BenchmarkHarness {
    engine: SearchEngine,
    context: HeuristicContext,
    heuristics: Vec<HeuristicKind>,
    modes: Vec<SearchMode>,
    timeout: Option<Duration>,
}

impl BenchmarkHarness {
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        context: HeuristicContext,
        heuristics: Vec<HeuristicKind>,
        modes: Vec<SearchMode>,
    ) -> Self {
        Self {
            engine: SearchEngine::new(provider),
            context,
            heuristics,
            modes,
            timeout: None,
        }
    }

    /// Abandon any single search running longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rows for one case. Cases whose titles do not resolve yield nothing;
    /// failed or timed-out runs are logged and left out.
    pub async fn run_case(&self, case: &BenchmarkCase) -> Vec<BenchmarkRow> {
        let provider = self.engine.provider();
        let (start, goal) = match (
            provider.canonical_name(&case.start).await,
            provider.canonical_name(&case.goal).await,
        ) {
            (Ok(start), Ok(goal)) => (start, goal),
            (Err(e), _) | (_, Err(e)) => {
                log::error!("Skipping {} -> {}: {}", case.start, case.goal, e);
                return Vec::new();
            }
        };

        let mut rows = Vec::new();
        for &kind in &self.heuristics {
            for &mode in &self.modes {
                match self.run_one(&start, &goal, kind, mode).await {
                    Ok(Some(row)) => rows.push(row),
                    Ok(None) => {}
                    Err(e) => log::error!(
                        "Heuristic {} ({}) failed for {} -> {}: {}",
                        kind,
                        mode,
                        start,
                        goal,
                        e
                    ),
                }
            }
        }
        rows
    }

    async fn run_one(
        &self,
        start: &str,
        goal: &str,
        kind: HeuristicKind,
        mode: SearchMode,
    ) -> Result<Option<BenchmarkRow>> {
        let mut heuristic = self.context.build(kind)?;
        log::info!(
            "Testing heuristic {} ({}) with start {} and goal {}",
            kind,
            mode,
            start,
            goal
        );

        let started = Instant::now();
        let search = self.engine.run(start, goal, heuristic.as_mut(), mode);
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, search).await {
                Ok(outcome) => outcome?,
                Err(_) => {
                    log::warn!(
                        "Heuristic {} ({}) timed out after {:?} for {} -> {}",
                        kind,
                        mode,
                        limit,
                        start,
                        goal
                    );
                    return Ok(None);
                }
            },
            None => search.await?,
        };
        let time_seconds = started.elapsed().as_secs_f64();

        log::info!(
            "Found path of length {} in {:.3} seconds with {} expansions: {}",
            outcome.path_length(),
            time_seconds,
            outcome.nodes_expanded,
            abbreviate_path(&outcome.path)
        );

        Ok(Some(BenchmarkRow {
            start: start.to_string(),
            goal: goal.to_string(),
            heuristic: kind.to_string(),
            mode,
            time_seconds,
            outcome,
        }))
    }

    pub async fn run_all(&self, cases: &[BenchmarkCase]) -> Vec<BenchmarkRow> {
        let mut rows = Vec::new();
        for case in cases {
            rows.extend(self.run_case(case).await);
        }
        rows
    }

    /// Like [`run_all`](Self::run_all), but writes each case's rows to
    /// `writer` as soon as the case finishes.
    pub async fn run_report<W: Write>(
        &self,
        cases: &[BenchmarkCase],
        writer: &mut W,
    ) -> Result<Vec<BenchmarkRow>> {
        let started_at = chrono::Local::now();
        writeln!(writer, "{}", TSV_HEADER)?;

        let mut rows = Vec::new();
        for (i, case) in cases.iter().enumerate() {
            log::info!("Case {}/{}: {} -> {}", i + 1, cases.len(), case.start, case.goal);
            let case_rows = self.run_case(case).await;
            for row in &case_rows {
                writeln!(writer, "{}", row.to_tsv_line())?;
            }
            writer.flush()?;
            rows.extend(case_rows);
        }

        log::info!(
            "Benchmark started {} finished with {} rows over {} cases",
            started_at.format("%Y-%m-%d %H:%M:%S"),
            rows.len(),
            cases.len()
        );
        Ok(rows)
    }
}

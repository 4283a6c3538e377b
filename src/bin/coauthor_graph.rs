//! Co-author graph command line.
//!
//! Crawls a co-authorship dataset from a seed author and writes the
//! renderer-facing graph export as JSON.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: coauthor_graph=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for humans (default: pretty)
//!
//! Logs go to stderr in pretty form unless `LOG_FORMAT=json`, since this is an
//! interactive tool rather than a long-running service.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features cli --bin coauthor_graph -- build "Ada Lovelace" \
//!     --dataset authors.json --depth 2 --max-authors 25 --output graph.json
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coauthor_graph::{
    AuthorId, CacheStats, CachedProvider, CrawlReport, CrawlStats, DatasetProvider,
    GraphExport, ProfileProvider, TraversalEngine, TraversalPolicy, WeightReconciliation,
};

#[derive(Parser, Debug)]
#[command(
    name = "coauthor_graph",
    about = "Build a weighted co-author graph from a seed author",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from a seed author and write the graph export
    Build {
        /// Author name, profile URL (…/pid/<pid>.html) or `pid:<pid>`
        query: String,
        /// Dataset file the profiles are served from
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        /// Hop limit from the seed author
        #[arg(long, default_value_t = 1)]
        depth: u32,
        /// Follow at most this many collaborators per author (default: unlimited)
        #[arg(long = "max-authors", value_name = "N")]
        max_authors: Option<NonZeroUsize>,
        /// Output file for the JSON export
        #[arg(long, value_name = "FILE", default_value = "graph.json")]
        output: PathBuf,
        /// How conflicting joint-publication counts are reconciled
        #[arg(long, value_enum, default_value_t = Reconcile::Max)]
        reconcile: Reconcile,
        /// Disable the provider lookup cache
        #[arg(long)]
        no_cache: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Reconcile {
    Max,
    FirstWrite,
}

impl From<Reconcile> for WeightReconciliation {
    fn from(r: Reconcile) -> Self {
        match r {
            Reconcile::Max => WeightReconciliation::Max,
            Reconcile::FirstWrite => WeightReconciliation::FirstWrite,
        }
    }
}

/// JSON document written to `--output`.
#[derive(Serialize)]
struct RunOutput {
    generated_at: DateTime<Utc>,
    seed: AuthorId,
    policy: TraversalPolicy,
    policy_hash: String,
    stats: CrawlStats,
    failures: Vec<FailureOutput>,
    cache: Option<CacheStats>,
    graph: GraphExport,
}

#[derive(Serialize)]
struct FailureOutput {
    author: AuthorId,
    depth: u32,
    error: String,
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coauthor_graph=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            query,
            dataset,
            depth,
            max_authors,
            output,
            reconcile,
            no_cache,
        } => {
            let policy = TraversalPolicy::new(depth, max_authors).with_reconciliation(reconcile.into());
            let provider = Arc::new(DatasetProvider::from_path(&dataset)?);

            if no_cache {
                let engine = TraversalEngine::new(provider, policy);
                let report = crawl_or_exit(&engine, &query).await?;
                write_output(&output, engine.policy(), report, None)
            } else {
                let engine = TraversalEngine::new(Arc::new(CachedProvider::new(provider)), policy);
                let report = crawl_or_exit(&engine, &query).await?;
                let cache = engine.provider().cache_stats();
                write_output(&output, engine.policy(), report, cache)
            }
        }
    }
}

async fn crawl_or_exit<P: ProfileProvider>(
    engine: &TraversalEngine<P>,
    query: &str,
) -> Result<CrawlReport, Box<dyn std::error::Error>> {
    match engine.crawl(query).await {
        Ok(report) => Ok(report),
        Err(e) => {
            error!(error = %e, query = query, "Crawl aborted; no output written");
            Err(e.into())
        }
    }
}

fn write_output(
    path: &Path,
    policy: &TraversalPolicy,
    report: CrawlReport,
    cache: Option<CacheStats>,
) -> Result<(), Box<dyn std::error::Error>> {
    for failure in &report.failures {
        warn!(author = %failure.author, depth = failure.depth, error = %failure.error, "Partial expansion");
    }

    let out = RunOutput {
        generated_at: Utc::now(),
        seed: report.seed.clone(),
        policy: policy.clone(),
        policy_hash: report.policy_hash.clone(),
        stats: report.stats.clone(),
        failures: report
            .failures
            .iter()
            .map(|f| FailureOutput {
                author: f.author.clone(),
                depth: f.depth,
                error: f.error.to_string(),
            })
            .collect(),
        cache,
        graph: report.graph.export(),
    };

    std::fs::write(path, serde_json::to_string_pretty(&out)?)?;

    info!(
        output = %path.display(),
        authors = out.graph.nodes.len(),
        collaborations = out.graph.edges.len(),
        max_weight = out.graph.max_weight(),
        max_degree = out.graph.max_degree(),
        failures = out.failures.len(),
        fingerprint = %out.graph.fingerprint,
        "Graph written"
    );
    println!("Saved co-author graph to: {}", path.display());
    Ok(())
}

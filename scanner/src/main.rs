mod db;
mod scan;

use gif_hazard::HazardEvaluator;
use gif_hazard_common::config::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.parse().unwrap_or_default()),
        )
        .init();

    info!(
        input_dir = config.scanner.input_dir,
        extension = config.scanner.extension,
        max_concurrent = config.scanner.max_concurrent,
        parallel = config.evaluator.parallel,
        "starting gif-hazard scanner"
    );

    let input_dir = Path::new(&config.scanner.input_dir);
    let paths = match scan::collect_candidates(input_dir, &config.scanner.extension) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "failed to list candidate images");
            std::process::exit(1);
        }
    };
    info!(candidates = paths.len(), "candidate images found");

    let verdict_db = match db::VerdictDb::open(Path::new(&config.database.path)) {
        Ok(d) => Some(Arc::new(d)),
        Err(e) => {
            error!(error = %e, "failed to open SQLite verdict DB; verdicts will only be printed");
            None
        }
    };

    let evaluator = Arc::new(HazardEvaluator::new(config.evaluator.clone()));
    scan::run_scan(
        paths,
        evaluator,
        verdict_db.clone(),
        config.scanner.max_concurrent,
    )
    .await;

    if let Some(db) = verdict_db {
        match db.category_counts() {
            Ok(counts) => {
                for (category, count) in counts {
                    info!(category, count, "stored verdicts");
                }
            }
            Err(e) => error!(error = %e, "failed to summarize stored verdicts"),
        }
    }
}

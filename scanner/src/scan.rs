use gif_hazard::{DecodeError, HazardEvaluator, Verdict};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::db::VerdictDb;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failed to decode {0}: {1}")]
    Decode(String, DecodeError),
    #[error("evaluation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One line of scanner output.
#[derive(Debug, Serialize)]
pub struct VerdictRecord<'a> {
    pub source: &'a str,
    #[serde(flatten)]
    pub verdict: &'a Verdict,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub evaluated: u64,
    pub failed: u64,
}

/// Regular files in `dir` whose extension matches (case-insensitive), sorted.
pub fn collect_candidates(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| ScanError::Io(dir.display().to_string(), e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ScanError::Io(dir.display().to_string(), e))?;
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Evaluate one image file, streaming its frames from disk.
pub fn evaluate_file(evaluator: &HazardEvaluator, path: &Path) -> Result<Verdict, ScanError> {
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| ScanError::Io(source.clone(), e))?;
    evaluator
        .evaluate_reader(BufReader::new(file))
        .map_err(|e| ScanError::Decode(source, e))
}

/// Evaluate every candidate on the blocking pool, at most `max_concurrent`
/// at a time. Failures are logged and skipped; successes are printed as
/// JSON lines and recorded in `db` when one is available.
pub async fn run_scan(
    paths: Vec<PathBuf>,
    evaluator: Arc<HazardEvaluator>,
    db: Option<Arc<VerdictDb>>,
    max_concurrent: usize,
) -> ScanSummary {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for path in paths {
        let semaphore = Arc::clone(&semaphore);
        let evaluator = Arc::clone(&evaluator);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let eval_path = path.clone();
            let result = tokio::task::spawn_blocking(move || evaluate_file(&evaluator, &eval_path))
                .await
                .map_err(ScanError::from)
                .and_then(|r| r);
            (path, result)
        });
    }

    let mut summary = ScanSummary::default();
    while let Some(joined) = tasks.join_next().await {
        let (path, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                warn!(error = %e, "scan task panicked");
                summary.failed += 1;
                continue;
            }
        };
        let source = path.display().to_string();

        match result {
            Ok(verdict) => {
                summary.evaluated += 1;
                report(&source, &verdict, db.as_deref());
            }
            Err(e) => {
                summary.failed += 1;
                warn!(source, error = %e, "skipping candidate");
            }
        }
    }

    info!(
        evaluated = summary.evaluated,
        failed = summary.failed,
        "scan finished"
    );
    summary
}

fn report(source: &str, verdict: &Verdict, db: Option<&VerdictDb>) {
    info!(
        source,
        category = %verdict.category,
        danger_level = verdict.danger_level,
        diff_frame_count = verdict.diff_frame_count,
        "candidate evaluated"
    );

    match serde_json::to_string(&VerdictRecord { source, verdict }) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!(source, error = %e, "failed to serialize verdict"),
    }

    if let Some(db) = db {
        if let Err(e) = db.insert(source, verdict) {
            warn!(source, error = %e, "failed to record verdict");
        } else {
            debug!(source, "verdict recorded");
        }
    }
}

//! Sync driver: walks every upstream listing page for one game mode,
//! decides per entry whether enrichment is needed, drives the worker pool,
//! and folds the delivered results into the board.

use crate::core::{GameMode, Result, SyncError, value};
use crate::fetch::{DetailFetch, ListingFetch};
use crate::pool::{EnrichTask, TaskOutcome, WorkerPool};
use crate::storage::{Board, RawPayload};
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Tuning knobs for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Concurrency ceiling for in-flight detail fetches.
    pub concurrency: usize,
    /// Submit-queue capacity; `submit` suspends when this many tasks wait.
    pub backlog: usize,
}

impl SyncOptions {
    pub fn new() -> Self {
        Self {
            concurrency: 50,
            backlog: 1024,
        }
    }

    /// Set the concurrency ceiling
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the submit backlog
    pub fn backlog(mut self, backlog: usize) -> Self {
        self.backlog = backlog.max(1);
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// What one category sync accomplished.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Distinct identities whose summary or detail data was folded in.
    pub identities_observed: usize,
    /// Identities whose detail payload was successfully merged.
    pub identities_enriched: usize,
    /// Task-local failures, keyed by the identity they concern.
    pub errors: Vec<(String, SyncError)>,
    /// Data-quality warnings (malformed flight times), keyed by identity.
    pub warnings: Vec<(String, SyncError)>,
}

/// Mirror one game mode's leaderboard into `board`.
///
/// Walks pages `1..=total_pages` in order; new identities are observed
/// immediately and enriched, known identities are re-enriched only when the
/// summary shows strictly more flight time than the stored record. Detail
/// results are folded in after the drain barrier. A listing-page transport
/// error is fatal to the mode; per-identity detail errors are recorded in
/// the report and never abort the run.
pub async fn sync<F>(
    board: &mut Board,
    mode: GameMode,
    fetcher: Arc<F>,
    options: &SyncOptions,
) -> Result<SyncReport>
where
    F: ListingFetch + DetailFetch + Send + Sync + 'static,
{
    let mut report = SyncReport::default();
    let mut pool = WorkerPool::spawn(Arc::clone(&fetcher), options.concurrency, options.backlog);
    let mut run = RunState::default();

    let mut page = 1u32;
    let mut total_pages = 1u32;
    loop {
        let chunk = match fetcher.fetch_page(mode, page).await {
            Ok(chunk) => chunk,
            Err(source) => {
                // Fatal to this mode, but already-submitted tasks still run
                // to completion; keep what they earned before unwinding.
                let outcomes = pool.drain().await;
                apply_outcomes(board, outcomes, &mut run, &mut report);
                return Err(SyncError::ListingPage {
                    mode: mode.to_string(),
                    page,
                    source: Box::new(source),
                });
            }
        };
        if page == 1 {
            total_pages = chunk.total_pages.max(1);
            debug!(
                "{}: {} pages, {} listed pilots",
                mode, total_pages, chunk.total_rows
            );
        }

        for entry in chunk.entries {
            process_entry(board, &mut pool, &mut run, mode, entry, &mut report).await?;
        }

        if page >= total_pages {
            break;
        }
        page += 1;
    }

    let outcomes = pool.drain().await;
    apply_outcomes(board, outcomes, &mut run, &mut report);
    report.identities_observed = run.observed.len();
    Ok(report)
}

/// Per-run bookkeeping: which identities were observed, and which already
/// have an enrichment task in flight (at most one per identity per run).
#[derive(Debug, Default)]
struct RunState {
    observed: HashSet<String>,
    submitted: HashSet<String>,
}

async fn process_entry(
    board: &mut Board,
    pool: &mut WorkerPool,
    run: &mut RunState,
    mode: GameMode,
    entry: RawPayload,
    report: &mut SyncReport,
) -> Result<()> {
    let Some(handle) = entry.get("nickname").and_then(value::as_str).map(str::to_owned) else {
        warn!("{}: listing entry without a nickname, skipped", mode);
        return Ok(());
    };

    if !board.contains(&handle) {
        debug!("new pilot     : {}", handle);
        // Observe the summary first so the identity is visible in the
        // current-state table before enrichment completes.
        let outcome = board.observe(&handle, entry);
        record_warnings(report, &handle, outcome.warnings);
        run.observed.insert(handle.clone());

        if run.submitted.insert(handle.clone()) {
            pool.submit(EnrichTask { handle, mode }).await?;
        }
        return Ok(());
    }

    // Known identity: the cheap summary tells us whether the expensive
    // detail fetch is worth repeating.
    let incoming = match value::flight_time_hours(entry.get("flight_time")) {
        Ok(hours) => hours,
        Err(warning) => {
            report.warnings.push((handle.clone(), warning));
            None
        }
    };
    let current = board
        .pilot(&handle)
        .and_then(|pilot| pilot.flight_time().ok().flatten());

    let advanced = matches!((current, incoming), (Some(old), Some(new)) if new > old);
    if !advanced {
        return Ok(());
    }

    debug!("updating pilot: {}", handle);
    if run.submitted.insert(handle.clone()) {
        pool.submit(EnrichTask {
            handle: handle.clone(),
            mode,
        })
        .await?;
    }
    let outcome = board.observe(&handle, entry);
    record_warnings(report, &handle, outcome.warnings);
    run.observed.insert(handle);
    Ok(())
}

fn apply_outcomes(
    board: &mut Board,
    outcomes: Vec<TaskOutcome>,
    run: &mut RunState,
    report: &mut SyncReport,
) {
    for TaskOutcome { task, result } in outcomes {
        match result {
            Ok(detail) => {
                let outcome = board.observe(&task.handle, detail);
                record_warnings(report, &task.handle, outcome.warnings);
                run.observed.insert(task.handle);
                report.identities_enriched += 1;
            }
            Err(err) => {
                warn!("detail fetch for '{}' failed: {}", task.handle, err);
                report.errors.push((task.handle, err));
            }
        }
    }
}

fn record_warnings(report: &mut SyncReport, handle: &str, warnings: Vec<SyncError>) {
    for warning in warnings {
        report.warnings.push((handle.to_string(), warning));
    }
}

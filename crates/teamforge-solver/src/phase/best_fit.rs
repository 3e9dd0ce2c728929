//! Best-fit placement phases run concurrently on a bounded worker pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rayon::ThreadPoolBuilder;
use teamforge_core::{Participant, Result, TeamForgeError};
use tracing::{debug, info, trace, warn};

use super::PhaseKind;
use crate::roster::{lock_roster, Roster, POISONED_REASON};
use crate::scope::RunScope;
use crate::scoring::FitScorer;
use crate::statistics::PhaseStatistics;

/// Everything the parallel phases share.
pub(crate) struct ParallelContext {
    pub roster: Arc<Mutex<Roster>>,
    pub scorer: FitScorer,
    pub scope: RunScope,
    pub worker_count: usize,
    pub shutdown_grace: Duration,
}

type PhaseResult = (PhaseKind, Result<PhaseStatistics>);

/// Work done by one parallel phase task.
type PhaseBody =
    dyn Fn(PhaseKind, &[Participant], &Mutex<Roster>, &FitScorer, &RunScope) -> Result<PhaseStatistics>
        + Send
        + Sync;

/// Runs the role-diversity, balanced-fill and remainder phases as
/// independent tasks and waits for all of them.
///
/// Candidate lists are snapshotted before any task starts. The first task
/// failure, or the run's time limit, aborts the rest: the terminate flag is
/// raised and the remaining tasks get at most `shutdown_grace` to report
/// back before the error is returned.
pub(crate) fn run_parallel_phases(
    ctx: &ParallelContext,
    ordered: &[Participant],
) -> Result<Vec<PhaseStatistics>> {
    run_phase_tasks(ctx, ordered, Arc::new(place_best_fit))
}

fn run_phase_tasks(
    ctx: &ParallelContext,
    ordered: &[Participant],
    body: Arc<PhaseBody>,
) -> Result<Vec<PhaseStatistics>> {
    let snapshots: Vec<(PhaseKind, Vec<Participant>)> = {
        let roster = lock_roster(&ctx.roster, PhaseKind::RoleDiversity.name())?;
        PhaseKind::PARALLEL
            .iter()
            .map(|kind| (*kind, kind.candidates(&roster, ordered)))
            .collect()
    };

    let pool = ThreadPoolBuilder::new()
        .num_threads(ctx.worker_count.max(1))
        .thread_name(|i| format!("teamforge-worker-{i}"))
        .build()
        .map_err(|e| TeamForgeError::Internal(format!("failed to start worker pool: {e}")))?;

    let (tx, rx) = mpsc::channel::<PhaseResult>();
    let task_count = snapshots.len();

    for (kind, candidates) in snapshots {
        let tx = tx.clone();
        let roster = Arc::clone(&ctx.roster);
        let scorer = ctx.scorer.clone();
        let scope = ctx.scope.clone();
        let body = Arc::clone(&body);
        pool.spawn_fifo(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                body(kind, &candidates[..], &*roster, &scorer, &scope)
            }))
            .unwrap_or_else(|payload| {
                Err(TeamForgeError::PhaseFailed {
                    phase: kind.name(),
                    reason: panic_message(payload.as_ref()),
                })
            });
            let _ = tx.send((kind, result));
        });
    }
    drop(tx);

    let mut completed = Vec::with_capacity(task_count);
    while completed.len() < task_count {
        match rx.recv_timeout(ctx.scope.remaining()) {
            Ok((_, Ok(stats))) => completed.push(stats),
            Ok((kind, Err(err))) => {
                let drained = abort(ctx, &rx, task_count - completed.len() - 1);
                let (kind, err) = if is_poisoned_lock(&err) {
                    origin_failure(drained).unwrap_or((kind, err))
                } else {
                    (kind, err)
                };
                let err = match err {
                    TeamForgeError::Cancelled => TeamForgeError::Timeout {
                        limit: ctx.scope.time_limit(),
                    },
                    other => other,
                };
                warn!(event = "phase_failed", phase = kind.name(), error = %err);
                return Err(err);
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    event = "timeout",
                    limit_ms = ctx.scope.time_limit().as_millis() as u64,
                    pending = task_count - completed.len(),
                );
                abort(ctx, &rx, task_count - completed.len());
                return Err(TeamForgeError::Timeout {
                    limit: ctx.scope.time_limit(),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(TeamForgeError::Internal(
                    "worker pool dropped a placement phase".to_string(),
                ));
            }
        }
    }

    completed.sort_by_key(|s| s.phase);
    Ok(completed)
}

/// Raises the terminate flag and waits a bounded time for `pending` tasks,
/// returning whatever they reported.
fn abort(ctx: &ParallelContext, rx: &Receiver<PhaseResult>, pending: usize) -> Vec<PhaseResult> {
    ctx.scope.terminate();
    let deadline = Instant::now() + ctx.shutdown_grace;
    let mut drained = Vec::with_capacity(pending);
    while drained.len() < pending {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            break;
        }
        match rx.recv_timeout(left) {
            Ok(result) => drained.push(result),
            Err(_) => break,
        }
    }
    if drained.len() < pending {
        warn!(event = "shutdown_incomplete", pending = pending - drained.len());
    }
    drained
}

fn is_poisoned_lock(err: &TeamForgeError) -> bool {
    matches!(err, TeamForgeError::PhaseFailed { reason, .. } if reason == POISONED_REASON)
}

/// The failure that poisoned the roster, if its task reported in time.
fn origin_failure(drained: Vec<PhaseResult>) -> Option<(PhaseKind, TeamForgeError)> {
    drained.into_iter().find_map(|(kind, result)| match result {
        Err(err @ TeamForgeError::PhaseFailed { .. }) if !is_poisoned_lock(&err) => {
            Some((kind, err))
        }
        _ => None,
    })
}

/// Places each candidate on its best-scoring open team.
fn place_best_fit(
    kind: PhaseKind,
    candidates: &[Participant],
    roster: &Mutex<Roster>,
    scorer: &FitScorer,
    scope: &RunScope,
) -> Result<PhaseStatistics> {
    let start = Instant::now();
    let mut rng = scope.phase_rng(kind.index());
    let mut placed = 0;

    info!(
        event = "phase_start",
        phase = kind.name(),
        candidates = candidates.len(),
    );

    for participant in candidates {
        if scope.should_terminate() {
            return Err(TeamForgeError::Cancelled);
        }
        let mut guard = lock_roster(roster, kind.name())?;
        if guard.is_assigned(participant.id()) {
            continue;
        }
        let Some(selection) = scorer.select(guard.teams(), participant, &mut rng) else {
            break;
        };
        if guard.assign(selection.team_idx, participant.clone()) {
            trace!(
                event = "placed",
                phase = kind.name(),
                participant = participant.id(),
                team = guard.teams()[selection.team_idx].id(),
                score = selection.score,
            );
            placed += 1;
        }
    }

    let stats = PhaseStatistics::new(kind, placed, start.elapsed());
    debug!(
        event = "phase_end",
        phase = kind.name(),
        placed,
        duration_ms = stats.duration.as_millis() as u64,
    );
    Ok(stats)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use teamforge_config::ScoringConfig;
    use teamforge_test::pool::seeded_pool;

    fn context(roster: Roster, pool: &[Participant], limit: Duration) -> ParallelContext {
        ParallelContext {
            roster: Arc::new(Mutex::new(roster)),
            scorer: FitScorer::for_pool(ScoringConfig::default(), pool),
            scope: RunScope::new(limit, 7),
            worker_count: 3,
            shutdown_grace: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_fills_every_seat() {
        for seed in 0..20 {
            let pool = seeded_pool(23, seed);
            let ctx = context(Roster::new(5, 4), &pool, Duration::from_secs(30));

            let stats = run_parallel_phases(&ctx, &pool).unwrap();
            let roster = ctx.roster.lock().unwrap();

            assert_eq!(roster.open_seats(), 0, "seed {seed}");
            assert_eq!(roster.assigned_count(), 20);
            assert_eq!(stats.iter().map(|s| s.placed).sum::<usize>(), 20);
            let phases: Vec<PhaseKind> = stats.iter().map(|s| s.phase).collect();
            assert_eq!(phases, PhaseKind::PARALLEL.to_vec());

            let mut seen = HashSet::new();
            for team in roster.teams() {
                for m in team.members() {
                    assert!(seen.insert(m.id().to_string()));
                }
            }
        }
    }

    #[test]
    fn test_single_worker_is_deterministic() {
        let pool = seeded_pool(30, 4);
        let run = || {
            let mut ctx = context(Roster::new(6, 5), &pool, Duration::from_secs(30));
            ctx.worker_count = 1;
            run_parallel_phases(&ctx, &pool).unwrap();
            let roster = ctx.roster.lock().unwrap();
            roster
                .teams()
                .iter()
                .map(|t| t.members().iter().map(|m| m.id().to_string()).collect())
                .collect::<Vec<Vec<String>>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_expired_scope_times_out() {
        let pool = seeded_pool(20, 1);
        let ctx = context(Roster::new(5, 4), &pool, Duration::ZERO);
        let err = run_parallel_phases(&ctx, &pool).unwrap_err();
        assert!(matches!(err, TeamForgeError::Timeout { .. }));
        assert!(ctx.scope.is_terminated());
    }

    #[test]
    fn test_poisoned_roster_fails() {
        let pool = seeded_pool(20, 1);
        let ctx = context(Roster::new(5, 4), &pool, Duration::from_secs(30));
        let shared = Arc::clone(&ctx.roster);
        let _ = std::thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("poison");
        })
        .join();

        let err = run_parallel_phases(&ctx, &pool).unwrap_err();
        assert!(matches!(err, TeamForgeError::PhaseFailed { .. }));
    }

    fn panic_in_balanced_fill(
        kind: PhaseKind,
        candidates: &[Participant],
        roster: &Mutex<Roster>,
        scorer: &FitScorer,
        scope: &RunScope,
    ) -> Result<PhaseStatistics> {
        if kind != PhaseKind::BalancedFill {
            return place_best_fit(kind, candidates, roster, scorer, scope);
        }
        let _guard = lock_roster(roster, kind.name())?;
        panic!("balanced fill exploded");
    }

    fn stall_remainder(
        kind: PhaseKind,
        candidates: &[Participant],
        roster: &Mutex<Roster>,
        scorer: &FitScorer,
        scope: &RunScope,
    ) -> Result<PhaseStatistics> {
        if kind != PhaseKind::Remainder {
            return place_best_fit(kind, candidates, roster, scorer, scope);
        }
        std::thread::sleep(Duration::from_secs(5));
        Ok(PhaseStatistics::new(kind, 0, Duration::from_secs(5)))
    }

    #[test]
    fn test_panicking_phase_fails_whole_run() {
        for seed in 0..5 {
            let pool = seeded_pool(24, seed);
            let ctx = context(Roster::new(6, 4), &pool, Duration::from_secs(30));

            let err = run_phase_tasks(&ctx, &pool, Arc::new(panic_in_balanced_fill)).unwrap_err();
            match err {
                TeamForgeError::PhaseFailed { phase, reason } => {
                    assert_eq!(phase, PhaseKind::BalancedFill.name(), "seed {seed}");
                    assert_eq!(reason, "balanced fill exploded");
                }
                other => panic!("seed {seed}: unexpected error {other:?}"),
            }
            assert!(ctx.scope.is_terminated());
        }
    }

    #[test]
    fn test_stuck_phase_is_abandoned_after_grace() {
        let pool = seeded_pool(20, 2);
        let limit = Duration::from_millis(300);
        let mut ctx = context(Roster::new(5, 4), &pool, limit);
        ctx.shutdown_grace = Duration::from_millis(200);

        let start = Instant::now();
        let err = run_phase_tasks(&ctx, &pool, Arc::new(stall_remainder)).unwrap_err();
        let waited = start.elapsed();

        assert!(matches!(err, TeamForgeError::Timeout { limit: l } if l == limit));
        assert!(ctx.scope.is_terminated());
        assert!(
            waited < limit + ctx.shutdown_grace + Duration::from_secs(1),
            "waited {waited:?}"
        );
    }

    fn poisoned(kind: PhaseKind) -> PhaseResult {
        (
            kind,
            Err(TeamForgeError::PhaseFailed {
                phase: kind.name(),
                reason: POISONED_REASON.to_string(),
            }),
        )
    }

    #[test]
    fn test_origin_failure_prefers_panic() {
        let cancelled = (PhaseKind::RoleDiversity, Err(TeamForgeError::Cancelled));
        assert!(origin_failure(vec![poisoned(PhaseKind::Remainder), cancelled]).is_none());

        let panicked = (
            PhaseKind::BalancedFill,
            Err(TeamForgeError::PhaseFailed {
                phase: PhaseKind::BalancedFill.name(),
                reason: "boom".to_string(),
            }),
        );
        let (kind, err) =
            origin_failure(vec![poisoned(PhaseKind::Remainder), panicked]).unwrap();
        assert_eq!(kind, PhaseKind::BalancedFill);
        assert!(!is_poisoned_lock(&err));
        assert!(is_poisoned_lock(&poisoned(PhaseKind::Remainder).1.unwrap_err()));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(3_u8);
        assert_eq!(panic_message(payload.as_ref()), "worker panicked");
    }
}

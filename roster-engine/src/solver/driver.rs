use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use shared::{EngineError, EngineResult, SolveStatus};
use tracing::{debug, info, warn};

use crate::domain::entities::Assignment;
use crate::domain::problem::Problem;
use crate::options::SolveOptions;
use crate::solver::builder::{build_model, BuildConfig, BuiltModel};
use crate::solver::cp::{self, CpOutcome, CpSolution};
use crate::solver::extractor;
use crate::solver::index::ProblemIndex;
use crate::solver::penalties;
use crate::solver::report::{RelaxationStep, SoftRule, SolveReport, SolveStats};
use crate::solver::variables::VariableTable;

/// Cooperative cancellation handle. The driver checks it between probes
/// and between incumbent improvements; on cancel the best solution found
/// so far is returned.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Best solution so far, together with the tables needed to read it back.
struct Incumbent {
    solution: CpSolution,
    vars: VariableTable,
}

enum ProbeResult {
    Feasible(usize, Incumbent),
    Infeasible,
    Inconclusive,
}

/// Produce a roster for the problem within the given budget.
pub fn solve(problem: &Problem, options: &SolveOptions) -> EngineResult<SolveReport> {
    solve_with_cancel(problem, options, &CancellationToken::new())
}

/// [`solve`] with an external cancellation token.
pub fn solve_with_cancel(
    problem: &Problem,
    options: &SolveOptions,
    cancel: &CancellationToken,
) -> EngineResult<SolveReport> {
    let started = Instant::now();
    problem.validate()?;
    let index = ProblemIndex::new(problem)?;
    let deadline = started + options.budget;

    let mut stats = SolveStats {
        workers: options.workers.max(1),
        seed: options.seed,
        ..Default::default()
    };

    if cancel.is_cancelled() {
        stats.warnings.push("Cancelled before the first solve attempt".into());
        return Ok(finish(SolveStatus::Cancelled, Vec::new(), stats, started));
    }

    // A rotating team below three available members cannot hold its line of
    // the rotation; report it and start from a softened baseline.
    let base_level = if index.understaffed.is_empty() {
        0
    } else {
        for &(t, w) in &index.understaffed {
            push_warning(
                &mut stats,
                format!(
                    "Rotating team {} has fewer than 3 available members in the week of {}; rotation baseline softened",
                    index.rotating_teams[t].name,
                    index.calendar.weeks()[w].monday()
                ),
            );
        }
        1
    };

    // Stage 1: feasibility, relaxing on proven infeasibility only.
    let mut accepted_level = base_level;
    let mut incumbent: Option<Incumbent> = None;

    stats.attempts += 1;
    info!(level = base_level, "feasibility attempt");
    let built = build_model(
        &index,
        &BuildConfig::for_level(base_level, false),
        feasibility_slice(options, deadline),
        options.memory_mb,
    );
    for warning in &built.warnings {
        push_warning(&mut stats, warning.clone());
    }
    stats.variables = built.cp.variable_count();
    stats.constraints = built.cp.constraint_count();
    let BuiltModel { cp, vars, .. } = built;
    match cp.solve() {
        CpOutcome::Solution(solution) => {
            incumbent = Some(Incumbent { solution, vars });
        }
        CpOutcome::Infeasible => {
            info!("model infeasible, entering the relaxation ladder");
            match probe_relaxations(&index, options, deadline, base_level, cancel, &mut stats)? {
                ProbeResult::Feasible(level, found) => {
                    accepted_level = level;
                    incumbent = Some(found);
                }
                ProbeResult::Infeasible => {
                    stats.relaxations = BuildConfig::relaxations(RelaxationStep::LADDER.len());
                    push_warning(&mut stats, "Infeasible after every relaxation step".into());
                    return Ok(finish(SolveStatus::Infeasible, Vec::new(), stats, started));
                }
                ProbeResult::Inconclusive => {
                    push_warning(
                        &mut stats,
                        "Budget exhausted before any relaxation probe finished".into(),
                    );
                    return Ok(finish(SolveStatus::Unknown, Vec::new(), stats, started));
                }
            }
        }
        CpOutcome::Timeout => {
            push_warning(
                &mut stats,
                "Feasibility budget exhausted with no incumbent".into(),
            );
            return Ok(finish(SolveStatus::Unknown, Vec::new(), stats, started));
        }
        CpOutcome::Error(message) => return Err(EngineError::Internal(message)),
    }

    stats.relaxations = BuildConfig::relaxations(accepted_level);
    let Some(stage_a) = incumbent else {
        return Err(EngineError::Internal(
            "feasibility stage ended without an incumbent".into(),
        ));
    };

    // Stage 2: optimisation over the accepted relaxation level.
    if cancel.is_cancelled() {
        push_warning(&mut stats, "Cancelled before optimisation; feasibility solution returned".into());
        let assignments = extractor::extract(&index, &stage_a.vars, &stage_a.solution);
        return Ok(finish(SolveStatus::Feasible, assignments, stats, started));
    }
    let remaining = time_left(deadline);
    if remaining < Duration::from_millis(500) {
        push_warning(&mut stats, "Budget exhausted before optimisation; feasibility solution returned".into());
        let assignments = extractor::extract(&index, &stage_a.vars, &stage_a.solution);
        return Ok(finish(SolveStatus::Feasible, assignments, stats, started));
    }

    stats.attempts += 1;
    info!(level = accepted_level, budget_ms = remaining.as_millis() as u64, "optimisation pass");
    let built = build_model(
        &index,
        &BuildConfig::for_level(accepted_level, true),
        remaining,
        options.memory_mb,
    );
    for warning in &built.warnings {
        push_warning(&mut stats, warning.clone());
    }
    stats.variables = built.cp.variable_count();
    stats.constraints = built.cp.constraint_count();
    let BuiltModel {
        cp,
        vars,
        penalties: groups,
        objective,
        ..
    } = built;

    let Some(objective) = objective else {
        // Nothing to optimise; the feasibility solution is optimal.
        let assignments = extractor::extract(&index, &stage_a.vars, &stage_a.solution);
        stats.objective = Some(0);
        return Ok(finish(SolveStatus::Optimal, assignments, stats, started));
    };

    let mut iterator = cp.minimize_iter(objective);
    let mut best: Option<CpSolution> = None;
    let mut best_value: Option<i64> = None;
    let mut proven = false;
    loop {
        if cancel.is_cancelled() {
            push_warning(&mut stats, "Cancelled during optimisation; best incumbent returned".into());
            break;
        }
        if time_left(deadline).is_zero() {
            break;
        }
        let Some(solution) = iterator.next() else {
            // The iterator also ends on the backend timeout; only claim a
            // proof when it stopped well inside the budget.
            proven = best.is_some() && time_left(deadline) > Duration::from_millis(500);
            break;
        };
        let value = cp::int_value(&solution, objective);
        debug!(objective = value, "incumbent improved");
        best = Some(solution);
        best_value = Some(value);

        // Penalties are non-negative, so the best bound is zero and the
        // relative gap closes exactly when the incumbent reaches it.
        let gap = if value > 0 { 1.0 } else { 0.0 };
        if gap <= options.relative_gap {
            proven = true;
            break;
        }
    }

    match best {
        Some(solution) => {
            stats.objective = best_value;
            stats.penalties = penalties::evaluate(&solution, &groups);
            collect_penalty_warnings(&mut stats);
            let assignments = extractor::extract(&index, &vars, &solution);
            let status = if proven {
                SolveStatus::Optimal
            } else {
                SolveStatus::Feasible
            };
            Ok(finish(status, assignments, stats, started))
        }
        None => {
            push_warning(
                &mut stats,
                "Optimisation produced no incumbent within the budget; feasibility solution returned".into(),
            );
            let assignments = extractor::extract(&index, &stage_a.vars, &stage_a.solution);
            Ok(finish(SolveStatus::Feasible, assignments, stats, started))
        }
    }
}

/// Probe the remaining ladder levels on the worker pool, lowest level
/// first, and accept the lowest feasible one.
fn probe_relaxations(
    index: &ProblemIndex<'_>,
    options: &SolveOptions,
    deadline: Instant,
    base_level: usize,
    cancel: &CancellationToken,
    stats: &mut SolveStats,
) -> EngineResult<ProbeResult> {
    enum ProbeOutcome {
        Solved(Incumbent),
        Infeasible,
        Timeout,
        Error(String),
    }

    let levels: Vec<usize> = (base_level + 1..=RelaxationStep::LADDER.len()).collect();
    let mut inconclusive = false;

    for wave in levels.chunks(options.workers.max(1)) {
        if cancel.is_cancelled() || time_left(deadline).is_zero() {
            inconclusive = true;
            break;
        }
        let slice = feasibility_slice(options, deadline);
        stats.attempts += wave.len() as u32;

        let outcomes: Vec<(usize, thread::Result<ProbeOutcome>)> = thread::scope(|scope| {
            let handles: Vec<_> = wave
                .iter()
                .map(|&level| {
                    (
                        level,
                        scope.spawn(move || {
                            let cfg = BuildConfig::for_level(level, false);
                            let built = build_model(index, &cfg, slice, options.memory_mb);
                            let BuiltModel { cp, vars, .. } = built;
                            match cp.solve() {
                                CpOutcome::Solution(solution) => {
                                    ProbeOutcome::Solved(Incumbent { solution, vars })
                                }
                                CpOutcome::Infeasible => ProbeOutcome::Infeasible,
                                CpOutcome::Timeout => ProbeOutcome::Timeout,
                                CpOutcome::Error(message) => ProbeOutcome::Error(message),
                            }
                        }),
                    )
                })
                .collect();
            handles
                .into_iter()
                .map(|(level, handle)| (level, handle.join()))
                .collect()
        });

        let mut timed_out_below: Option<usize> = None;
        for (level, joined) in outcomes {
            let outcome = joined
                .map_err(|_| EngineError::Internal("relaxation worker panicked".into()))?;
            match outcome {
                ProbeOutcome::Solved(found) => {
                    if let Some(lower) = timed_out_below {
                        push_warning(
                            stats,
                            format!(
                                "Relaxation level {} accepted while level {} was inconclusive",
                                level, lower
                            ),
                        );
                    }
                    info!(level, "relaxation level feasible");
                    return Ok(ProbeResult::Feasible(level, found));
                }
                ProbeOutcome::Infeasible => {
                    debug!(level, "relaxation level infeasible");
                }
                ProbeOutcome::Timeout => {
                    warn!(level, "relaxation probe timed out");
                    inconclusive = true;
                    timed_out_below.get_or_insert(level);
                }
                ProbeOutcome::Error(message) => return Err(EngineError::Internal(message)),
            }
        }
    }

    if inconclusive {
        Ok(ProbeResult::Inconclusive)
    } else {
        Ok(ProbeResult::Infeasible)
    }
}

/// Soft-rule findings that must never stay silent.
fn collect_penalty_warnings(stats: &mut SolveStats) {
    let mut notes = Vec::new();
    for summary in &stats.penalties {
        if summary.violations == 0 {
            continue;
        }
        match summary.rule {
            SoftRule::ShiftGrouping => notes.push(format!(
                "Shift grouping violated on {} occasion(s)",
                summary.violations
            )),
            SoftRule::RotationBaseline => notes.push(format!(
                "Rotation baseline missed in {} team-week(s)",
                summary.violations
            )),
            _ => {}
        }
    }
    for note in notes {
        push_warning(stats, note);
    }
}

fn finish(
    status: SolveStatus,
    assignments: Vec<Assignment>,
    mut stats: SolveStats,
    started: Instant,
) -> SolveReport {
    stats.wall_time = started.elapsed();
    info!(
        ?status,
        assignments = assignments.len(),
        attempts = stats.attempts,
        wall_ms = stats.wall_time.as_millis() as u64,
        "solve finished"
    );
    SolveReport {
        status,
        assignments,
        stats,
    }
}

fn push_warning(stats: &mut SolveStats, warning: String) {
    if !stats.warnings.contains(&warning) {
        warn!("{}", warning);
        stats.warnings.push(warning);
    }
}

fn time_left(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

/// Per-attempt budget for feasibility runs: a quarter of the overall
/// budget, bounded by what is actually left.
fn feasibility_slice(options: &SolveOptions, deadline: Instant) -> Duration {
    (options.budget / 4)
        .max(Duration::from_secs(1))
        .min(time_left(deadline).max(Duration::from_millis(100)))
}

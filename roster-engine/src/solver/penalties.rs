use selen::prelude::VarId;
use shared::ShiftCode;

use crate::domain::WeeklyRole;
use crate::solver::cp::{self, CpModel, CpSolution};
use crate::solver::index::ProblemIndex;
use crate::solver::report::{PenaltySummary, SoftRule};
use crate::solver::variables::VariableTable;

/// Penalty variables of one soft rule, each with its maximum value. The
/// objective is the weighted sum over every group.
pub(crate) struct PenaltyGroup {
    pub rule: SoftRule,
    pub terms: Vec<(VarId, i32)>,
}

/// Emit every soft rule as penalty variables. Order is fixed; each emitter
/// walks employees by index, dates chronologically and shifts in F, S, N.
pub(crate) fn emit(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    emit_weekend_fairness(cp, vars, index, penalties);
    emit_night_fairness(cp, vars, index, penalties);
    emit_return_to_shift(cp, vars, index, penalties, SoftRule::ShiftGrouping, None);
    emit_weekly_diversity(cp, vars, index, penalties);
    emit_return_to_shift(
        cp,
        vars,
        index,
        penalties,
        SoftRule::NightConsistency,
        Some(ShiftCode::N),
    );
    emit_weekend_consistency(cp, vars, index, penalties);
    emit_shift_hopping(cp, vars, index, penalties);
    emit_td_fairness(cp, vars, index, penalties);
    emit_gap_minimisation(cp, vars, index, penalties);
    emit_weekend_continuity(cp, vars, index, penalties);
    emit_own_team_preference(vars, index, penalties);
}

/// Pairwise |count_i - count_j| deviation variables over the given
/// per-employee count variables.
fn emit_pairwise_deviation(
    cp: &mut CpModel,
    counts: &[(usize, VarId, i32)],
    index: &ProblemIndex<'_>,
    rule: SoftRule,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut terms = Vec::new();
    for i in 0..counts.len() {
        for j in (i + 1)..counts.len() {
            let (e_i, count_i, hi_i) = counts[i];
            let (e_j, count_j, hi_j) = counts[j];
            if !index.employees[e_i].is_comparable_to(index.employees[e_j]) {
                continue;
            }
            let bound = hi_i.max(hi_j);
            let deviation = cp.new_int(0, bound);
            cp.lin_le(&[(1, count_i), (-1, count_j), (-1, deviation)], 0);
            cp.lin_le(&[(1, count_j), (-1, count_i), (-1, deviation)], 0);
            terms.push((deviation, bound));
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup { rule, terms });
    }
}

/// Year-to-date balanced weekend fairness: worked in-window weekend days
/// plus the carried baseline, compared pairwise.
fn emit_weekend_fairness(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let weekend_days: Vec<usize> = (0..index.n_days())
        .filter(|&d| index.in_window_day(d) && index.is_weekend_day(d))
        .collect();
    if weekend_days.is_empty() {
        return;
    }

    let mut counts = Vec::new();
    for e in 0..index.n_employees() {
        let baseline = index.employees[e].prior_weekend_days as i32;
        let hi = baseline + weekend_days.len() as i32;
        let count = cp.new_int(baseline, hi);
        let mut terms: Vec<_> = weekend_days.iter().map(|&d| (1, vars.active(e, d))).collect();
        terms.push((-1, count));
        cp.lin_eq(&terms, -baseline);
        counts.push((e, count, hi));
    }
    emit_pairwise_deviation(cp, &counts, index, SoftRule::WeekendFairness, penalties);
}

/// Year-to-date balanced night fairness over in-window night shifts.
fn emit_night_fairness(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let days: Vec<usize> = (0..index.n_days())
        .filter(|&d| index.in_window_day(d))
        .collect();
    if days.is_empty() {
        return;
    }

    let mut counts = Vec::new();
    for e in 0..index.n_employees() {
        let baseline = index.employees[e].prior_night_shifts as i32;
        let hi = baseline + days.len() as i32;
        let count = cp.new_int(baseline, hi);
        let mut terms: Vec<_> = days
            .iter()
            .map(|&d| (1, vars.any(e, d, ShiftCode::N)))
            .collect();
        terms.push((-1, count));
        cp.lin_eq(&terms, -baseline);
        counts.push((e, count, hi));
    }
    emit_pairwise_deviation(cp, &counts, index, SoftRule::NightFairness, penalties);
}

/// Penalise leaving a shift and returning to it within the same week with
/// a different worked shift in between. With `only = Some(N)` this is the
/// night-consistency rule, otherwise the grouping rule.
fn emit_return_to_shift(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
    rule: SoftRule,
    only: Option<ShiftCode>,
) {
    let mut terms = Vec::new();
    for e in 0..index.n_employees() {
        for w in 0..index.n_weeks() {
            let days: Vec<usize> = index.days_of_week(w).collect();
            for s in ShiftCode::ALL {
                if only.is_some() && only != Some(s) {
                    continue;
                }
                for middle in 1..days.len() - 1 {
                    let d = days[middle];
                    let before: Vec<_> = days[..middle]
                        .iter()
                        .map(|&p| vars.any(e, p, s))
                        .collect();
                    let after: Vec<_> = days[middle + 1..]
                        .iter()
                        .map(|&n| vars.any(e, n, s))
                        .collect();
                    let seen_before = cp.or(&before);
                    let seen_after = cp.or(&after);
                    let penalty = cp.new_bool();
                    cp.lin_le(
                        &[
                            (1, seen_before),
                            (1, seen_after),
                            (1, vars.active(e, d)),
                            (-1, vars.any(e, d, s)),
                            (-1, penalty),
                        ],
                        2,
                    );
                    terms.push((penalty, 1));
                }
            }
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup { rule, terms });
    }
}

/// More than two distinct shift codes within one employee-week.
fn emit_weekly_diversity(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut terms = Vec::new();
    for e in 0..index.n_employees() {
        for w in 0..index.n_weeks() {
            let used: Vec<_> = ShiftCode::ALL
                .iter()
                .map(|&s| {
                    let week: Vec<_> = index.days_of_week(w).map(|d| vars.any(e, d, s)).collect();
                    cp.or(&week)
                })
                .collect();
            let penalty = cp.new_bool();
            cp.lin_le(
                &[(1, used[0]), (1, used[1]), (1, used[2]), (-1, penalty)],
                2,
            );
            terms.push((penalty, 1));
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::WeeklyDiversity,
            terms,
        });
    }
}

/// Friday's shift should match whatever is worked on Saturday and Sunday.
fn emit_weekend_consistency(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut terms = Vec::new();
    for e in 0..index.n_employees() {
        for w in 0..index.n_weeks() {
            let days: Vec<usize> = index.days_of_week(w).collect();
            let friday = days[4];
            for &weekend_day in &days[5..] {
                for s in ShiftCode::ALL {
                    let penalty = cp.new_bool();
                    cp.lin_le(
                        &[
                            (1, vars.any(e, friday, s)),
                            (1, vars.active(e, weekend_day)),
                            (-1, vars.any(e, weekend_day, s)),
                            (-1, penalty),
                        ],
                        1,
                    );
                    terms.push((penalty, 1));
                }
            }
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::WeekendConsistency,
            terms,
        });
    }
}

/// A-B-A over three consecutive days.
fn emit_shift_hopping(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut terms = Vec::new();
    for e in 0..index.n_employees() {
        for d in 0..index.n_days().saturating_sub(2) {
            for s in ShiftCode::ALL {
                let penalty = cp.new_bool();
                cp.lin_le(
                    &[
                        (1, vars.any(e, d, s)),
                        (1, vars.active(e, d + 1)),
                        (-1, vars.any(e, d + 1, s)),
                        (1, vars.any(e, d + 2, s)),
                        (-1, penalty),
                    ],
                    2,
                );
                terms.push((penalty, 1));
            }
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::ShiftHopping,
            terms,
        });
    }
}

/// Pairwise TD-count differences over the qualified staff, including the
/// carried year-to-date baseline.
fn emit_td_fairness(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut counts = Vec::new();
    for e in 0..index.n_employees() {
        let employee = index.employees[e];
        if !employee.td_qualified || employee.ferienjobber {
            continue;
        }
        let weeks: Vec<VarId> = (0..index.n_weeks())
            .filter_map(|w| vars.role(WeeklyRole::Td, e, w))
            .collect();
        let baseline = employee.prior_td_weeks as i32;
        let hi = baseline + index.n_weeks() as i32;
        let count = cp.new_int(baseline, hi);
        let mut terms: Vec<_> = weeks.iter().map(|&v| (1, v)).collect();
        terms.push((-1, count));
        cp.lin_eq(&terms, -baseline);
        counts.push((e, count, hi));
    }

    let mut terms = Vec::new();
    for i in 0..counts.len() {
        for j in (i + 1)..counts.len() {
            let (_, count_i, hi_i) = counts[i];
            let (_, count_j, hi_j) = counts[j];
            let bound = hi_i.max(hi_j);
            let deviation = cp.new_int(0, bound);
            cp.lin_le(&[(1, count_i), (-1, count_j), (-1, deviation)], 0);
            cp.lin_le(&[(1, count_j), (-1, count_i), (-1, deviation)], 0);
            terms.push((deviation, bound));
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::TdFairness,
            terms,
        });
    }
}

/// Lone rest day between two worked days.
fn emit_gap_minimisation(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut terms = Vec::new();
    for e in 0..index.n_employees() {
        for d in 0..index.n_days().saturating_sub(2) {
            let penalty = cp.new_bool();
            cp.lin_le(
                &[
                    (1, vars.active(e, d)),
                    (-1, vars.active(e, d + 1)),
                    (1, vars.active(e, d + 2)),
                    (-1, penalty),
                ],
                1,
            );
            terms.push((penalty, 1));
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::GapMinimisation,
            terms,
        });
    }
}

/// Three or more weekdays worked but the whole weekend off.
fn emit_weekend_continuity(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut terms = Vec::new();
    for e in 0..index.n_employees() {
        for w in 0..index.n_weeks() {
            let days: Vec<usize> = index.days_of_week(w).collect();

            let weekday_total = cp.new_int(0, 5);
            let mut weekday_terms: Vec<_> =
                days[..5].iter().map(|&d| (1, vars.active(e, d))).collect();
            weekday_terms.push((-1, weekday_total));
            cp.lin_eq(&weekday_terms, 0);

            let weekend_total = cp.new_int(0, 2);
            let mut weekend_terms: Vec<_> =
                days[5..].iter().map(|&d| (1, vars.active(e, d))).collect();
            weekend_terms.push((-1, weekend_total));
            cp.lin_eq(&weekend_terms, 0);

            // busy <- at least three weekdays worked
            let busy = cp.new_bool();
            cp.lin_le(&[(1, weekday_total), (-5, busy)], 2);
            // idle <- weekend completely off
            let idle = cp.new_bool();
            cp.lin_ge(&[(1, idle), (1, weekend_total)], 1);

            let penalty = cp.new_bool();
            cp.lin_le(&[(1, busy), (1, idle), (-1, penalty)], 1);
            terms.push((penalty, 1));
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::WeekendContinuity,
            terms,
        });
    }
}

/// Every in-window cross-team day costs one.
fn emit_own_team_preference(
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let mut terms = Vec::new();
    for e in 0..index.n_employees() {
        if index.rotation_index_of(e).is_none() {
            continue;
        }
        for d in 0..index.n_days() {
            if !index.in_window_day(d) {
                continue;
            }
            for s in ShiftCode::ALL {
                terms.push((vars.xc(e, d, s), 1));
            }
        }
    }
    if !terms.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::OwnTeamPreference,
            terms,
        });
    }
}

/// Evaluate every penalty group against a solution.
pub(crate) fn evaluate(solution: &CpSolution, groups: &[PenaltyGroup]) -> Vec<PenaltySummary> {
    groups
        .iter()
        .map(|group| {
            let weight = group.rule.weight();
            let mut violations = 0u64;
            let mut cost = 0i64;
            for &(var, _) in &group.terms {
                let value = cp::int_value(solution, var);
                if value > 0 {
                    violations += 1;
                    cost += weight as i64 * value;
                }
            }
            PenaltySummary {
                rule: group.rule,
                weight,
                violations,
                cost,
            }
        })
        .collect()
}

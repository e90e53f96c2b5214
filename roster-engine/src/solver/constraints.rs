use shared::ShiftCode;

use crate::domain::{FORBIDDEN_TRANSITIONS, MAX_ACTIVE_PER_7, MAX_NIGHTS_PER_6, SHIFT_HALF_HOURS};
use crate::domain::WeeklyRole;
use crate::solver::builder::BuildConfig;
use crate::solver::cp::CpModel;
use crate::solver::index::ProblemIndex;
use crate::solver::penalties::PenaltyGroup;
use crate::solver::report::SoftRule;
use crate::solver::variables::VariableTable;

/// Emit every hard constraint. The relaxation flags in `cfg` weaken or
/// drop individual families; everything else is always enforced.
pub(crate) fn emit(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    cfg: &BuildConfig,
    penalties: &mut Vec<PenaltyGroup>,
    warnings: &mut Vec<String>,
) {
    link_channels(cp, vars, index);
    freeze_context_and_absences(cp, vars, index);
    emit_locks(cp, vars, index);
    emit_team_weeks(cp, vars, index, cfg, penalties);
    emit_team_coupling(cp, vars, index);
    emit_staffing_bands(cp, vars, index);
    emit_rest_transitions(cp, vars, index);
    emit_weekly_hours(cp, vars, index);
    emit_consecutive_caps(cp, vars, index);
    emit_weekly_roles(cp, vars, index, cfg);
    if !cfg.drop_weekly_reserve {
        emit_weekly_reserve(cp, vars, index, warnings);
    }
    if !cfg.drop_cross_team_block {
        emit_cross_team_block(cp, vars, index);
    }
}

/// `any = x + xc` per cell and `active = sum_s any`; `active` being a
/// boolean also enforces the one-shift-per-day rule.
fn link_channels(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for e in 0..index.n_employees() {
        for d in 0..index.n_days() {
            for s in ShiftCode::ALL {
                cp.lin_eq(
                    &[(1, vars.x(e, d, s)), (1, vars.xc(e, d, s)), (-1, vars.any(e, d, s))],
                    0,
                );
            }
            cp.lin_eq(
                &[
                    (1, vars.any(e, d, ShiftCode::F)),
                    (1, vars.any(e, d, ShiftCode::S)),
                    (1, vars.any(e, d, ShiftCode::N)),
                    (-1, vars.active(e, d)),
                ],
                0,
            );
        }
    }
}

/// Absent cells are empty, and cells outside the requested window are
/// read-only context: exactly their locks, nothing else.
fn freeze_context_and_absences(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for e in 0..index.n_employees() {
        for d in 0..index.n_days() {
            if index.is_absent(e, d) {
                cp.fix(vars.active(e, d), 0);
            } else if !index.in_window_day(d) && !index.locks.contains_key(&(e, d)) {
                cp.fix(vars.active(e, d), 0);
            }
        }
    }
}

fn emit_locks(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for (&(e, d), &(shift, _cross_team)) in &index.locks {
        cp.fix(vars.any(e, d, shift), 1);
    }
    for (&(t, w), &shift) in &index.team_locks {
        cp.fix(vars.team_shift(t, w, shift), 1);
    }
}

/// Team exclusivity, the weekly shift partition and the rotation baseline.
fn emit_team_weeks(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    cfg: &BuildConfig,
    penalties: &mut Vec<PenaltyGroup>,
) {
    let teams = index.rotating_teams.len();
    if teams == 0 {
        return;
    }

    for t in 0..teams {
        for w in 0..index.n_weeks() {
            let slots: Vec<_> = ShiftCode::ALL
                .iter()
                .map(|&s| vars.team_shift(t, w, s))
                .collect();
            cp.exactly_one(&slots);
        }
    }
    for w in 0..index.n_weeks() {
        for s in ShiftCode::ALL {
            let holders: Vec<_> = (0..teams).map(|t| vars.team_shift(t, w, s)).collect();
            cp.at_most_one(&holders);
        }
    }

    let mut misses = Vec::new();
    for t in 0..teams {
        for w in 0..index.n_weeks() {
            if index.team_locks.contains_key(&(t, w)) {
                continue;
            }
            if index.calendar.is_pre_window_week(&index.calendar.weeks()[w]) {
                continue;
            }
            let target = vars.team_shift(t, w, index.rotation_baseline(t, w));
            if cfg.soften_rotation {
                if cfg.with_objective {
                    let miss = cp.new_bool();
                    cp.lin_eq(&[(1, target), (1, miss)], 1);
                    misses.push((miss, 1));
                }
                // Without an objective the softened baseline imposes nothing.
            } else {
                cp.fix(target, 1);
            }
        }
    }
    if !misses.is_empty() {
        penalties.push(PenaltyGroup {
            rule: SoftRule::RotationBaseline,
            terms: misses,
        });
    }
}

/// Couple employee cells to their team's week shift. Employees without a
/// rotation slot have no cross-team channel at all.
fn emit_team_coupling(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for e in 0..index.n_employees() {
        match index.rotation_index_of(e) {
            Some(own) => {
                for d in 0..index.n_days() {
                    let w = index.week_of_day(d);
                    for s in ShiftCode::ALL {
                        let team = vars.team_shift(own, w, s);
                        cp.lin_le(&[(1, vars.x(e, d, s)), (-1, team)], 0);

                        let mut escape = vec![(1, vars.xc(e, d, s))];
                        for t in 0..index.rotating_teams.len() {
                            if t != own {
                                escape.push((-1, vars.team_shift(t, w, s)));
                            }
                        }
                        cp.lin_le(&escape, 0);
                        cp.lin_le(&[(1, vars.xc(e, d, s)), (1, team)], 1);
                    }
                }
            }
            None => {
                for d in 0..index.n_days() {
                    for s in ShiftCode::ALL {
                        cp.fix(vars.xc(e, d, s), 0);
                    }
                }
            }
        }
    }
}

/// Headcount bands per (in-window date, shift).
fn emit_staffing_bands(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for d in 0..index.n_days() {
        if !index.in_window_day(d) {
            continue;
        }
        let date = index.dates[d];
        for s in ShiftCode::ALL {
            let band = index.problem.staffing.band_for(s, date);
            let crew: Vec<_> = (0..index.n_employees())
                .map(|e| vars.any(e, d, s))
                .collect();
            cp.sum_le(&crew, band.max as i32);
            if band.min > 0 {
                cp.sum_ge(&crew, band.min as i32);
            }
        }
    }
}

/// Rest period: no S->F, N->F or N->S on consecutive days.
fn emit_rest_transitions(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for e in 0..index.n_employees() {
        for d in 0..index.n_days().saturating_sub(1) {
            for (a, b) in FORBIDDEN_TRANSITIONS {
                cp.lin_le(&[(1, vars.any(e, d, a)), (1, vars.any(e, d + 1, b))], 1);
            }
        }
    }
}

/// Weekly working-time cap in half-hour units, including role hours.
fn emit_weekly_hours(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for e in 0..index.n_employees() {
        let cap = index.employees[e].weekly_cap_half_hours();
        for w in 0..index.n_weeks() {
            let mut terms: Vec<_> = index
                .days_of_week(w)
                .map(|d| (SHIFT_HALF_HOURS, vars.active(e, d)))
                .collect();
            for role in WeeklyRole::ALL {
                if let Some(var) = vars.role(role, e, w) {
                    terms.push((role.daily_half_hours() * 5, var));
                }
            }
            cp.lin_le(&terms, cap);
        }
    }
}

/// Sliding windows: at most 6 worked days per 7, at most 5 nights per 6.
fn emit_consecutive_caps(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    let n_days = index.n_days();
    for e in 0..index.n_employees() {
        if n_days >= 7 {
            for start in 0..=(n_days - 7) {
                let window: Vec<_> = (start..start + 7).map(|d| vars.active(e, d)).collect();
                cp.sum_le(&window, MAX_ACTIVE_PER_7 as i32);
            }
        }
        if n_days >= 6 {
            for start in 0..=(n_days - 6) {
                let nights: Vec<_> = (start..start + 6)
                    .map(|d| vars.any(e, d, ShiftCode::N))
                    .collect();
                cp.sum_le(&nights, MAX_NIGHTS_PER_6 as i32);
            }
        }
    }
}

/// Weekly qualified-person roles: exactly one holder in a full role week
/// (at most one when relaxed or partial), holder blocked from regular
/// shifts Mon-Fri, at most one role per employee and week.
fn emit_weekly_roles(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    cfg: &BuildConfig,
) {
    for role in WeeklyRole::ALL {
        for w in 0..index.n_weeks() {
            let mut holders = Vec::new();
            for e in 0..index.n_employees() {
                if let Some(var) = vars.role(role, e, w) {
                    holders.push((e, var));
                }
            }
            if holders.is_empty() {
                continue;
            }

            let slots: Vec<_> = holders.iter().map(|&(_, v)| v).collect();
            let required = index.calendar.is_full_role_week(&index.calendar.weeks()[w]);
            if required && !cfg.relax_role_uniqueness {
                cp.exactly_one(&slots);
            } else {
                cp.at_most_one(&slots);
            }

            for &(e, var) in &holders {
                for d in index.weekdays_of_week(w) {
                    cp.lin_le(&[(1, vars.active(e, d)), (1, var)], 1);
                }
            }
        }
    }

    for e in 0..index.n_employees() {
        for w in 0..index.n_weeks() {
            let roles = vars.roles_of(e, w);
            if roles.len() > 1 {
                cp.at_most_one(&roles);
            }
        }
    }
}

/// At least one non-springer, fully present employee stays completely off
/// each week, on top of any role holders.
fn emit_weekly_reserve(
    cp: &mut CpModel,
    vars: &VariableTable,
    index: &ProblemIndex<'_>,
    warnings: &mut Vec<String>,
) {
    for w in 0..index.n_weeks() {
        let mut reserves = Vec::new();
        for e in 0..index.n_employees() {
            let employee = index.employees[e];
            if employee.springer || employee.ferienjobber {
                continue;
            }
            if !index.fully_present_in_week(e, w) {
                continue;
            }
            let reserve = cp.new_bool();
            for d in index.days_of_week(w) {
                cp.lin_le(&[(1, vars.active(e, d)), (1, reserve)], 1);
            }
            for role in vars.roles_of(e, w) {
                cp.lin_le(&[(1, role), (1, reserve)], 1);
            }
            reserves.push(reserve);
        }
        if reserves.is_empty() {
            warnings.push(format!(
                "No reserve candidate available in the week of {}",
                index.calendar.weeks()[w].monday()
            ));
            continue;
        }
        cp.sum_ge(&reserves, 1);
    }
}

/// A cross-team weekday implies the whole in-window, non-absent weekday
/// span of that week is cross-team on the same shift.
fn emit_cross_team_block(cp: &mut CpModel, vars: &VariableTable, index: &ProblemIndex<'_>) {
    for e in 0..index.n_employees() {
        if index.rotation_index_of(e).is_none() {
            continue;
        }
        for w in 0..index.n_weeks() {
            for s in ShiftCode::ALL {
                let span: Vec<_> = index
                    .weekdays_of_week(w)
                    .filter(|&d| index.in_window_day(d) && !index.is_absent(e, d))
                    .map(|d| vars.xc(e, d, s))
                    .collect();
                if span.len() < 2 {
                    continue;
                }
                let block = cp.new_bool();
                for &day in &span {
                    cp.lin_eq(&[(1, day), (-1, block)], 0);
                }
            }
        }
    }
}

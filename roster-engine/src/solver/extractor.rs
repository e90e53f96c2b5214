use shared::ShiftCode;

use crate::domain::entities::Assignment;
use crate::domain::WeeklyRole;
use crate::solver::cp::{bool_value, CpSolution};
use crate::solver::index::ProblemIndex;
use crate::solver::variables::VariableTable;

/// Translate a solved variable assignment back into roster records. Only
/// cells inside the caller's requested window are emitted; context outside
/// it is already locked in the caller's store. Role weeks become one
/// pseudo-record per in-window weekday.
pub(crate) fn extract(
    index: &ProblemIndex<'_>,
    vars: &VariableTable,
    solution: &CpSolution,
) -> Vec<Assignment> {
    let mut assignments = Vec::new();

    for e in 0..index.n_employees() {
        let employee_id = index.employees[e].id;
        for d in 0..index.n_days() {
            if !index.in_window_day(d) {
                continue;
            }
            for s in ShiftCode::ALL {
                if !bool_value(solution, vars.any(e, d, s)) {
                    continue;
                }
                let mut assignment = Assignment::new(employee_id, index.dates[d], s.into());
                assignment.is_fixed = index.locks.contains_key(&(e, d));
                assignment.cross_team = bool_value(solution, vars.xc(e, d, s));
                assignments.push(assignment);
            }
        }
    }

    for role in WeeklyRole::ALL {
        for w in 0..index.n_weeks() {
            for e in 0..index.n_employees() {
                let Some(var) = vars.role(role, e, w) else {
                    continue;
                };
                if !bool_value(solution, var) {
                    continue;
                }
                for d in index.weekdays_of_week(w) {
                    if !index.in_window_day(d) {
                        continue;
                    }
                    assignments.push(Assignment::new(
                        index.employees[e].id,
                        index.dates[d],
                        role.duty_code(),
                    ));
                }
            }
        }
    }

    assignments
}

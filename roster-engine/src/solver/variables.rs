use std::collections::HashMap;

use selen::prelude::VarId;
use shared::ShiftCode;

use crate::domain::WeeklyRole;
use crate::solver::cp::CpModel;
use crate::solver::index::ProblemIndex;

/// Dense decision-variable table, keyed by `(employee, day, shift)` with
/// precomputed strides. Creation order is a pure function of the problem,
/// which keeps the model deterministic.
#[derive(Clone)]
pub(crate) struct VariableTable {
    n_days: usize,
    n_weeks: usize,
    /// Regular assignment through the employee's own team.
    x: Vec<VarId>,
    /// Cross-team assignment.
    xc: Vec<VarId>,
    /// Channel total `x + xc`, one boolean per cell.
    any: Vec<VarId>,
    /// Works anything that day.
    active: Vec<VarId>,
    /// `team_shift[t][w][s]`: rotating team t covers shift s in week w.
    team_shift: Vec<VarId>,
    /// Weekly role holder variables, only for eligible (employee, week).
    role: HashMap<(WeeklyRole, usize, usize), VarId>,
}

impl VariableTable {
    pub fn create(cp: &mut CpModel, index: &ProblemIndex<'_>) -> Self {
        let n_employees = index.n_employees();
        let n_days = index.n_days();
        let n_weeks = index.n_weeks();
        let cells = n_employees * n_days * 3;

        let x: Vec<VarId> = (0..cells).map(|_| cp.new_bool()).collect();
        let xc: Vec<VarId> = (0..cells).map(|_| cp.new_bool()).collect();
        let any: Vec<VarId> = (0..cells).map(|_| cp.new_bool()).collect();
        let active: Vec<VarId> = (0..n_employees * n_days).map(|_| cp.new_bool()).collect();
        let team_shift: Vec<VarId> = (0..index.rotating_teams.len() * n_weeks * 3)
            .map(|_| cp.new_bool())
            .collect();

        let mut role = HashMap::new();
        for weekly_role in WeeklyRole::ALL {
            for w in 0..n_weeks {
                for e in 0..n_employees {
                    if index.eligible_role_holder(e, w, weekly_role) {
                        role.insert((weekly_role, e, w), cp.new_bool());
                    }
                }
            }
        }

        Self {
            n_days,
            n_weeks,
            x,
            xc,
            any,
            active,
            team_shift,
            role,
        }
    }

    fn cell(&self, e: usize, d: usize, s: ShiftCode) -> usize {
        (e * self.n_days + d) * 3 + s.index()
    }

    pub fn x(&self, e: usize, d: usize, s: ShiftCode) -> VarId {
        self.x[self.cell(e, d, s)]
    }

    pub fn xc(&self, e: usize, d: usize, s: ShiftCode) -> VarId {
        self.xc[self.cell(e, d, s)]
    }

    /// `x + xc` for the cell.
    pub fn any(&self, e: usize, d: usize, s: ShiftCode) -> VarId {
        self.any[self.cell(e, d, s)]
    }

    pub fn active(&self, e: usize, d: usize) -> VarId {
        self.active[e * self.n_days + d]
    }

    pub fn team_shift(&self, t: usize, w: usize, s: ShiftCode) -> VarId {
        self.team_shift[(t * self.n_weeks + w) * 3 + s.index()]
    }

    pub fn role(&self, role: WeeklyRole, e: usize, w: usize) -> Option<VarId> {
        self.role.get(&(role, e, w)).copied()
    }

    /// Role variables of one employee-week, in `WeeklyRole::ALL` order.
    pub fn roles_of(&self, e: usize, w: usize) -> Vec<VarId> {
        WeeklyRole::ALL
            .iter()
            .filter_map(|&r| self.role(r, e, w))
            .collect()
    }
}

use std::time::Duration;

use selen::prelude::VarId;
use tracing::debug;

use crate::solver::constraints;
use crate::solver::cp::CpModel;
use crate::solver::index::ProblemIndex;
use crate::solver::penalties::{self, PenaltyGroup};
use crate::solver::report::RelaxationStep;
use crate::solver::variables::VariableTable;

/// Shape of one model build. Relaxation levels apply the ladder
/// cumulatively: level k enables the first k steps.
#[derive(Debug, Clone)]
pub(crate) struct BuildConfig {
    pub soften_rotation: bool,
    pub drop_weekly_reserve: bool,
    pub drop_cross_team_block: bool,
    pub relax_role_uniqueness: bool,
    /// Feasibility probes skip the penalty machinery entirely.
    pub with_objective: bool,
}

impl BuildConfig {
    pub fn for_level(level: usize, with_objective: bool) -> Self {
        Self {
            soften_rotation: level >= 1,
            drop_weekly_reserve: level >= 2,
            drop_cross_team_block: level >= 3,
            relax_role_uniqueness: level >= 4,
            with_objective,
        }
    }

    pub fn relaxations(level: usize) -> Vec<RelaxationStep> {
        RelaxationStep::LADDER[..level.min(RelaxationStep::LADDER.len())].to_vec()
    }
}

/// A ready-to-solve model together with everything needed to read the
/// solution back.
pub(crate) struct BuiltModel {
    pub cp: CpModel,
    pub vars: VariableTable,
    pub penalties: Vec<PenaltyGroup>,
    pub objective: Option<VarId>,
    pub warnings: Vec<String>,
}

/// Pure function from (problem index, config) to a constraint model.
/// Variable and constraint emission order depend only on the input, so
/// identical problems produce identical models.
pub(crate) fn build_model(
    index: &ProblemIndex<'_>,
    cfg: &BuildConfig,
    timeout: Duration,
    memory_mb: u64,
) -> BuiltModel {
    let mut cp = CpModel::new(timeout, memory_mb);
    let vars = VariableTable::create(&mut cp, index);
    let mut penalty_groups = Vec::new();
    let mut warnings = Vec::new();

    constraints::emit(&mut cp, &vars, index, cfg, &mut penalty_groups, &mut warnings);

    let objective = if cfg.with_objective {
        penalties::emit(&mut cp, &vars, index, &mut penalty_groups);
        assemble_objective(&mut cp, &penalty_groups)
    } else {
        None
    };

    debug!(
        variables = cp.variable_count(),
        constraints = cp.constraint_count(),
        with_objective = cfg.with_objective,
        "model built"
    );

    BuiltModel {
        cp,
        vars,
        penalties: penalty_groups,
        objective,
        warnings,
    }
}

/// Tie the weighted penalty sum to a single objective variable.
fn assemble_objective(cp: &mut CpModel, groups: &[PenaltyGroup]) -> Option<VarId> {
    let mut terms = Vec::new();
    let mut upper_bound: i64 = 0;
    for group in groups {
        let weight = group.rule.weight();
        for &(var, max) in &group.terms {
            terms.push((weight, var));
            upper_bound += weight as i64 * max as i64;
        }
    }
    if terms.is_empty() {
        return None;
    }

    let objective = cp.new_int(0, upper_bound.min(i32::MAX as i64) as i32);
    terms.push((-1, objective));
    cp.lin_eq(&terms, 0);
    Some(objective)
}

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::SolveStatus;

use crate::domain::entities::Assignment;

/// Soft rules contributing to the minimised objective. The relative
/// weights are policy: grouping dominates diversity dominates night
/// consistency, and the fairness terms sit far below the structural ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SoftRule {
    WeekendFairness,
    NightFairness,
    ShiftGrouping,
    WeeklyDiversity,
    NightConsistency,
    WeekendConsistency,
    ShiftHopping,
    TdFairness,
    GapMinimisation,
    WeekendContinuity,
    OwnTeamPreference,
    /// Only present once the rotation baseline has been softened.
    RotationBaseline,
}

impl SoftRule {
    pub fn weight(self) -> i32 {
        match self {
            SoftRule::WeekendFairness => 10,
            SoftRule::NightFairness => 8,
            SoftRule::ShiftGrouping => 1000,
            SoftRule::WeeklyDiversity => 500,
            SoftRule::NightConsistency => 400,
            SoftRule::WeekendConsistency => 300,
            SoftRule::ShiftHopping => 200,
            SoftRule::TdFairness => 4,
            SoftRule::GapMinimisation => 3,
            SoftRule::WeekendContinuity => 2,
            SoftRule::OwnTeamPreference => 1,
            SoftRule::RotationBaseline => 10_000,
        }
    }
}

/// One step of the feasibility-recovery ladder, applied cumulatively in
/// this order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RelaxationStep {
    /// Rotation baseline equalities become weight-10 000 penalties.
    SoftenRotationBaseline,
    /// The one-employee-fully-off-per-week requirement is dropped.
    DropWeeklyReserve,
    /// Cross-team weeks no longer have to be all-or-nothing.
    DropCrossTeamBlock,
    /// Weekly role uniqueness becomes "at most one" instead of "exactly one".
    RelaxWeeklyRoleUniqueness,
}

impl RelaxationStep {
    pub const LADDER: [RelaxationStep; 4] = [
        RelaxationStep::SoftenRotationBaseline,
        RelaxationStep::DropWeeklyReserve,
        RelaxationStep::DropCrossTeamBlock,
        RelaxationStep::RelaxWeeklyRoleUniqueness,
    ];
}

impl fmt::Display for RelaxationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RelaxationStep::SoftenRotationBaseline => "rotation baseline softened",
            RelaxationStep::DropWeeklyReserve => "weekly reserve dropped",
            RelaxationStep::DropCrossTeamBlock => "cross-team block dropped",
            RelaxationStep::RelaxWeeklyRoleUniqueness => "weekly role uniqueness relaxed",
        };
        write!(f, "{}", label)
    }
}

/// Evaluated contribution of one soft rule in the returned roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltySummary {
    pub rule: SoftRule,
    pub weight: i32,
    /// Number of penalty terms with a non-zero value.
    pub violations: u64,
    /// Weighted contribution to the objective.
    pub cost: i64,
}

/// Everything the solve learned besides the roster itself. Warnings are
/// never silent: relaxations, grouping violations and degraded inputs all
/// leave a trace here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SolveStats {
    pub attempts: u32,
    pub relaxations: Vec<RelaxationStep>,
    pub warnings: Vec<String>,
    pub objective: Option<i64>,
    pub penalties: Vec<PenaltySummary>,
    pub wall_time: Duration,
    pub variables: usize,
    pub constraints: usize,
    pub workers: usize,
    pub seed: Option<u64>,
}

/// Result of one solve invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub assignments: Vec<Assignment>,
    pub stats: SolveStats,
}

impl SolveReport {
    /// Process exit code for batch invocations.
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_ordering_policy() {
        assert!(SoftRule::ShiftGrouping.weight() > SoftRule::WeeklyDiversity.weight());
        assert!(SoftRule::WeeklyDiversity.weight() > SoftRule::NightConsistency.weight());
        assert!(SoftRule::NightConsistency.weight() > SoftRule::WeekendConsistency.weight());
        assert!(SoftRule::RotationBaseline.weight() > SoftRule::ShiftGrouping.weight());
        assert_eq!(SoftRule::OwnTeamPreference.weight(), 1);
    }

    #[test]
    fn test_ladder_order() {
        assert_eq!(
            RelaxationStep::LADDER[0],
            RelaxationStep::SoftenRotationBaseline
        );
        assert_eq!(
            RelaxationStep::LADDER[3],
            RelaxationStep::RelaxWeeklyRoleUniqueness
        );
    }
}

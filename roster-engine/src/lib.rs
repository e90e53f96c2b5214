//! Constraint-based monthly shift-roster engine for a 24/7 plant-security
//! workforce. The caller hands over an in-memory [`Problem`]; the engine
//! expands the horizon to whole ISO weeks, builds a CP model of the
//! labour-law, staffing, fairness and rotation rules, solves it within a
//! wall-clock budget and returns a flat assignment list plus diagnostics.

pub mod domain;
pub mod options;
pub mod solver;

pub use domain::calendar::{Calendar, Week};
pub use domain::entities::{
    Absence, Assignment, Employee, LockedAssignment, StaffingBand, StaffingOverride, StaffingPlan,
    Team,
};
pub use domain::problem::Problem;
pub use domain::roster_state::RosterState;
pub use domain::rules::{validate_edit, EditCheck, EditWarning, EditWarningKind};
pub use options::SolveOptions;
pub use solver::driver::{solve, solve_with_cancel, CancellationToken};
pub use solver::report::{PenaltySummary, RelaxationStep, SoftRule, SolveReport, SolveStats};

// Shared vocabulary, re-exported for downstream crates.
pub use shared::{AbsenceKind, DutyCode, EngineError, EngineResult, ShiftCode, SolveStatus};

pub mod absence_rule;
pub mod consecutive_days_rule;
pub mod double_booking_rule;
pub mod locked_cell_rule;
pub mod rest_period_rule;
pub mod weekly_hours_rule;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::ShiftCode;

use crate::domain::entities::Employee;
use crate::domain::problem::Problem;
use crate::domain::roster_state::RosterState;

pub use absence_rule::AbsenceRule;
pub use consecutive_days_rule::ConsecutiveDaysRule;
pub use double_booking_rule::DoubleBookingRule;
pub use locked_cell_rule::LockedCellRule;
pub use rest_period_rule::RestPeriodRule;
pub use weekly_hours_rule::WeeklyHoursRule;

/// Everything a rule may inspect when judging one candidate cell.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub problem: &'a Problem,
    pub state: &'a RosterState,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub shift: ShiftCode,
}

impl<'a> EditContext<'a> {
    pub fn employee(&self) -> Option<&'a Employee> {
        self.problem.employee(self.employee_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EditWarningKind {
    DoubleBooking,
    AbsenceConflict,
    RestPeriod,
    WeeklyHours,
    ConsecutiveDays,
    LockedCell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditWarning {
    pub kind: EditWarningKind,
    pub message: String,
}

/// Verdict of a single-cell validation.
#[derive(Debug, Clone)]
pub enum EditCheck {
    Ok,
    Warnings(Vec<EditWarning>),
}

impl EditCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, EditCheck::Ok)
    }
}

pub trait Rule {
    /// Judge the candidate assignment; `None` means the rule is satisfied.
    fn evaluate(&self, context: &EditContext<'_>) -> Option<EditWarning>;
}

/// Check one manual assignment against the single-cell reductions of the
/// solver rules: double booking, absences, rest period, weekly hours,
/// consecutive-work caps and locks.
pub fn validate_edit(
    problem: &Problem,
    state: &RosterState,
    employee_id: i64,
    date: NaiveDate,
    shift: ShiftCode,
) -> EditCheck {
    let context = EditContext {
        problem,
        state,
        employee_id,
        date,
        shift,
    };

    let rules: [&dyn Rule; 6] = [
        &DoubleBookingRule,
        &AbsenceRule,
        &RestPeriodRule,
        &WeeklyHoursRule,
        &ConsecutiveDaysRule,
        &LockedCellRule,
    ];

    let warnings: Vec<EditWarning> = rules
        .iter()
        .filter_map(|rule| rule.evaluate(&context))
        .collect();

    if warnings.is_empty() {
        EditCheck::Ok
    } else {
        EditCheck::Warnings(warnings)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::ShiftCode;

/// A pre-fixed roster cell, either carried over from an adjacent month's
/// plan or manually pinned. The solve must reproduce it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedAssignment {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub shift: ShiftCode,
    /// Carried from the originating assignment. A cross-team lock fixes the
    /// employee's cell but says nothing about their own team's week shift.
    #[serde(default)]
    pub cross_team: bool,
}

impl LockedAssignment {
    pub fn new(employee_id: i64, date: NaiveDate, shift: ShiftCode) -> Self {
        Self {
            employee_id,
            date,
            shift,
            cross_team: false,
        }
    }
}

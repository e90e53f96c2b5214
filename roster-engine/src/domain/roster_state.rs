use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use shared::{DutyCode, ShiftCode};

use crate::domain::entities::Assignment;

/// Current roster content as seen by an interactive editor: one shift code
/// per occupied (employee, date) cell. Weekly roles and absences live in
/// the problem description, not here.
#[derive(Debug, Clone, Default)]
pub struct RosterState {
    /// Map of employee_id -> (date -> shift)
    assignments: HashMap<i64, HashMap<NaiveDate, ShiftCode>>,
}

impl RosterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the editor view from produced assignments; role pseudo-codes
    /// are skipped.
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut state = Self::new();
        for assignment in assignments {
            let shift = match assignment.shift_code {
                DutyCode::F => ShiftCode::F,
                DutyCode::S => ShiftCode::S,
                DutyCode::N => ShiftCode::N,
                DutyCode::Td | DutyCode::Bmt | DutyCode::Bsb => continue,
            };
            state.assign(assignment.employee_id, assignment.date, shift);
        }
        state
    }

    pub fn assign(&mut self, employee_id: i64, date: NaiveDate, shift: ShiftCode) {
        self.assignments
            .entry(employee_id)
            .or_default()
            .insert(date, shift);
    }

    pub fn clear(&mut self, employee_id: i64, date: NaiveDate) {
        if let Some(cells) = self.assignments.get_mut(&employee_id) {
            cells.remove(&date);
        }
    }

    pub fn shift_on(&self, employee_id: i64, date: NaiveDate) -> Option<ShiftCode> {
        self.assignments.get(&employee_id)?.get(&date).copied()
    }

    pub fn is_working(&self, employee_id: i64, date: NaiveDate) -> bool {
        self.shift_on(employee_id, date).is_some()
    }

    /// Worked days within the inclusive range.
    pub fn worked_days_in(&self, employee_id: i64, from: NaiveDate, to: NaiveDate) -> u32 {
        self.count_in(employee_id, from, to, |_| true)
    }

    /// Night shifts within the inclusive range.
    pub fn nights_in(&self, employee_id: i64, from: NaiveDate, to: NaiveDate) -> u32 {
        self.count_in(employee_id, from, to, |s| s == ShiftCode::N)
    }

    fn count_in(
        &self,
        employee_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        matches: impl Fn(ShiftCode) -> bool,
    ) -> u32 {
        let mut count = 0;
        let mut date = from;
        while date <= to {
            if let Some(shift) = self.shift_on(employee_id, date) {
                if matches(shift) {
                    count += 1;
                }
            }
            date += Duration::days(1);
        }
        count
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::AbsenceKind;

/// A recorded absence span, inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Absence {
    pub employee_id: i64,
    pub kind: AbsenceKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Absence {
    pub fn new(employee_id: i64, kind: AbsenceKind, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            employee_id,
            kind,
            start,
            end,
            notes: None,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 13).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
        let absence = Absence::new(1, AbsenceKind::U, start, end);

        assert!(absence.covers(start));
        assert!(absence.covers(end));
        assert!(!absence.covers(end.succ_opt().unwrap()));
    }
}

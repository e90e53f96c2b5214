use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::DutyCode;

/// One produced roster cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub shift_code: DutyCode,
    /// True when the cell was locked in the problem input.
    pub is_fixed: bool,
    /// True when the employee covered a shift their own team was not
    /// scheduled for that week.
    #[serde(default)]
    pub cross_team: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Assignment {
    pub fn new(employee_id: i64, date: NaiveDate, shift_code: DutyCode) -> Self {
        Self {
            employee_id,
            date,
            shift_code,
            is_fixed: false,
            cross_team: false,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_format() {
        let assignment = Assignment::new(
            7,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            DutyCode::Td,
        );
        let json = serde_json::to_value(&assignment).unwrap();

        assert_eq!(json["employee_id"], 7);
        assert_eq!(json["date"], "2026-01-05");
        assert_eq!(json["shift_code"], "TD");
        assert_eq!(json["is_fixed"], false);
        assert!(json.get("notes").is_none());
    }
}

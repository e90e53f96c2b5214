use serde::{Deserialize, Serialize};
use std::fmt;

/// Plannable shift of the three-shift rotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShiftCode {
    /// Early shift, 05:45-13:45
    F,
    /// Late shift, 13:45-21:45
    S,
    /// Night shift, 21:45-05:45
    N,
}

impl ShiftCode {
    /// Enumeration order used everywhere the engine iterates shifts.
    pub const ALL: [ShiftCode; 3] = [ShiftCode::F, ShiftCode::S, ShiftCode::N];

    /// Position within [`ShiftCode::ALL`].
    pub fn index(self) -> usize {
        match self {
            ShiftCode::F => 0,
            ShiftCode::S => 1,
            ShiftCode::N => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<ShiftCode> {
        ShiftCode::ALL.get(index).copied()
    }

    /// Display span of the shift in local plant time.
    pub fn span(self) -> &'static str {
        match self {
            ShiftCode::F => "05:45-13:45",
            ShiftCode::S => "13:45-21:45",
            ShiftCode::N => "21:45-05:45",
        }
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShiftCode::F => "F",
            ShiftCode::S => "S",
            ShiftCode::N => "N",
        };
        write!(f, "{}", label)
    }
}

/// Duty code as it appears on the published roster. Covers the regular
/// shifts plus the weekly qualified-person roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum DutyCode {
    F,
    S,
    N,
    /// Weekly day-service role (Tagesdienst).
    Td,
    /// Fire-alarm technician weekly role.
    Bmt,
    /// Fire-safety officer weekly role, 9.5 h weekdays.
    Bsb,
}

impl From<ShiftCode> for DutyCode {
    fn from(shift: ShiftCode) -> Self {
        match shift {
            ShiftCode::F => DutyCode::F,
            ShiftCode::S => DutyCode::S,
            ShiftCode::N => DutyCode::N,
        }
    }
}

impl fmt::Display for DutyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DutyCode::F => "F",
            DutyCode::S => "S",
            DutyCode::N => "N",
            DutyCode::Td => "TD",
            DutyCode::Bmt => "BMT",
            DutyCode::Bsb => "BSB",
        };
        write!(f, "{}", label)
    }
}

/// Kind of a recorded absence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AbsenceKind {
    /// Vacation (Urlaub).
    U,
    /// Sick leave (Arbeitsunfaehigkeit).
    Au,
    /// Training (Lehrgang).
    L,
}

impl fmt::Display for AbsenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AbsenceKind::U => "U",
            AbsenceKind::Au => "AU",
            AbsenceKind::L => "L",
        };
        write!(f, "{}", label)
    }
}

/// Outcome class of a solve invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven optimal within the budget.
    Optimal,
    /// A solution satisfying all hard constraints, optimality not proven.
    Feasible,
    /// Unsatisfiable even after every relaxation step.
    Infeasible,
    /// Budget exhausted without an answer either way.
    Unknown,
    /// Cancelled before any solution was found.
    Cancelled,
}

impl SolveStatus {
    /// Process exit code for batch invocations.
    pub fn exit_code(self) -> i32 {
        match self {
            SolveStatus::Optimal => 0,
            SolveStatus::Feasible => 1,
            SolveStatus::Infeasible | SolveStatus::Unknown => 2,
            SolveStatus::Cancelled => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_code_serde_spelling() {
        assert_eq!(serde_json::to_string(&ShiftCode::F).unwrap(), "\"F\"");
        assert_eq!(serde_json::to_string(&DutyCode::Bsb).unwrap(), "\"BSB\"");
        assert_eq!(serde_json::to_string(&AbsenceKind::Au).unwrap(), "\"AU\"");

        let kind: AbsenceKind = serde_json::from_str("\"AU\"").unwrap();
        assert_eq!(kind, AbsenceKind::Au);
    }

    #[test]
    fn test_shift_index_round_trip() {
        for shift in ShiftCode::ALL {
            assert_eq!(ShiftCode::from_index(shift.index()), Some(shift));
        }
        assert_eq!(ShiftCode::from_index(3), None);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SolveStatus::Optimal.exit_code(), 0);
        assert_eq!(SolveStatus::Feasible.exit_code(), 1);
        assert_eq!(SolveStatus::Infeasible.exit_code(), 2);
        assert_eq!(SolveStatus::Cancelled.exit_code(), 4);
    }
}

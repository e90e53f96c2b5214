pub mod calendar;
pub mod entities;
pub mod problem;
pub mod roster_state;
pub mod rules;

use shared::{DutyCode, ShiftCode};

/// Default weekly cycling of the three rotating teams: team `i` covers
/// `ROTATION_SEQUENCE[(i + week) % 3]`.
pub const ROTATION_SEQUENCE: [ShiftCode; 3] = [ShiftCode::F, ShiftCode::N, ShiftCode::S];

/// Shift pairs forbidden on consecutive days (11-hour rest period).
pub const FORBIDDEN_TRANSITIONS: [(ShiftCode, ShiftCode); 3] = [
    (ShiftCode::S, ShiftCode::F),
    (ShiftCode::N, ShiftCode::F),
    (ShiftCode::N, ShiftCode::S),
];

/// Maximum worked days in any window of 7 consecutive days.
pub const MAX_ACTIVE_PER_7: u32 = 6;

/// Maximum night shifts in any window of 6 consecutive days.
pub const MAX_NIGHTS_PER_6: u32 = 5;

/// Regular shift length in half-hour units (8 h).
pub const SHIFT_HALF_HOURS: i32 = 16;

/// Weekly working-time cap for a full-time contract, in half-hour units (48 h).
pub const WEEK_CAP_HALF_HOURS: i32 = 96;

/// Weekly qualified-person roles. Each occupies the weekdays of one week
/// and blocks regular shifts on those days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeeklyRole {
    Td,
    Bmt,
    Bsb,
}

impl WeeklyRole {
    pub const ALL: [WeeklyRole; 3] = [WeeklyRole::Td, WeeklyRole::Bmt, WeeklyRole::Bsb];

    pub fn duty_code(self) -> DutyCode {
        match self {
            WeeklyRole::Td => DutyCode::Td,
            WeeklyRole::Bmt => DutyCode::Bmt,
            WeeklyRole::Bsb => DutyCode::Bsb,
        }
    }

    /// Worked half-hours per weekday while holding the role. BSB is the
    /// 9.5 h fire-safety duty, TD and BMT are regular 8 h day services.
    pub fn daily_half_hours(self) -> i32 {
        match self {
            WeeklyRole::Td | WeeklyRole::Bmt => 16,
            WeeklyRole::Bsb => 19,
        }
    }
}

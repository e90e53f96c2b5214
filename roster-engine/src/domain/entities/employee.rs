use serde::{Deserialize, Serialize};

use crate::domain::{WeeklyRole, WEEK_CAP_HALF_HOURS};

/// Full-time contract hours per week; `weekly_hours` scales against this.
pub const FULL_TIME_HOURS: u32 = 40;

/// A member of the plant-security workforce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    /// Team membership; springers and external helpers may have none.
    pub team_id: Option<i64>,
    /// Floater excluded from the team rotation, used as reserve.
    pub springer: bool,
    pub td_qualified: bool,
    pub bmt_qualified: bool,
    pub bsb_qualified: bool,
    /// Seasonal helper; excluded from fairness pairing and weekly roles.
    pub ferienjobber: bool,
    /// Contract hours per week, 40 = full time.
    pub weekly_hours: u32,
    /// Year-to-date balancing baselines fed in by the caller.
    pub prior_weekend_days: u32,
    pub prior_night_shifts: u32,
    pub prior_td_weeks: u32,
}

impl Employee {
    pub fn new(id: i64, name: impl Into<String>, team_id: Option<i64>) -> Self {
        Self {
            id,
            name: name.into(),
            team_id,
            springer: false,
            td_qualified: false,
            bmt_qualified: false,
            bsb_qualified: false,
            ferienjobber: false,
            weekly_hours: FULL_TIME_HOURS,
            prior_weekend_days: 0,
            prior_night_shifts: 0,
            prior_td_weeks: 0,
        }
    }

    /// Weekly working-time cap in half-hour units, scaled by the
    /// working-time fraction (48 h for a full-time contract).
    pub fn weekly_cap_half_hours(&self) -> i32 {
        (WEEK_CAP_HALF_HOURS as i64 * self.weekly_hours as i64 / FULL_TIME_HOURS as i64) as i32
    }

    pub fn qualifies_for(&self, role: WeeklyRole) -> bool {
        match role {
            WeeklyRole::Td => self.td_qualified,
            WeeklyRole::Bmt => self.bmt_qualified,
            WeeklyRole::Bsb => self.bsb_qualified,
        }
    }

    /// Fairness terms only compare employees with the same contract volume;
    /// seasonal helpers are never compared.
    pub fn is_comparable_to(&self, other: &Employee) -> bool {
        !self.ferienjobber && !other.ferienjobber && self.weekly_hours == other.weekly_hours
    }
}

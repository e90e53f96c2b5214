use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::ShiftCode;

use crate::domain::calendar::is_weekend;

/// Inclusive headcount band for one (shift, day-class) cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffingBand {
    pub min: u32,
    pub max: u32,
}

impl StaffingBand {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Per-date replacement band, e.g. for a public holiday with reduced cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingOverride {
    pub date: NaiveDate,
    pub shift: ShiftCode,
    pub band: StaffingBand,
}

/// Required headcount per shift, split weekday/weekend, with optional
/// per-date overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingPlan {
    weekday: [StaffingBand; 3],
    weekend: [StaffingBand; 3],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    overrides: Vec<StaffingOverride>,
}

impl StaffingPlan {
    pub fn new(weekday: [StaffingBand; 3], weekend: [StaffingBand; 3]) -> Self {
        Self {
            weekday,
            weekend,
            overrides: Vec::new(),
        }
    }

    /// Same band for every shift on weekdays and another on weekends.
    pub fn uniform(weekday: StaffingBand, weekend: StaffingBand) -> Self {
        Self::new([weekday; 3], [weekend; 3])
    }

    pub fn with_override(mut self, date: NaiveDate, shift: ShiftCode, band: StaffingBand) -> Self {
        self.overrides.push(StaffingOverride { date, shift, band });
        self
    }

    pub fn set_band(&mut self, shift: ShiftCode, weekend: bool, band: StaffingBand) {
        if weekend {
            self.weekend[shift.index()] = band;
        } else {
            self.weekday[shift.index()] = band;
        }
    }

    /// Effective band for a (shift, date) cell; overrides win.
    pub fn band_for(&self, shift: ShiftCode, date: NaiveDate) -> StaffingBand {
        if let Some(o) = self
            .overrides
            .iter()
            .find(|o| o.date == date && o.shift == shift)
        {
            return o.band;
        }
        if is_weekend(date) {
            self.weekend[shift.index()]
        } else {
            self.weekday[shift.index()]
        }
    }

    /// All configured bands, for input validation.
    pub fn bands(&self) -> impl Iterator<Item = StaffingBand> + '_ {
        self.weekday
            .iter()
            .chain(self.weekend.iter())
            .copied()
            .chain(self.overrides.iter().map(|o| o.band))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_lookup_weekday_weekend_and_override() {
        let holiday = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let plan = StaffingPlan::uniform(StaffingBand::new(2, 4), StaffingBand::new(1, 3))
            .with_override(holiday, ShiftCode::F, StaffingBand::new(1, 2));

        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();

        assert_eq!(plan.band_for(ShiftCode::F, monday), StaffingBand::new(2, 4));
        assert_eq!(plan.band_for(ShiftCode::N, saturday), StaffingBand::new(1, 3));
        assert_eq!(plan.band_for(ShiftCode::F, holiday), StaffingBand::new(1, 2));
        assert_eq!(plan.band_for(ShiftCode::S, holiday), StaffingBand::new(2, 4));
    }
}

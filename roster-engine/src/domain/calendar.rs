use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use shared::{EngineError, EngineResult};

/// One Monday-to-Sunday slice of the planning horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    /// Position within the extended horizon, 0-based.
    pub index: usize,
    dates: [NaiveDate; 7],
}

impl Week {
    fn starting(monday: NaiveDate, index: usize) -> Self {
        let mut dates = [monday; 7];
        for (offset, slot) in dates.iter_mut().enumerate() {
            *slot = monday + Duration::days(offset as i64);
        }
        Self { index, dates }
    }

    pub fn monday(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn sunday(&self) -> NaiveDate {
        self.dates[6]
    }

    pub fn dates(&self) -> &[NaiveDate; 7] {
        &self.dates
    }

    /// Monday through Friday.
    pub fn weekdays(&self) -> &[NaiveDate] {
        &self.dates[..5]
    }

    /// Saturday and Sunday.
    pub fn weekend(&self) -> &[NaiveDate] {
        &self.dates[5..]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday() && date <= self.sunday()
    }

    /// ISO 8601 week number of this week.
    pub fn iso_week(&self) -> u32 {
        self.dates[0].iso_week().week()
    }
}

/// The requested planning window widened to whole ISO weeks. Dates outside
/// the original window are context: they carry locked assignments but are
/// never freshly planned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    pub extended_start: NaiveDate,
    pub extended_end: NaiveDate,
    weeks: Vec<Week>,
}

impl Calendar {
    /// Expand `[start, end]` to `[monday_on_or_before(start), sunday_on_or_after(end)]`.
    pub fn expand(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidInput(format!(
                "Horizon start {} is after end {}",
                start, end
            )));
        }

        let extended_start = monday_on_or_before(start);
        let extended_end = sunday_on_or_after(end);

        let mut weeks = Vec::new();
        let mut monday = extended_start;
        while monday <= extended_end {
            weeks.push(Week::starting(monday, weeks.len()));
            monday += Duration::days(7);
        }

        Ok(Self {
            original_start: start,
            original_end: end,
            extended_start,
            extended_end,
            weeks,
        })
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Every date of the extended horizon in chronological order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.extended_start
            .iter_days()
            .take_while(move |d| *d <= self.extended_end)
    }

    pub fn in_window(&self, date: NaiveDate) -> bool {
        date >= self.original_start && date <= self.original_end
    }

    pub fn week_of(&self, date: NaiveDate) -> Option<&Week> {
        if date < self.extended_start || date > self.extended_end {
            return None;
        }
        let offset = (date - self.extended_start).num_days() / 7;
        self.weeks.get(offset as usize)
    }

    /// True when every weekday of the week lies inside the original window,
    /// i.e. the week carries the full weekly role obligations.
    pub fn is_full_role_week(&self, week: &Week) -> bool {
        week.weekdays().iter().all(|d| self.in_window(*d))
    }

    /// True when the week lies entirely before the original window (pure
    /// carry-in context from the previous plan).
    pub fn is_pre_window_week(&self, week: &Week) -> bool {
        week.sunday() < self.original_start
    }
}

pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    date + Duration::days((6 - date.weekday().num_days_from_monday()) as i64)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

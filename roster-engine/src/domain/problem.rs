use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{EngineError, EngineResult};

use crate::domain::entities::{Absence, Employee, LockedAssignment, StaffingPlan, Team};

/// In-memory description of one planning run. Owned by the caller; the
/// solver borrows it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub horizon_start: NaiveDate,
    pub horizon_end: NaiveDate,
    pub employees: Vec<Employee>,
    pub teams: Vec<Team>,
    pub absences: Vec<Absence>,
    pub locks: Vec<LockedAssignment>,
    pub staffing: StaffingPlan,
}

impl Problem {
    pub fn new(
        horizon_start: NaiveDate,
        horizon_end: NaiveDate,
        staffing: StaffingPlan,
    ) -> Self {
        Self {
            horizon_start,
            horizon_end,
            employees: Vec::new(),
            teams: Vec::new(),
            absences: Vec::new(),
            locks: Vec::new(),
            staffing,
        }
    }

    pub fn employee(&self, id: i64) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn team(&self, id: i64) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Rotating teams in list order. The rotation constraints expect
    /// exactly three of these.
    pub fn rotating_teams(&self) -> Vec<&Team> {
        self.teams.iter().filter(|t| t.is_rotating).collect()
    }

    /// Absence covering the given cell, if any.
    pub fn absence_on(&self, employee_id: i64, date: NaiveDate) -> Option<&Absence> {
        self.absences
            .iter()
            .find(|a| a.employee_id == employee_id && a.covers(date))
    }

    /// Lock pinning the given cell, if any.
    pub fn lock_on(&self, employee_id: i64, date: NaiveDate) -> Option<&LockedAssignment> {
        self.locks
            .iter()
            .find(|l| l.employee_id == employee_id && l.date == date)
    }

    /// Reject contradictory input before any model is built.
    pub fn validate(&self) -> EngineResult<()> {
        if self.horizon_start > self.horizon_end {
            return Err(EngineError::InvalidInput(format!(
                "Horizon start {} is after end {}",
                self.horizon_start, self.horizon_end
            )));
        }

        let mut team_ids = HashSet::new();
        for team in &self.teams {
            if !team_ids.insert(team.id) {
                return Err(EngineError::InvalidInput(format!(
                    "Duplicate team id {}",
                    team.id
                )));
            }
        }

        let rotating = self.rotating_teams().len();
        if rotating != 0 && rotating != 3 {
            return Err(EngineError::InvalidInput(format!(
                "Rotation requires exactly 3 rotating teams, found {}",
                rotating
            )));
        }

        let mut employee_ids = HashSet::new();
        for employee in &self.employees {
            if !employee_ids.insert(employee.id) {
                return Err(EngineError::InvalidInput(format!(
                    "Duplicate employee id {}",
                    employee.id
                )));
            }
            if let Some(team_id) = employee.team_id {
                if !team_ids.contains(&team_id) {
                    return Err(EngineError::InvalidInput(format!(
                        "Employee {} references unknown team {}",
                        employee.id, team_id
                    )));
                }
            }
            if employee.weekly_hours == 0 {
                return Err(EngineError::InvalidInput(format!(
                    "Employee {} has a zero-hour contract",
                    employee.id
                )));
            }
        }

        for absence in &self.absences {
            if absence.start > absence.end {
                return Err(EngineError::InvalidInput(format!(
                    "Absence for employee {} has start {} after end {}",
                    absence.employee_id, absence.start, absence.end
                )));
            }
            if !employee_ids.contains(&absence.employee_id) {
                return Err(EngineError::InvalidInput(format!(
                    "Absence references unknown employee {}",
                    absence.employee_id
                )));
            }
        }

        for band in self.staffing.bands() {
            if band.min > band.max {
                return Err(EngineError::InvalidInput(format!(
                    "Staffing band has min {} > max {}",
                    band.min, band.max
                )));
            }
        }

        let mut locked_cells: HashMap<(i64, NaiveDate), &LockedAssignment> = HashMap::new();
        for lock in &self.locks {
            if !employee_ids.contains(&lock.employee_id) {
                return Err(EngineError::InvalidInput(format!(
                    "Lock references unknown employee {}",
                    lock.employee_id
                )));
            }
            if self.absence_on(lock.employee_id, lock.date).is_some() {
                return Err(EngineError::InvalidInput(format!(
                    "Employee {} is locked to {} on {} but absent that day",
                    lock.employee_id, lock.shift, lock.date
                )));
            }
            if let Some(previous) = locked_cells.insert((lock.employee_id, lock.date), lock) {
                if previous.shift != lock.shift {
                    return Err(EngineError::InvalidInput(format!(
                        "Employee {} is locked to both {} and {} on {}",
                        lock.employee_id, previous.shift, lock.shift, lock.date
                    )));
                }
            }
        }

        Ok(())
    }
}

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use shared::{EngineError, EngineResult, ShiftCode};

use crate::domain::calendar::{is_weekend, Calendar};
use crate::domain::entities::{Employee, Team};
use crate::domain::problem::Problem;
use crate::domain::WeeklyRole;

/// Precomputed dense view of a validated problem: employees sorted by id,
/// dates chronological, shifts in `[F, S, N]`. Everything the emitters
/// look up per cell is resolved to plain indices here.
pub(crate) struct ProblemIndex<'a> {
    pub problem: &'a Problem,
    pub calendar: Calendar,
    pub employees: Vec<&'a Employee>,
    pub dates: Vec<NaiveDate>,
    pub rotating_teams: Vec<&'a Team>,
    /// (employee, day) -> locked shift and its cross-team flag.
    pub locks: BTreeMap<(usize, usize), (ShiftCode, bool)>,
    /// (rotating team, week) -> shift induced by in-window locks.
    pub team_locks: BTreeMap<(usize, usize), ShiftCode>,
    /// (rotating team, week) pairs with fewer than 3 available members.
    pub understaffed: Vec<(usize, usize)>,
    employee_pos: HashMap<i64, usize>,
    date_pos: HashMap<NaiveDate, usize>,
    rotating_pos: HashMap<i64, usize>,
    absent: Vec<bool>,
    weekend: Vec<bool>,
    in_window: Vec<bool>,
}

impl<'a> ProblemIndex<'a> {
    pub fn new(problem: &'a Problem) -> EngineResult<Self> {
        let calendar = Calendar::expand(problem.horizon_start, problem.horizon_end)?;

        let mut employees: Vec<&Employee> = problem.employees.iter().collect();
        employees.sort_by_key(|e| e.id);
        let employee_pos: HashMap<i64, usize> =
            employees.iter().enumerate().map(|(i, e)| (e.id, i)).collect();

        let dates: Vec<NaiveDate> = calendar.dates().collect();
        let date_pos: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        let weekend: Vec<bool> = dates.iter().map(|d| is_weekend(*d)).collect();
        let in_window: Vec<bool> = dates.iter().map(|d| calendar.in_window(*d)).collect();

        let rotating_teams = problem.rotating_teams();
        let rotating_pos: HashMap<i64, usize> = rotating_teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, i))
            .collect();

        let mut absent = vec![false; employees.len() * dates.len()];
        for absence in &problem.absences {
            let Some(&e) = employee_pos.get(&absence.employee_id) else {
                continue;
            };
            for (d, date) in dates.iter().enumerate() {
                if absence.covers(*date) {
                    absent[e * dates.len() + d] = true;
                }
            }
        }

        let mut index = Self {
            problem,
            calendar,
            employees,
            dates,
            rotating_teams,
            locks: BTreeMap::new(),
            team_locks: BTreeMap::new(),
            understaffed: Vec::new(),
            employee_pos,
            date_pos,
            rotating_pos,
            absent,
            weekend,
            in_window,
        };
        index.collect_locks()?;
        index.collect_understaffed_weeks();
        Ok(index)
    }

    /// Merge employee locks and derive team-level locks. Only in-window,
    /// non-cross-team locks of rotating-team members pin the team week.
    fn collect_locks(&mut self) -> EngineResult<()> {
        for lock in &self.problem.locks {
            let Some(&e) = self.employee_pos.get(&lock.employee_id) else {
                continue;
            };
            // Locks outside the extended horizon belong to another plan.
            let Some(&d) = self.date_pos.get(&lock.date) else {
                continue;
            };
            self.locks.insert((e, d), (lock.shift, lock.cross_team));

            if !self.in_window[d] || lock.cross_team {
                continue;
            }
            let Some(t) = self.rotation_index_of(e) else {
                continue;
            };
            let w = self.week_of_day(d);
            if let Some(&existing) = self.team_locks.get(&(t, w)) {
                if existing != lock.shift {
                    return Err(EngineError::InvalidInput(format!(
                        "Locks pin team {} to both {} and {} in the week of {}",
                        self.rotating_teams[t].name,
                        existing,
                        lock.shift,
                        self.calendar.weeks()[w].monday()
                    )));
                }
            } else {
                self.team_locks.insert((t, w), lock.shift);
            }
        }
        Ok(())
    }

    fn collect_understaffed_weeks(&mut self) {
        for (t, _team) in self.rotating_teams.iter().enumerate() {
            let members = self.members_of_rotating_team(t);
            for week in 0..self.n_weeks() {
                let available = members
                    .iter()
                    .filter(|&&e| self.has_presence_in_week(e, week))
                    .count();
                if available < 3 {
                    self.understaffed.push((t, week));
                }
            }
        }
    }

    pub fn n_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn n_days(&self) -> usize {
        self.dates.len()
    }

    pub fn n_weeks(&self) -> usize {
        self.calendar.weeks().len()
    }

    pub fn week_of_day(&self, d: usize) -> usize {
        d / 7
    }

    /// Day indices of week `w`, Monday first.
    pub fn days_of_week(&self, w: usize) -> std::ops::Range<usize> {
        (w * 7)..(w * 7 + 7).min(self.n_days())
    }

    /// Monday..Friday day indices of week `w`.
    pub fn weekdays_of_week(&self, w: usize) -> std::ops::Range<usize> {
        (w * 7)..(w * 7 + 5).min(self.n_days())
    }

    pub fn is_absent(&self, e: usize, d: usize) -> bool {
        self.absent[e * self.n_days() + d]
    }

    pub fn is_weekend_day(&self, d: usize) -> bool {
        self.weekend[d]
    }

    pub fn in_window_day(&self, d: usize) -> bool {
        self.in_window[d]
    }

    /// Rotation slot of the employee's team; `None` for springers and
    /// members of non-rotating teams, which are not coupled to any week
    /// shift.
    pub fn rotation_index_of(&self, e: usize) -> Option<usize> {
        let employee = self.employees[e];
        if employee.springer {
            return None;
        }
        let team_id = employee.team_id?;
        self.rotating_pos.get(&team_id).copied()
    }

    pub fn members_of_rotating_team(&self, t: usize) -> Vec<usize> {
        (0..self.n_employees())
            .filter(|&e| self.rotation_index_of(e) == Some(t))
            .collect()
    }

    /// At least one non-absent day in the week.
    pub fn has_presence_in_week(&self, e: usize, w: usize) -> bool {
        self.days_of_week(w).any(|d| !self.is_absent(e, d))
    }

    /// Absent on no day of the week.
    pub fn fully_present_in_week(&self, e: usize, w: usize) -> bool {
        self.days_of_week(w).all(|d| !self.is_absent(e, d))
    }

    /// Whether the employee may hold the weekly role in week `w`:
    /// qualified, not a seasonal helper, and present on every weekday.
    pub fn eligible_role_holder(&self, e: usize, w: usize, role: WeeklyRole) -> bool {
        let employee = self.employees[e];
        employee.qualifies_for(role)
            && !employee.ferienjobber
            && self.weekdays_of_week(w).all(|d| !self.is_absent(e, d))
    }

    /// Default rotation shift for rotating team `t` in week `w`.
    pub fn rotation_baseline(&self, t: usize, w: usize) -> ShiftCode {
        crate::domain::ROTATION_SEQUENCE[(t + w) % 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Absence, LockedAssignment, StaffingBand, StaffingPlan};
    use shared::AbsenceKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn problem_with_teams() -> Problem {
        let mut problem = Problem::new(
            date(2026, 2, 2),
            date(2026, 3, 1),
            StaffingPlan::uniform(StaffingBand::new(1, 5), StaffingBand::new(1, 5)),
        );
        for (team_id, name) in [(1, "Team A"), (2, "Team B"), (3, "Team C")] {
            problem.teams.push(Team::new(team_id, name, true));
        }
        let mut next_id = 1;
        for team_id in 1..=3 {
            for _ in 0..4 {
                problem.employees.push(Employee::new(
                    next_id,
                    format!("Employee {}", next_id),
                    Some(team_id),
                ));
                next_id += 1;
            }
        }
        problem
    }

    #[test]
    fn test_employees_sorted_and_dense_dates() {
        let mut problem = problem_with_teams();
        problem.employees.reverse();
        let index = ProblemIndex::new(&problem).unwrap();

        let ids: Vec<i64> = index.employees.iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(index.n_days(), 28);
        assert_eq!(index.n_weeks(), 4);
    }

    #[test]
    fn test_pre_window_lock_never_pins_team() {
        // February 2026 following January: extended horizon reaches back
        // to 2026-01-26 and the carried locks are context only.
        let mut problem = problem_with_teams();
        problem.horizon_start = date(2026, 2, 1);
        problem.horizon_end = date(2026, 2, 28);
        problem
            .locks
            .push(LockedAssignment::new(1, date(2026, 1, 28), ShiftCode::N));

        let index = ProblemIndex::new(&problem).unwrap();
        assert_eq!(index.calendar.extended_start, date(2026, 1, 26));
        assert_eq!(index.locks.len(), 1);
        assert!(index.team_locks.is_empty());
    }

    #[test]
    fn test_in_window_lock_pins_team_week() {
        let mut problem = problem_with_teams();
        problem
            .locks
            .push(LockedAssignment::new(1, date(2026, 2, 4), ShiftCode::S));

        let index = ProblemIndex::new(&problem).unwrap();
        assert_eq!(index.team_locks.get(&(0, 0)), Some(&ShiftCode::S));
    }

    #[test]
    fn test_cross_team_lock_stays_employee_level() {
        let mut problem = problem_with_teams();
        let mut lock = LockedAssignment::new(1, date(2026, 2, 4), ShiftCode::S);
        lock.cross_team = true;
        problem.locks.push(lock);

        let index = ProblemIndex::new(&problem).unwrap();
        assert!(index.team_locks.is_empty());
        assert_eq!(index.locks.len(), 1);
    }

    #[test]
    fn test_conflicting_team_locks_rejected() {
        let mut problem = problem_with_teams();
        problem
            .locks
            .push(LockedAssignment::new(1, date(2026, 2, 4), ShiftCode::S));
        problem
            .locks
            .push(LockedAssignment::new(2, date(2026, 2, 5), ShiftCode::N));

        assert!(ProblemIndex::new(&problem).is_err());
    }

    #[test]
    fn test_understaffed_week_detected() {
        let mut problem = problem_with_teams();
        // Take two of team A's four members out for the first week.
        for employee_id in [1, 2] {
            problem.absences.push(Absence::new(
                employee_id,
                AbsenceKind::Au,
                date(2026, 2, 2),
                date(2026, 2, 8),
            ));
        }

        let index = ProblemIndex::new(&problem).unwrap();
        assert!(index.understaffed.contains(&(0, 0)));
        assert!(!index.understaffed.contains(&(1, 0)));
    }

    #[test]
    fn test_rotation_baseline_cycles() {
        let problem = problem_with_teams();
        let index = ProblemIndex::new(&problem).unwrap();

        assert_eq!(index.rotation_baseline(0, 0), ShiftCode::F);
        assert_eq!(index.rotation_baseline(1, 0), ShiftCode::N);
        assert_eq!(index.rotation_baseline(2, 0), ShiftCode::S);
        assert_eq!(index.rotation_baseline(0, 1), ShiftCode::N);
        assert_eq!(index.rotation_baseline(0, 3), ShiftCode::F);
    }
}

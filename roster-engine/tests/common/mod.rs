use std::collections::HashMap;

use chrono::NaiveDate;
use roster_engine::{
    Assignment, DutyCode, Employee, Problem, ShiftCode, SolveReport, StaffingBand, StaffingPlan,
    Team,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The reference workforce: 15 employees in 3 rotating teams of 5, with
/// two TD-qualified members plus one BMT and one BSB qualification.
pub fn full_workforce_problem(start: NaiveDate, end: NaiveDate) -> Problem {
    let mut problem = Problem::new(
        start,
        end,
        StaffingPlan::uniform(StaffingBand::new(2, 5), StaffingBand::new(1, 5)),
    );
    for (id, name) in [(1, "Team A"), (2, "Team B"), (3, "Team C")] {
        problem.teams.push(Team::new(id, name, true));
    }

    let roster: [(i64, &str, i64); 15] = [
        (1, "Anna Schmidt", 1),
        (2, "Ben Keller", 1),
        (3, "Clara Vogt", 1),
        (4, "David Braun", 1),
        (5, "Eva Lang", 1),
        (6, "Felix Stein", 2),
        (7, "Greta Horn", 2),
        (8, "Hans Roth", 2),
        (9, "Ines Falk", 2),
        (10, "Jonas Weber", 2),
        (11, "Katrin Moser", 3),
        (12, "Lisa Meyer", 3),
        (13, "Michael Schulz", 3),
        (14, "Nina Berg", 3),
        (15, "Andreas Wolf", 3),
    ];
    for (id, name, team_id) in roster {
        let mut employee = Employee::new(id, name, Some(team_id));
        match id {
            12 | 15 => employee.td_qualified = true,
            2 => employee.bmt_qualified = true,
            8 => employee.bsb_qualified = true,
            _ => {}
        }
        problem.employees.push(employee);
    }
    problem
}

/// A small rotation fixture: 3 rotating teams of 3, no qualifications.
pub fn small_rotation_problem(start: NaiveDate, end: NaiveDate) -> Problem {
    let mut problem = Problem::new(
        start,
        end,
        StaffingPlan::uniform(StaffingBand::new(1, 3), StaffingBand::new(1, 3)),
    );
    for (id, name) in [(1, "Team A"), (2, "Team B"), (3, "Team C")] {
        problem.teams.push(Team::new(id, name, true));
    }
    for id in 1..=9 {
        let team_id = (id - 1) / 3 + 1;
        problem
            .employees
            .push(Employee::new(id, format!("Employee {}", id), Some(team_id)));
    }
    problem
}

/// Teamless fixture: only the day shift is operated, weekends closed.
pub fn day_shift_problem(start: NaiveDate, end: NaiveDate, staff: usize) -> Problem {
    let mut problem = Problem::new(
        start,
        end,
        StaffingPlan::new(
            [
                StaffingBand::new(1, 1),
                StaffingBand::new(0, 0),
                StaffingBand::new(0, 0),
            ],
            [StaffingBand::new(0, 0); 3],
        ),
    );
    for id in 1..=staff as i64 {
        problem
            .employees
            .push(Employee::new(id, format!("Employee {}", id), None));
    }
    problem
}

pub fn shift_of(code: DutyCode) -> Option<ShiftCode> {
    match code {
        DutyCode::F => Some(ShiftCode::F),
        DutyCode::S => Some(ShiftCode::S),
        DutyCode::N => Some(ShiftCode::N),
        _ => None,
    }
}

/// Regular (F/S/N) assignments keyed by (employee, date).
pub fn regular_cells(report: &SolveReport) -> HashMap<(i64, NaiveDate), &Assignment> {
    let mut cells = HashMap::new();
    for assignment in &report.assignments {
        if shift_of(assignment.shift_code).is_some() {
            let previous = cells.insert((assignment.employee_id, assignment.date), assignment);
            assert!(
                previous.is_none(),
                "employee {} holds two shifts on {}",
                assignment.employee_id,
                assignment.date
            );
        }
    }
    cells
}

/// Check the universal hard properties of a returned roster: uniqueness,
/// absence safety, band compliance, rest law and the consecutive caps.
pub fn assert_hard_properties(problem: &Problem, report: &SolveReport) {
    let cells = regular_cells(report);

    // Absence safety, for role records too.
    for assignment in &report.assignments {
        assert!(
            problem
                .absence_on(assignment.employee_id, assignment.date)
                .is_none(),
            "employee {} assigned on absent day {}",
            assignment.employee_id,
            assignment.date
        );
    }

    // Band compliance per (date, shift).
    let mut headcount: HashMap<(NaiveDate, ShiftCode), u32> = HashMap::new();
    for assignment in cells.values() {
        let shift = shift_of(assignment.shift_code).unwrap();
        *headcount.entry((assignment.date, shift)).or_default() += 1;
    }
    let mut day = problem.horizon_start;
    while day <= problem.horizon_end {
        for shift in ShiftCode::ALL {
            let band = problem.staffing.band_for(shift, day);
            let count = headcount.get(&(day, shift)).copied().unwrap_or(0);
            assert!(
                count >= band.min && count <= band.max,
                "{} staff on {} {} outside band {}..{}",
                count,
                day,
                shift,
                band.min,
                band.max
            );
        }
        day = day.succ_opt().unwrap();
    }

    // Rest law and sliding caps per employee.
    for employee in &problem.employees {
        let mut day = problem.horizon_start;
        while day < problem.horizon_end {
            let today = cells.get(&(employee.id, day)).map(|a| a.shift_code);
            let tomorrow = cells
                .get(&(employee.id, day.succ_opt().unwrap()))
                .map(|a| a.shift_code);
            if let (Some(a), Some(b)) = (today, tomorrow) {
                let pair = (shift_of(a).unwrap(), shift_of(b).unwrap());
                assert!(
                    !roster_engine::domain::FORBIDDEN_TRANSITIONS.contains(&pair),
                    "forbidden transition {:?} for employee {} on {}",
                    pair,
                    employee.id,
                    day
                );
            }
            day = day.succ_opt().unwrap();
        }

        let days: Vec<NaiveDate> = {
            let mut v = Vec::new();
            let mut d = problem.horizon_start;
            while d <= problem.horizon_end {
                v.push(d);
                d = d.succ_opt().unwrap();
            }
            v
        };
        for window in days.windows(7) {
            let worked = window
                .iter()
                .filter(|d| cells.contains_key(&(employee.id, **d)))
                .count();
            assert!(worked <= 6, "employee {} works 7 of 7 days", employee.id);
        }
        for window in days.windows(6) {
            let nights = window
                .iter()
                .filter(|d| {
                    cells
                        .get(&(employee.id, **d))
                        .map(|a| a.shift_code == DutyCode::N)
                        .unwrap_or(false)
                })
                .count();
            assert!(nights <= 5, "employee {} works 6 nights in 6 days", employee.id);
        }
    }
}

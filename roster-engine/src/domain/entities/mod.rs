pub mod absence;
pub mod assignment;
pub mod employee;
pub mod locked_assignment;
pub mod staffing;
pub mod team;

pub use absence::Absence;
pub use assignment::Assignment;
pub use employee::Employee;
pub use locked_assignment::LockedAssignment;
pub use staffing::{StaffingBand, StaffingOverride, StaffingPlan};
pub use team::Team;

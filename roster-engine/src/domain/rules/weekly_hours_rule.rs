use chrono::Duration;

use super::{EditContext, EditWarning, EditWarningKind, Rule};
use crate::domain::calendar::monday_on_or_before;
use crate::domain::SHIFT_HALF_HOURS;

/// Rule: weekly working time stays under the contract-scaled 48 h cap.
pub struct WeeklyHoursRule;

impl Rule for WeeklyHoursRule {
    fn evaluate(&self, context: &EditContext<'_>) -> Option<EditWarning> {
        let monday = monday_on_or_before(context.date);
        let sunday = monday + Duration::days(6);

        // The candidate replaces whatever the cell currently holds.
        let mut worked = context
            .state
            .worked_days_in(context.employee_id, monday, sunday);
        if context.state.is_working(context.employee_id, context.date) {
            worked -= 1;
        }
        let half_hours = (worked as i32 + 1) * SHIFT_HALF_HOURS;

        let cap = context
            .employee()
            .map(|e| e.weekly_cap_half_hours())
            .unwrap_or(crate::domain::WEEK_CAP_HALF_HOURS);

        if half_hours > cap {
            return Some(EditWarning {
                kind: EditWarningKind::WeeklyHours,
                message: format!(
                    "Week of {} would reach {:.1} h, above the {:.1} h cap",
                    monday,
                    half_hours as f64 / 2.0,
                    cap as f64 / 2.0
                ),
            });
        }

        None
    }
}

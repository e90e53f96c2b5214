use chrono::Duration;
use shared::ShiftCode;

use super::{EditContext, EditWarning, EditWarningKind, Rule};
use crate::domain::{MAX_ACTIVE_PER_7, MAX_NIGHTS_PER_6};

/// Rule: at most 6 worked days in any 7-day window and at most 5 night
/// shifts in any 6-day window.
pub struct ConsecutiveDaysRule;

impl Rule for ConsecutiveDaysRule {
    fn evaluate(&self, context: &EditContext<'_>) -> Option<EditWarning> {
        // Every 7-day window containing the candidate date.
        for offset in 0..7 {
            let from = context.date - Duration::days(6 - offset);
            let to = from + Duration::days(6);
            let mut worked = context.state.worked_days_in(context.employee_id, from, to);
            if !context.state.is_working(context.employee_id, context.date) {
                worked += 1;
            }
            if worked > MAX_ACTIVE_PER_7 {
                return Some(EditWarning {
                    kind: EditWarningKind::ConsecutiveDays,
                    message: format!(
                        "{} worked days in the 7 days from {} exceed the maximum of {}",
                        worked, from, MAX_ACTIVE_PER_7
                    ),
                });
            }
        }

        if context.shift == ShiftCode::N {
            for offset in 0..6 {
                let from = context.date - Duration::days(5 - offset);
                let to = from + Duration::days(5);
                let mut nights = context.state.nights_in(context.employee_id, from, to);
                if context.state.shift_on(context.employee_id, context.date) != Some(ShiftCode::N)
                {
                    nights += 1;
                }
                if nights > MAX_NIGHTS_PER_6 {
                    return Some(EditWarning {
                        kind: EditWarningKind::ConsecutiveDays,
                        message: format!(
                            "{} night shifts in the 6 days from {} exceed the maximum of {}",
                            nights, from, MAX_NIGHTS_PER_6
                        ),
                    });
                }
            }
        }

        None
    }
}

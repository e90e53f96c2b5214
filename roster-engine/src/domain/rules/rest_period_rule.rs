use chrono::Duration;

use super::{EditContext, EditWarning, EditWarningKind, Rule};
use crate::domain::FORBIDDEN_TRANSITIONS;

/// Rule: the 11-hour rest period forbids the day pairs S->F, N->F and N->S.
pub struct RestPeriodRule;

impl Rule for RestPeriodRule {
    fn evaluate(&self, context: &EditContext<'_>) -> Option<EditWarning> {
        let previous = context
            .state
            .shift_on(context.employee_id, context.date - Duration::days(1));
        if let Some(previous) = previous {
            if FORBIDDEN_TRANSITIONS.contains(&(previous, context.shift)) {
                return Some(EditWarning {
                    kind: EditWarningKind::RestPeriod,
                    message: format!(
                        "{} after {} on the previous day violates the rest period",
                        context.shift, previous
                    ),
                });
            }
        }

        let next = context
            .state
            .shift_on(context.employee_id, context.date + Duration::days(1));
        if let Some(next) = next {
            if FORBIDDEN_TRANSITIONS.contains(&(context.shift, next)) {
                return Some(EditWarning {
                    kind: EditWarningKind::RestPeriod,
                    message: format!(
                        "{} before {} on the next day violates the rest period",
                        context.shift, next
                    ),
                });
            }
        }

        None
    }
}

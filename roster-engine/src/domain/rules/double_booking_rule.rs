use super::{EditContext, EditWarning, EditWarningKind, Rule};

/// Rule: an employee holds at most one shift per date.
pub struct DoubleBookingRule;

impl Rule for DoubleBookingRule {
    fn evaluate(&self, context: &EditContext<'_>) -> Option<EditWarning> {
        let existing = context.state.shift_on(context.employee_id, context.date)?;
        if existing == context.shift {
            return None;
        }
        Some(EditWarning {
            kind: EditWarningKind::DoubleBooking,
            message: format!(
                "Employee {} already holds {} on {}",
                context.employee_id, existing, context.date
            ),
        })
    }
}

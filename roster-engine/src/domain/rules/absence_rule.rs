use super::{EditContext, EditWarning, EditWarningKind, Rule};

/// Rule: no shift may be placed on a date covered by an absence.
pub struct AbsenceRule;

impl Rule for AbsenceRule {
    fn evaluate(&self, context: &EditContext<'_>) -> Option<EditWarning> {
        let absence = context
            .problem
            .absence_on(context.employee_id, context.date)?;
        Some(EditWarning {
            kind: EditWarningKind::AbsenceConflict,
            message: format!(
                "Employee {} is absent ({}) from {} to {}",
                context.employee_id, absence.kind, absence.start, absence.end
            ),
        })
    }
}

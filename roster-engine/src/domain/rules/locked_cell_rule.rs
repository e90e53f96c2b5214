use super::{EditContext, EditWarning, EditWarningKind, Rule};

/// Rule: a locked cell only accepts the shift it is pinned to.
pub struct LockedCellRule;

impl Rule for LockedCellRule {
    fn evaluate(&self, context: &EditContext<'_>) -> Option<EditWarning> {
        let lock = context.problem.lock_on(context.employee_id, context.date)?;
        if lock.shift == context.shift {
            return None;
        }
        Some(EditWarning {
            kind: EditWarningKind::LockedCell,
            message: format!(
                "Cell is fixed to {} on {} and cannot be changed to {}",
                lock.shift, context.date, context.shift
            ),
        })
    }
}

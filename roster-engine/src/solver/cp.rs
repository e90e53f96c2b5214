use std::time::Duration;

use selen::prelude::*;

/// Backend solution type, re-exported for the driver and extractor.
pub(crate) use selen::prelude::Solution as CpSolution;

/// Thin wrapper around the CP backend. Keeps the constraint emitters
/// declarative and concentrates every backend call in one place.
pub(crate) struct CpModel {
    model: Model,
}

/// Classified outcome of a single backend run.
pub(crate) enum CpOutcome {
    Solution(Solution),
    Infeasible,
    Timeout,
    Error(String),
}

impl CpModel {
    pub fn new(timeout: Duration, memory_mb: u64) -> Self {
        let config = SolverConfig::default()
            .with_timeout_ms((timeout.as_millis() as u64).max(100))
            .with_max_memory_mb(memory_mb);
        Self {
            model: Model::with_config(config),
        }
    }

    pub fn new_bool(&mut self) -> VarId {
        self.model.bool()
    }

    pub fn new_int(&mut self, lo: i32, hi: i32) -> VarId {
        self.model.int(lo, hi)
    }

    /// Pin a variable to a constant.
    pub fn fix(&mut self, var: VarId, value: i32) {
        let _ = self.model.new(var.eq(value));
    }

    pub fn lin_eq(&mut self, terms: &[(i32, VarId)], rhs: i32) {
        let (coefficients, variables) = split(terms);
        self.model.int_lin_eq(&coefficients, &variables, rhs);
    }

    pub fn lin_le(&mut self, terms: &[(i32, VarId)], rhs: i32) {
        let (coefficients, variables) = split(terms);
        self.model.int_lin_le(&coefficients, &variables, rhs);
    }

    pub fn lin_ge(&mut self, terms: &[(i32, VarId)], rhs: i32) {
        let negated: Vec<(i32, VarId)> = terms.iter().map(|&(c, v)| (-c, v)).collect();
        self.lin_le(&negated, -rhs);
    }

    pub fn sum_le(&mut self, vars: &[VarId], rhs: i32) {
        if vars.is_empty() {
            if rhs < 0 {
                self.contradiction();
            }
            return;
        }
        let terms: Vec<(i32, VarId)> = vars.iter().map(|&v| (1, v)).collect();
        self.lin_le(&terms, rhs);
    }

    pub fn sum_ge(&mut self, vars: &[VarId], rhs: i32) {
        if vars.is_empty() {
            if rhs > 0 {
                self.contradiction();
            }
            return;
        }
        let terms: Vec<(i32, VarId)> = vars.iter().map(|&v| (1, v)).collect();
        self.lin_ge(&terms, rhs);
    }

    /// Post an unsatisfiable constraint; used when an empty sum cannot
    /// meet its bound.
    fn contradiction(&mut self) {
        let witness = self.new_bool();
        self.fix(witness, 0);
        self.fix(witness, 1);
    }

    pub fn at_most_one(&mut self, vars: &[VarId]) {
        self.sum_le(vars, 1);
    }

    pub fn exactly_one(&mut self, vars: &[VarId]) {
        let terms: Vec<(i32, VarId)> = vars.iter().map(|&v| (1, v)).collect();
        self.lin_eq(&terms, 1);
    }

    /// Boolean disjunction of a non-empty set of variables.
    pub fn or(&mut self, vars: &[VarId]) -> VarId {
        debug_assert!(!vars.is_empty());
        self.model.bool_or(vars)
    }

    pub fn variable_count(&self) -> usize {
        self.model.variable_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.model.constraint_count()
    }

    /// Pure feasibility run.
    pub fn solve(self) -> CpOutcome {
        classify(self.model.solve())
    }

    /// Improving-incumbent iteration for the optimisation pass. The
    /// iterator ends when optimality is proven or the backend timeout hits.
    pub fn minimize_iter(self, objective: VarId) -> impl Iterator<Item = Solution> {
        self.model.minimize_and_iterate(objective)
    }
}

fn classify(result: SolverResult<Solution>) -> CpOutcome {
    match result {
        Ok(solution) => CpOutcome::Solution(solution),
        Err(SolverError::NoSolution { .. }) | Err(SolverError::ConflictingConstraints { .. }) => {
            CpOutcome::Infeasible
        }
        Err(SolverError::Timeout { .. }) => CpOutcome::Timeout,
        Err(error) => CpOutcome::Error(error.to_string()),
    }
}

fn split(terms: &[(i32, VarId)]) -> (Vec<i32>, Vec<VarId>) {
    let mut coefficients = Vec::with_capacity(terms.len());
    let mut variables = Vec::with_capacity(terms.len());
    for &(c, v) in terms {
        coefficients.push(c);
        variables.push(v);
    }
    (coefficients, variables)
}

/// Read a 0/1 variable from a solution.
pub(crate) fn bool_value(solution: &Solution, var: VarId) -> bool {
    int_value(solution, var) == 1
}

/// Read an integer variable from a solution.
pub(crate) fn int_value(solution: &Solution, var: VarId) -> i64 {
    match solution[var] {
        Val::ValI(v) => v as i64,
        Val::ValF(f) => f.round() as i64,
    }
}

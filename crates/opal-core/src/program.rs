//! The flat, immutable program a solver consumes.

use crate::types::Bounds;
use opal_expr::ids::RawVarId;
use opal_expr::ComparisonSense;

/// One constraint row over raw columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    label: String,
    terms: Vec<(RawVarId, f64)>,
    sense: ComparisonSense,
    rhs: f64,
}

impl Row {
    pub(crate) fn new(
        label: String,
        terms: Vec<(RawVarId, f64)>,
        sense: ComparisonSense,
        rhs: f64,
    ) -> Self {
        Self {
            label,
            terms,
            sense,
            rhs,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn terms(&self) -> &[(RawVarId, f64)] {
        &self.terms
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}

/// Immutable snapshot of a fully lowered linear program.
///
/// Everything here is indexed by raw column position: ordered column
/// bounds, constraint rows, and the single objective row (always a
/// minimization). Built once by `ProgramBuilder::build`; never mutated.
#[derive(Debug, Clone)]
pub struct Program {
    label: String,
    raw_bounds: Vec<Bounds>,
    rows: Vec<Row>,
    objective_terms: Vec<(RawVarId, f64)>,
    objective_constant: f64,
}

impl Program {
    pub(crate) fn new(
        label: String,
        raw_bounds: Vec<Bounds>,
        rows: Vec<Row>,
        objective_terms: Vec<(RawVarId, f64)>,
        objective_constant: f64,
    ) -> Self {
        Self {
            label,
            raw_bounds,
            rows,
            objective_terms,
            objective_constant,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn num_raw_variables(&self) -> usize {
        self.raw_bounds.len()
    }

    pub fn raw_bounds(&self) -> &[Bounds] {
        &self.raw_bounds
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Objective terms over raw columns, to be minimized.
    pub fn objective_terms(&self) -> &[(RawVarId, f64)] {
        &self.objective_terms
    }

    /// Constant part of the objective, carried for reporting only.
    pub fn objective_constant(&self) -> f64 {
        self.objective_constant
    }
}

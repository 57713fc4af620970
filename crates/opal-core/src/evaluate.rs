//! Evaluation of high-level variables against a solved column vector.

use crate::error::ModelError;
use crate::pool::VariablePool;
use crate::vars::Definition;
use opal_expr::ids::{RawVarId, VarId};
use opal_expr::LinearExpr;

/// The solved values of every raw column, indexed by column position.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedValues {
    values: Vec<f64>,
}

impl SolvedValues {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, raw: RawVarId) -> Option<f64> {
        self.values.get(raw.inner() as usize).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for SolvedValues {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Compute the value of any high-level variable from solved raw columns.
///
/// Recursively unwinds the variable's defining expression down to raw
/// columns. No caching: the variable graph is shallow and acyclic by
/// construction, and the walk holds no state, so repeated evaluation of
/// the same variable is bit-identical.
///
/// A variable or column outside the model (e.g. from a different pool) is
/// a hard `UnknownVariable` error, never a silent default.
pub fn evaluate(pool: &VariablePool, id: VarId, values: &SolvedValues) -> Result<f64, ModelError> {
    let var = pool.get(id)?;
    match var.definition() {
        Definition::Column(raw) => values
            .get(raw)
            .ok_or(ModelError::UnknownVariable { index: raw.inner() }),
        Definition::Expression(expr) => evaluate_expr(pool, expr, values),
    }
}

/// Evaluate a bare expression over high-level variables.
pub fn evaluate_expr(
    pool: &VariablePool,
    expr: &LinearExpr,
    values: &SolvedValues,
) -> Result<f64, ModelError> {
    let mut total = expr.constant();
    for (var, coeff) in expr.terms() {
        total += coeff * evaluate(pool, *var, values)?;
    }
    Ok(total)
}

//! Program assembly: objective, constraints, and lowering to raw rows.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::ModelError;
use crate::generate::{ensure_finite_expr, Generated, PendingConstraint};
use crate::pool::VariablePool;
use crate::program::{Program, Row};
use crate::types::ObjectiveTerm;
use crate::vars::Definition;
use opal_expr::ids::{ConstraintId, RawVarId};
use opal_expr::{ConstraintExpr, LinearExpr};

/// Accumulates a program: variables (via its pool), top-level constraints,
/// and the objective, then lowers everything into a flat [`Program`].
///
/// Generator output enters the program only through [`register`], so every
/// constraint append is visible at its call site.
///
/// [`register`]: ProgramBuilder::register
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    label: String,
    pool: VariablePool,
    constraints: Vec<PendingConstraint>,
    objective: Option<LinearExpr>,
    artificial_terms: Vec<ObjectiveTerm>,
}

impl ProgramBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pool: VariablePool::new(),
            constraints: Vec::new(),
            objective: None,
            artificial_terms: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pool(&self) -> &VariablePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut VariablePool {
        &mut self.pool
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Adopt a generator's output: append its constraints and artificial
    /// objective terms, hand back its variables.
    pub fn register<T>(&mut self, generated: Generated<T>) -> T {
        tracing::trace!(
            component = "builder",
            operation = "register",
            status = "success",
            constraints = generated.constraints.len(),
            objective_terms = generated.objective_terms.len(),
            "Registered generator output"
        );
        self.constraints.extend(generated.constraints);
        self.artificial_terms.extend(generated.objective_terms);
        generated.vars
    }

    /// Add a top-level labeled constraint.
    pub fn add_constraint(
        &mut self,
        label: impl Into<String>,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        ensure_finite_expr(constraint.expr())?;
        if !constraint.rhs().is_finite() {
            return Err(ModelError::NonFiniteValue {
                value: constraint.rhs(),
            });
        }
        self.pool.ensure_expr_registered(constraint.expr())?;

        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints
            .push(PendingConstraint::new(label, constraint));
        Ok(id)
    }

    /// Set the objective expression, to be minimized.
    ///
    /// Callers express maximization by negating coefficients. Setting an
    /// objective twice is an error.
    pub fn set_objective(&mut self, expr: LinearExpr) -> Result<(), ModelError> {
        if self.objective.is_some() {
            return Err(ModelError::ObjectiveAlreadySet);
        }
        ensure_finite_expr(&expr)?;
        self.pool.ensure_expr_registered(&expr)?;
        self.objective = Some(expr);
        Ok(())
    }

    /// Lower everything into an immutable flat program.
    ///
    /// Fails with `MissingObjective` when no objective was set. Every
    /// high-level expression is substituted down to raw columns in a
    /// single ascending pass over the pool: each variable's expression
    /// only references earlier variables, so substitution is one table
    /// lookup per term.
    pub fn build(self) -> Result<Program, ModelError> {
        let started = Instant::now();
        let objective = self.objective.ok_or(ModelError::MissingObjective)?;

        let table = raw_forms(&self.pool);

        let (mut objective_terms, mut objective_constant) = flatten(&table, &objective);
        for term in &self.artificial_terms {
            let (raw_terms, raw_constant) = &table[term.var.inner() as usize];
            for (raw, coeff) in raw_terms {
                merge_term(&mut objective_terms, *raw, coeff * term.weight);
            }
            objective_constant += raw_constant * term.weight;
        }
        objective_terms.retain(|(_, c)| *c != 0.0);

        let mut rows = Vec::with_capacity(self.constraints.len());
        for pending in self.constraints {
            let (expr, sense, rhs) = pending.constraint.into_parts();
            let (terms, constant) = flatten(&table, &expr);
            // Substituted constants migrate to the right-hand side.
            rows.push(Row::new(pending.label, terms, sense, rhs - constant));
        }

        let program = Program::new(
            self.label,
            self.pool.raw_bounds().to_vec(),
            rows,
            objective_terms,
            objective_constant,
        );
        tracing::debug!(
            component = "builder",
            operation = "build",
            status = "success",
            label = %program.label(),
            raw_variables = program.num_raw_variables(),
            rows = program.num_rows(),
            objective_terms = program.objective_terms().len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Lowered program"
        );
        Ok(program)
    }
}

type RawForm = (Vec<(RawVarId, f64)>, f64);

/// Raw-column form of every pool variable, computed bottom-up.
fn raw_forms(pool: &VariablePool) -> Vec<RawForm> {
    let mut table: Vec<RawForm> = Vec::with_capacity(pool.num_variables());
    for var in pool.vars() {
        let form = match var.definition() {
            Definition::Column(raw) => (vec![(raw, 1.0)], 0.0),
            Definition::Expression(expr) => {
                let mut merged: BTreeMap<RawVarId, f64> = BTreeMap::new();
                let mut constant = expr.constant();
                for (sub, coeff) in expr.terms() {
                    let (sub_terms, sub_constant) = &table[sub.inner() as usize];
                    for (raw, raw_coeff) in sub_terms {
                        *merged.entry(*raw).or_insert(0.0) += coeff * raw_coeff;
                    }
                    constant += coeff * sub_constant;
                }
                (
                    merged.into_iter().filter(|(_, c)| *c != 0.0).collect(),
                    constant,
                )
            }
        };
        table.push(form);
    }
    table
}

/// Flatten an expression to raw columns using the precomputed table.
fn flatten(table: &[RawForm], expr: &LinearExpr) -> RawForm {
    let mut merged: BTreeMap<RawVarId, f64> = BTreeMap::new();
    let mut constant = expr.constant();
    for (var, coeff) in expr.terms() {
        let (sub_terms, sub_constant) = &table[var.inner() as usize];
        for (raw, raw_coeff) in sub_terms {
            *merged.entry(*raw).or_insert(0.0) += coeff * raw_coeff;
        }
        constant += coeff * sub_constant;
    }
    (
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect(),
        constant,
    )
}

fn merge_term(terms: &mut Vec<(RawVarId, f64)>, raw: RawVarId, coeff: f64) {
    match terms.binary_search_by_key(&raw, |(r, _)| *r) {
        Ok(pos) => terms[pos].1 += coeff,
        Err(pos) => terms.insert(pos, (raw, coeff)),
    }
}

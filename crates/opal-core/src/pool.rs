//! Append-only registry of raw columns and high-level variables.

use crate::error::ModelError;
use crate::types::{Bounds, Interval};
use crate::vars::{Definition, HighLevelVar, MinMaxKind};
use opal_expr::ids::{RawVarId, VarId};

/// Registry of every variable in one modeling session.
///
/// Raw columns and high-level variables live in growable arenas referenced
/// by integer id. Ids are assigned in insertion order and never reused;
/// nothing is ever removed. A variable's defining expression may only
/// reference variables registered strictly before it, which makes the
/// variable graph acyclic by construction.
#[derive(Debug, Clone, Default)]
pub struct VariablePool {
    raw_bounds: Vec<Bounds>,
    vars: Vec<HighLevelVar>,
    names: Vec<String>,
}

impl VariablePool {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_column(&mut self, bounds: Bounds) -> RawVarId {
        let raw = RawVarId::new(self.raw_bounds.len() as u32);
        self.raw_bounds.push(bounds);
        raw
    }

    fn push_var(&mut self, name: String, var: HighLevelVar) -> VarId {
        let id = VarId::new(self.vars.len() as u32);
        tracing::trace!(
            component = "pool",
            operation = "add_variable",
            status = "success",
            var_id = id.inner(),
            kind = var.kind_str(),
            name = %name,
            "Registered variable"
        );
        self.vars.push(var);
        self.names.push(name);
        id
    }

    /// Add an unbounded raw variable.
    pub fn add_raw_variable(&mut self, name: impl Into<String>) -> VarId {
        let raw = self.push_column(Bounds::free());
        self.push_var(name.into(), HighLevelVar::Raw { raw })
    }

    /// Add a raw variable with a closed or half-open range.
    ///
    /// The range is validated immediately; a NaN bound or an inverted
    /// range never enters the pool.
    pub fn add_constrained_raw_variable(
        &mut self,
        name: impl Into<String>,
        bounds: Bounds,
    ) -> Result<VarId, ModelError> {
        if !bounds.is_valid() {
            return Err(ModelError::InvalidRange {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        let raw = self.push_column(bounds);
        Ok(self.push_var(name.into(), HighLevelVar::Raw { raw }))
    }

    /// Register a pre-built super variable.
    ///
    /// Column-backed variants must reference an existing column;
    /// expression-backed variants may only reference variables already in
    /// the pool.
    pub fn add_super_var(
        &mut self,
        name: impl Into<String>,
        var: HighLevelVar,
    ) -> Result<VarId, ModelError> {
        match var.definition() {
            Definition::Column(raw) => {
                if raw.inner() as usize >= self.raw_bounds.len() {
                    return Err(ModelError::UnknownVariable { index: raw.inner() });
                }
            }
            Definition::Expression(expr) => {
                if !expr.is_finite() {
                    return Err(ModelError::NonFiniteValue {
                        value: expr.constant(),
                    });
                }
                if let Some(max_ref) = var.max_referenced_var() {
                    if max_ref.inner() as usize >= self.vars.len() {
                        return Err(ModelError::UnknownVariable {
                            index: max_ref.inner(),
                        });
                    }
                }
            }
        }
        Ok(self.push_var(name.into(), var))
    }

    /// Allocate the column behind an epigraph min/max variable.
    pub(crate) fn add_minmax_variable(
        &mut self,
        name: impl Into<String>,
        kind: MinMaxKind,
    ) -> VarId {
        let raw = self.push_column(Bounds::free());
        self.push_var(name.into(), HighLevelVar::MinMax { kind, raw })
    }

    /// Allocate one piecewise segment column, bounded to the interval width.
    pub(crate) fn add_segment_variable(
        &mut self,
        name: impl Into<String>,
        interval: Interval,
    ) -> VarId {
        let raw = self.push_column(Bounds::new(0.0, interval.width()));
        self.push_var(name.into(), HighLevelVar::Segment { interval, raw })
    }

    pub fn num_raw_variables(&self) -> usize {
        self.raw_bounds.len()
    }

    pub fn num_variables(&self) -> usize {
        self.vars.len()
    }

    pub fn get(&self, id: VarId) -> Result<&HighLevelVar, ModelError> {
        self.vars
            .get(id.inner() as usize)
            .ok_or(ModelError::UnknownVariable { index: id.inner() })
    }

    pub fn name(&self, id: VarId) -> Option<&str> {
        self.names.get(id.inner() as usize).map(String::as_str)
    }

    pub fn raw_bounds(&self) -> &[Bounds] {
        &self.raw_bounds
    }

    pub(crate) fn vars(&self) -> &[HighLevelVar] {
        &self.vars
    }

    pub fn raw_bound(&self, raw: RawVarId) -> Option<Bounds> {
        self.raw_bounds.get(raw.inner() as usize).copied()
    }

    /// Check that every variable an expression references exists already.
    pub(crate) fn ensure_expr_registered(
        &self,
        expr: &opal_expr::LinearExpr,
    ) -> Result<(), ModelError> {
        if let Some((max_ref, _)) = expr.terms().last() {
            if max_ref.inner() as usize >= self.vars.len() {
                return Err(ModelError::UnknownVariable {
                    index: max_ref.inner(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::VariablePool;
    use crate::error::ModelError;
    use crate::types::{Bounds, Interval};
    use crate::vars::{HighLevelVar, MinMaxKind};
    use opal_expr::ids::{RawVarId, VarId};
    use opal_expr::LinearExpr;

    #[test]
    fn new_pool_is_empty() {
        let pool = VariablePool::new();
        assert_eq!(pool.num_raw_variables(), 0);
        assert_eq!(pool.num_variables(), 0);
    }

    #[test]
    fn raw_variable_gets_free_bounds() {
        let mut pool = VariablePool::new();
        let x = pool.add_raw_variable("x");
        assert_eq!(x.inner(), 0);
        assert_eq!(pool.num_raw_variables(), 1);
        assert!(pool.raw_bounds()[0].lower.is_infinite());
        assert_eq!(pool.name(x), Some("x"));
    }

    #[test]
    fn constrained_raw_variable_keeps_bounds() {
        let mut pool = VariablePool::new();
        let x = pool
            .add_constrained_raw_variable("x", Bounds::new(0.0, 10.0))
            .unwrap();
        let var = pool.get(x).unwrap();
        assert!(matches!(var, HighLevelVar::Raw { .. }));
        assert_eq!(pool.raw_bounds()[0], Bounds::new(0.0, 10.0));
    }

    #[test]
    fn inverted_range_is_rejected_immediately() {
        let mut pool = VariablePool::new();
        let result = pool.add_constrained_raw_variable("x", Bounds::new(5.0, 1.0));
        assert_eq!(
            result,
            Err(ModelError::InvalidRange {
                lower: 5.0,
                upper: 1.0
            })
        );
        assert_eq!(pool.num_raw_variables(), 0);
    }

    #[test]
    fn nan_bound_is_rejected() {
        let mut pool = VariablePool::new();
        let result = pool.add_constrained_raw_variable("x", Bounds::new(f64::NAN, 1.0));
        assert!(matches!(result, Err(ModelError::InvalidRange { .. })));
    }

    #[test]
    fn ids_are_assigned_in_insertion_order() {
        let mut pool = VariablePool::new();
        let a = pool.add_raw_variable("a");
        let b = pool.add_raw_variable("b");
        let c = pool
            .add_super_var(
                "c",
                HighLevelVar::General {
                    expr: LinearExpr::var(a).add(&LinearExpr::var(b)),
                },
            )
            .unwrap();
        assert_eq!((a.inner(), b.inner(), c.inner()), (0, 1, 2));
        // Only a and b are solver columns.
        assert_eq!(pool.num_raw_variables(), 2);
        assert_eq!(pool.num_variables(), 3);
    }

    #[test]
    fn super_var_may_not_reference_future_variables() {
        let mut pool = VariablePool::new();
        let result = pool.add_super_var(
            "dangling",
            HighLevelVar::General {
                expr: LinearExpr::var(VarId::new(5)),
            },
        );
        assert_eq!(result, Err(ModelError::UnknownVariable { index: 5 }));
    }

    #[test]
    fn column_backed_super_var_needs_existing_column() {
        let mut pool = VariablePool::new();
        let result = pool.add_super_var(
            "alias",
            HighLevelVar::Raw {
                raw: RawVarId::new(0),
            },
        );
        assert_eq!(result, Err(ModelError::UnknownVariable { index: 0 }));
    }

    #[test]
    fn segment_variable_is_bounded_by_interval_width() {
        let mut pool = VariablePool::new();
        let seg = pool.add_segment_variable("seg0", Interval::new(0.25, 0.75));
        let var = pool.get(seg).unwrap();
        let raw = var.column().unwrap();
        assert_eq!(pool.raw_bound(raw), Some(Bounds::new(0.0, 0.5)));
    }

    #[test]
    fn minmax_variable_is_unbounded() {
        let mut pool = VariablePool::new();
        let m = pool.add_minmax_variable("m", MinMaxKind::Max);
        let raw = pool.get(m).unwrap().column().unwrap();
        assert!(pool.raw_bound(raw).unwrap().lower.is_infinite());
    }
}

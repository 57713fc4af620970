//! The high-level variable variant set.
//!
//! Every variable in a model is one of these variants. Column-backed
//! variants (`Raw`, `MinMax`, `Segment`) map directly to a solver column;
//! expression-backed variants (`General`, `AbsComponent`) are defined by a
//! linear expression over strictly earlier variables. Together they form a
//! DAG rooted at solver columns.

use crate::types::Interval;
use opal_expr::ids::{RawVarId, VarId};
use opal_expr::LinearExpr;

/// Which component of an absolute-value decomposition a variable plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsRole {
    Signed,
    PositivePart,
    NegativePart,
    AbsoluteValue,
}

impl AbsRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AbsRole::Signed => "signed",
            AbsRole::PositivePart => "positive_part",
            AbsRole::NegativePart => "negative_part",
            AbsRole::AbsoluteValue => "absolute_value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinMaxKind {
    Min,
    Max,
}

impl MinMaxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MinMaxKind::Min => "min",
            MinMaxKind::Max => "max",
        }
    }
}

/// A high-level variable: raw solver column or composite super-variable.
#[derive(Debug, Clone, PartialEq)]
pub enum HighLevelVar {
    /// An atomic decision variable; the solver sees exactly these.
    Raw { raw: RawVarId },
    /// A named wrapper around an arbitrary expression, no extra machinery.
    General { expr: LinearExpr },
    /// One component of an absolute-value decomposition.
    AbsComponent { role: AbsRole, expr: LinearExpr },
    /// An epigraph variable bounding two expressions, backed by its own column.
    MinMax { kind: MinMaxKind, raw: RawVarId },
    /// One piecewise segment column, bounded to its sub-interval width.
    Segment { interval: Interval, raw: RawVarId },
}

/// How a variable is defined: directly by a solver column, or by an
/// expression over earlier variables.
#[derive(Debug, Clone, Copy)]
pub enum Definition<'a> {
    Column(RawVarId),
    Expression(&'a LinearExpr),
}

impl HighLevelVar {
    pub fn definition(&self) -> Definition<'_> {
        match self {
            HighLevelVar::Raw { raw }
            | HighLevelVar::MinMax { raw, .. }
            | HighLevelVar::Segment { raw, .. } => Definition::Column(*raw),
            HighLevelVar::General { expr } | HighLevelVar::AbsComponent { expr, .. } => {
                Definition::Expression(expr)
            }
        }
    }

    /// Variant name for logging.
    pub fn kind_str(&self) -> &'static str {
        match self {
            HighLevelVar::Raw { .. } => "raw",
            HighLevelVar::General { .. } => "general",
            HighLevelVar::AbsComponent { .. } => "abs_component",
            HighLevelVar::MinMax { .. } => "min_max",
            HighLevelVar::Segment { .. } => "segment",
        }
    }

    /// Largest variable id referenced by the defining expression, if any.
    pub(crate) fn max_referenced_var(&self) -> Option<VarId> {
        match self.definition() {
            Definition::Column(_) => None,
            // Terms are ordered ascending, so the last one is the maximum.
            Definition::Expression(expr) => expr.terms().last().map(|(v, _)| *v),
        }
    }

    /// Raw column index for column-backed variants.
    pub(crate) fn column(&self) -> Option<RawVarId> {
        match self.definition() {
            Definition::Column(raw) => Some(raw),
            Definition::Expression(_) => None,
        }
    }
}

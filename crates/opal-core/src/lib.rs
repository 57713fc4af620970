//! High-level LP modeling core.
//!
//! Callers express an optimization problem with composable high-level
//! variables (linear combinations, absolute values, min/max, piecewise
//! approximations of nonlinear functions); this crate lowers all of it
//! into a flat linear program for a conventional LP solver, and evaluates
//! solved values of any high-level variable from the solver's raw output.
//!
//! # Module Organization
//!
//! - [`types`]: bounds, intervals, objective terms
//! - [`vars`]: the high-level variable variant set
//! - [`pool`]: the append-only variable registry
//! - [`generate`]: absolute-value, min/max, and piecewise generators
//! - [`builder`]: program assembly and lowering
//! - [`program`]: the immutable flat program
//! - [`evaluate`]: solved-value evaluation
//! - [`error`]: the modeling error taxonomy

pub mod builder;
pub mod error;
pub mod evaluate;
pub mod generate;
pub mod pool;
pub mod program;
pub mod types;
pub mod vars;

// The expression vocabulary is re-exported so that modeling callers can
// depend on this crate alone.
pub use opal_expr::{ComparisonSense, ConstraintExpr, ExprError, LinearExpr};
pub use opal_expr::{ConstraintId, RawVarId, VarId};

pub use builder::ProgramBuilder;
pub use error::ModelError;
pub use evaluate::{evaluate, evaluate_expr, SolvedValues};
pub use generate::{
    generate_absolute_value, generate_linear_approximation, generate_max, generate_min,
    geometric_partition, AbsPolicy, AbsoluteValueVars, ApproximatedFunction, ApproximationTarget,
    ArtificialTermPolicy, Generated, LinearApproximationVars, PartitionSpec, PendingConstraint,
};
pub use pool::VariablePool;
pub use program::{Program, Row};
pub use types::{Bounds, Interval, ObjectiveTerm};
pub use vars::{AbsRole, Definition, HighLevelVar, MinMaxKind};

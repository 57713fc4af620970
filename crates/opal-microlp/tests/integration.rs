#![allow(clippy::float_cmp)]

use opal_core::{
    evaluate, generate_absolute_value, generate_linear_approximation, generate_max, generate_min,
    AbsPolicy, ApproximatedFunction, ApproximationTarget, ArtificialTermPolicy, Bounds, LinearExpr,
    PartitionSpec, ProgramBuilder, SolvedValues, VariablePool,
};
use opal_microlp::MicrolpOptimizer;
use opal_solver::{LinearOptimizer, OptimizationResult, SolverConfig};

const TOLERANCE: f64 = 1e-8;

/// Solve a finished builder, keeping the pool around for evaluation.
fn minimize(builder: ProgramBuilder) -> (VariablePool, SolvedValues) {
    let pool = builder.pool().clone();
    let program = builder.build().expect("program must build");
    let outcome = MicrolpOptimizer::new()
        .minimize(&program, &SolverConfig::new())
        .expect("solve must not fail");
    let solution = outcome.into_solution().expect("program must be feasible");
    (pool, solution.into_solved_values())
}

/// Minimizing |x| with x pinned to -3: the parts reconstruct the signed
/// and absolute values exactly, and at least one part sits at zero.
#[test]
fn absolute_value_round_trips_through_a_solve() {
    let mut builder = ProgramBuilder::new("abs_roundtrip");
    let x = builder
        .pool_mut()
        .add_constrained_raw_variable("x", Bounds::new(-10.0, 10.0))
        .unwrap();
    let generated = generate_absolute_value(
        builder.pool_mut(),
        "dev",
        LinearExpr::var(x),
        AbsPolicy::AlwaysAllocate,
    )
    .unwrap();
    let vars = builder.register(generated);
    builder
        .add_constraint("pin_x", LinearExpr::var(x).eq_scalar(-3.0))
        .unwrap();
    builder
        .set_objective(LinearExpr::var(vars.absolute_value))
        .unwrap();

    let (pool, values) = minimize(builder);
    let signed = evaluate(&pool, vars.signed, &values).unwrap();
    let positive = evaluate(&pool, vars.positive_part, &values).unwrap();
    let negative = evaluate(&pool, vars.negative_part, &values).unwrap();
    let absolute = evaluate(&pool, vars.absolute_value, &values).unwrap();

    assert!((signed - (positive - negative)).abs() < TOLERANCE);
    assert!((absolute - (positive + negative)).abs() < TOLERANCE);
    assert!((signed + 3.0).abs() < TOLERANCE, "signed = {signed}");
    assert!((absolute - 3.0).abs() < TOLERANCE, "absolute = {absolute}");
    assert!(
        positive.min(negative) < TOLERANCE,
        "one part must be zero at the optimum, got positive={positive} negative={negative}"
    );
}

/// Minimizing max(x, y) subject to x + y = 1 lands exactly on x = y = 0.5
/// without any artificial term: the objective itself pushes the epigraph
/// variable tight.
#[test]
fn directly_minimized_max_is_tight() {
    let mut builder = ProgramBuilder::new("minimax");
    let x = builder
        .pool_mut()
        .add_constrained_raw_variable("x", Bounds::new(0.0, 1.0))
        .unwrap();
    let y = builder
        .pool_mut()
        .add_constrained_raw_variable("y", Bounds::new(0.0, 1.0))
        .unwrap();
    let generated = generate_max(
        builder.pool_mut(),
        "peak",
        LinearExpr::var(x),
        LinearExpr::var(y),
        ArtificialTermPolicy::None,
    )
    .unwrap();
    let peak = builder.register(generated);
    builder
        .add_constraint(
            "sum",
            LinearExpr::var(x).add(&LinearExpr::var(y)).eq_scalar(1.0),
        )
        .unwrap();
    builder.set_objective(LinearExpr::var(peak)).unwrap();

    let (pool, values) = minimize(builder);
    assert!((evaluate(&pool, x, &values).unwrap() - 0.5).abs() < TOLERANCE);
    assert!((evaluate(&pool, y, &values).unwrap() - 0.5).abs() < TOLERANCE);
    assert!((evaluate(&pool, peak, &values).unwrap() - 0.5).abs() < TOLERANCE);
}

/// Minimizing max(3x + 7, y + 8) subject to x + y = 1 yields 8.5 at
/// x = y = 0.5, regardless of the order the arguments are passed in.
#[test]
fn max_with_constant_offsets_is_order_independent() {
    for flipped in [false, true] {
        let mut builder = ProgramBuilder::new("offset_max");
        let x = builder
            .pool_mut()
            .add_constrained_raw_variable("x", Bounds::new(0.0, 1.0))
            .unwrap();
        let y = builder
            .pool_mut()
            .add_constrained_raw_variable("y", Bounds::new(0.0, 1.0))
            .unwrap();
        let left = LinearExpr::term(x, 3.0).add_constant(7.0);
        let right = LinearExpr::var(y).add_constant(8.0);
        let (first, second) = if flipped { (right, left) } else { (left, right) };
        let generated = generate_max(
            builder.pool_mut(),
            "peak",
            first,
            second,
            ArtificialTermPolicy::None,
        )
        .unwrap();
        let peak = builder.register(generated);
        builder
            .add_constraint(
                "sum",
                LinearExpr::var(x).add(&LinearExpr::var(y)).eq_scalar(1.0),
            )
            .unwrap();
        builder.set_objective(LinearExpr::var(peak)).unwrap();

        let (pool, values) = minimize(builder);
        let solved_max = evaluate(&pool, peak, &values).unwrap();
        assert!(
            (solved_max - 8.5).abs() < TOLERANCE,
            "flipped={flipped}: max = {solved_max}"
        );
        assert!((evaluate(&pool, x, &values).unwrap() - 0.5).abs() < TOLERANCE);
        assert!((evaluate(&pool, y, &values).unwrap() - 0.5).abs() < TOLERANCE);
    }
}

/// Solve one approximation program with the domain value pinned to `at`,
/// returning the solved approximated value.
fn solve_square_approximation_at(at: f64) -> f64 {
    let mut builder = ProgramBuilder::new("square_approx");
    let generated = generate_linear_approximation(
        builder.pool_mut(),
        "sq",
        Bounds::new(0.0, 2.0),
        &ApproximatedFunction::Square,
        &PartitionSpec::new(0.5, 1.0),
        ApproximationTarget::NewVariable,
    )
    .unwrap();
    let vars = builder.register(generated);
    builder
        .add_constraint("pin", LinearExpr::var(vars.linear_part).eq_scalar(at))
        .unwrap();
    builder
        .set_objective(LinearExpr::var(vars.approximated_part))
        .unwrap();

    let (pool, values) = minimize(builder);
    let linear = evaluate(&pool, vars.linear_part, &values).unwrap();
    assert!((linear - at).abs() < TOLERANCE, "linear part = {linear}");
    evaluate(&pool, vars.approximated_part, &values).unwrap()
}

/// At every breakpoint the approximation equals the function exactly;
/// only interior points carry interpolation error.
#[test]
fn approximated_square_is_exact_at_breakpoints() {
    for breakpoint in [0.0, 0.5, 1.0, 1.5, 2.0] {
        let approx = solve_square_approximation_at(breakpoint);
        assert!(
            (approx - breakpoint * breakpoint).abs() < TOLERANCE,
            "approx({breakpoint}) = {approx}"
        );
    }
}

/// The approximated value is strictly increasing in the reconstructed
/// domain value, sampled across segment boundaries and midpoints.
#[test]
fn approximated_square_increases_with_the_domain_value() {
    let samples = [0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];
    let mut previous = f64::NEG_INFINITY;
    for at in samples {
        let approx = solve_square_approximation_at(at);
        assert!(
            approx > previous,
            "approximation must increase: approx({at}) = {approx}, previous = {previous}"
        );
        previous = approx;
    }
}

/// Approximating the square of an existing variable ties the variable to
/// the segment sum with an explicit equality constraint.
#[test]
fn existing_variable_is_tied_to_the_segment_sum() {
    let mut builder = ProgramBuilder::new("existing_square");
    let x = builder
        .pool_mut()
        .add_constrained_raw_variable("x", Bounds::new(0.0, 2.0))
        .unwrap();
    let generated = generate_linear_approximation(
        builder.pool_mut(),
        "sq",
        Bounds::new(0.0, 2.0),
        &ApproximatedFunction::Square,
        &PartitionSpec::new(0.5, 1.0),
        ApproximationTarget::ExistingVariable(x),
    )
    .unwrap();
    let vars = builder.register(generated);
    builder
        .add_constraint("pin_x", LinearExpr::var(x).eq_scalar(1.5))
        .unwrap();
    builder
        .set_objective(LinearExpr::var(vars.approximated_part))
        .unwrap();

    let (pool, values) = minimize(builder);
    assert!((evaluate(&pool, vars.linear_part, &values).unwrap() - 1.5).abs() < TOLERANCE);
    let approx = evaluate(&pool, vars.approximated_part, &values).unwrap();
    assert!((approx - 2.25).abs() < TOLERANCE, "approx = {approx}");
}

/// An artificial term tightens a max variable nothing else references:
/// the objective only cares about x, yet the max still lands on its true
/// value.
#[test]
fn artificial_term_tightens_an_unreferenced_max() {
    let mut builder = ProgramBuilder::new("artificial_max");
    let x = builder
        .pool_mut()
        .add_constrained_raw_variable("x", Bounds::new(1.0, 3.0))
        .unwrap();
    let y = builder
        .pool_mut()
        .add_constrained_raw_variable("y", Bounds::fixed(2.0))
        .unwrap();
    let generated = generate_max(
        builder.pool_mut(),
        "peak",
        LinearExpr::var(x),
        LinearExpr::var(y),
        ArtificialTermPolicy::Weighted(1e-4),
    )
    .unwrap();
    let peak = builder.register(generated);
    builder.set_objective(LinearExpr::var(x)).unwrap();

    let (pool, values) = minimize(builder);
    assert!((evaluate(&pool, x, &values).unwrap() - 1.0).abs() < TOLERANCE);
    // max(1, 2) = 2, held tight purely by the artificial weight.
    let solved_peak = evaluate(&pool, peak, &values).unwrap();
    assert!((solved_peak - 2.0).abs() < 1e-6, "peak = {solved_peak}");
}

/// The documented non-guarantee: an artificial min cannot force a value
/// the real objective resists. `floor` is meant to hold b up at
/// min(a, 10) = 4, but paying the tiny artificial cost and leaving the
/// auxiliary loose is cheaper than raising b, so the LP does exactly
/// that.
#[test]
fn artificial_minmax_cannot_override_objective_pressure() {
    let mut builder = ProgramBuilder::new("selling_order");
    let a = builder
        .pool_mut()
        .add_constrained_raw_variable("a", Bounds::fixed(4.0))
        .unwrap();
    let b = builder
        .pool_mut()
        .add_constrained_raw_variable("b", Bounds::new(0.0, 10.0))
        .unwrap();
    let generated = generate_min(
        builder.pool_mut(),
        "floor",
        LinearExpr::var(a),
        LinearExpr::from_constant(10.0),
        ArtificialTermPolicy::Weighted(1e-4),
    )
    .unwrap();
    let floor = builder.register(generated);
    builder
        .add_constraint(
            "b_at_least_floor",
            LinearExpr::var(b).ge_expr(&LinearExpr::var(floor)),
        )
        .unwrap();
    builder.set_objective(LinearExpr::var(b)).unwrap();

    let (pool, values) = minimize(builder);
    let solved_floor = evaluate(&pool, floor, &values).unwrap();
    let solved_b = evaluate(&pool, b, &values).unwrap();

    // The trick does NOT hold: b stays at zero and the auxiliary sags
    // far below the true min.
    assert!(solved_b < TOLERANCE, "b = {solved_b}");
    assert!(
        solved_floor < 4.0 - 1e-6,
        "auxiliary unexpectedly tight: floor = {solved_floor}"
    );
}

/// Evaluating the same variable twice against one solved vector is
/// bit-identical.
#[test]
fn evaluation_is_deterministic_after_a_solve() {
    let mut builder = ProgramBuilder::new("determinism");
    let x = builder
        .pool_mut()
        .add_constrained_raw_variable("x", Bounds::new(0.0, 1.0))
        .unwrap();
    let generated = generate_absolute_value(
        builder.pool_mut(),
        "dev",
        LinearExpr::term(x, 3.0).add_constant(-0.7),
        AbsPolicy::AlwaysAllocate,
    )
    .unwrap();
    let vars = builder.register(generated);
    builder
        .set_objective(LinearExpr::var(vars.absolute_value))
        .unwrap();

    let (pool, values) = minimize(builder);
    let first = evaluate(&pool, vars.absolute_value, &values).unwrap();
    let second = evaluate(&pool, vars.absolute_value, &values).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

/// Contradictory constraints surface as an infeasible outcome, and the
/// solution accessors refuse to hand anything back.
#[test]
fn contradictory_constraints_report_infeasible() {
    let mut builder = ProgramBuilder::new("contradiction");
    let x = builder.pool_mut().add_raw_variable("x");
    builder
        .add_constraint("at_least", LinearExpr::var(x).ge_scalar(5.0))
        .unwrap();
    builder
        .add_constraint("at_most", LinearExpr::var(x).le_scalar(2.0))
        .unwrap();
    builder.set_objective(LinearExpr::var(x)).unwrap();
    let program = builder.build().unwrap();

    let outcome = MicrolpOptimizer::new()
        .minimize(&program, &SolverConfig::new())
        .expect("infeasibility is an outcome, not a solve error");
    assert_eq!(outcome, OptimizationResult::Infeasible);

    let err = outcome.solution().unwrap_err();
    assert_eq!(err.code(), "SOLVER_INFEASIBLE");
    let err = outcome.into_solution().unwrap_err();
    assert_eq!(err.code(), "SOLVER_INFEASIBLE");
}

//! Geometric sub-interval partitions.

use crate::error::ModelError;
use crate::types::{Bounds, Interval};

/// Instructions for partitioning a domain into geometrically growing steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionSpec {
    /// Width of the first segment.
    pub initial_step: f64,
    /// Factor applied to the width of each subsequent segment.
    pub step_multiplier: f64,
    /// Assert that the partitioned domain starts at exactly zero.
    pub start_at_zero: bool,
    /// Keep multiplying the step until the domain is exhausted. When
    /// false every segment keeps the initial width (a uniform grid).
    pub multiply_until_exhausted: bool,
}

impl PartitionSpec {
    pub fn new(initial_step: f64, step_multiplier: f64) -> Self {
        Self {
            initial_step,
            step_multiplier,
            start_at_zero: false,
            multiply_until_exhausted: true,
        }
    }

    pub fn with_start_at_zero(mut self) -> Self {
        self.start_at_zero = true;
        self
    }

    pub fn with_uniform_steps(mut self) -> Self {
        self.multiply_until_exhausted = false;
        self
    }
}

/// Partition `range` into contiguous sub-intervals whose widths grow by
/// `step_multiplier`, starting from `initial_step`.
///
/// The boundaries advance until the next one would reach or exceed the
/// upper bound; the final segment is then clipped to end exactly there.
/// The result is ordered, gap-free, and covers the range exactly.
pub fn geometric_partition(
    range: Bounds,
    spec: &PartitionSpec,
) -> Result<Vec<Interval>, ModelError> {
    if !range.is_valid() {
        return Err(ModelError::InvalidRange {
            lower: range.lower,
            upper: range.upper,
        });
    }
    if range.is_point() {
        return Err(ModelError::EmptyDomain {
            lower: range.lower,
            upper: range.upper,
        });
    }
    if !range.is_bounded() {
        return Err(ModelError::InvalidPartition {
            reason: "domain must be bounded on both sides".to_string(),
        });
    }
    if !spec.initial_step.is_finite() || spec.initial_step <= 0.0 {
        return Err(ModelError::InvalidPartition {
            reason: format!("initial step must be positive (got {})", spec.initial_step),
        });
    }
    if !spec.step_multiplier.is_finite() || spec.step_multiplier < 1.0 {
        return Err(ModelError::InvalidPartition {
            reason: format!(
                "step multiplier must be at least 1 (got {})",
                spec.step_multiplier
            ),
        });
    }
    if spec.start_at_zero && range.lower != 0.0 {
        return Err(ModelError::InvalidPartition {
            reason: format!(
                "partition is declared to start at zero but the domain starts at {}",
                range.lower
            ),
        });
    }

    let mut cuts = vec![range.lower];
    let mut width = spec.initial_step;
    loop {
        let next = cuts[cuts.len() - 1] + width;
        if next >= range.upper {
            break;
        }
        cuts.push(next);
        if spec.multiply_until_exhausted {
            width *= spec.step_multiplier;
        }
    }
    cuts.push(range.upper);

    Ok(cuts
        .windows(2)
        .map(|pair| Interval::new(pair[0], pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{geometric_partition, PartitionSpec};
    use crate::error::ModelError;
    use crate::types::Bounds;

    fn boundaries(range: Bounds, spec: &PartitionSpec) -> Vec<f64> {
        let intervals = geometric_partition(range, spec).unwrap();
        let mut cuts: Vec<f64> = intervals.iter().map(|iv| iv.lower).collect();
        cuts.push(intervals.last().unwrap().upper);
        cuts
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn geometric_boundaries_with_clipped_tail() {
        let cuts = boundaries(Bounds::new(0.0, 1.0), &PartitionSpec::new(0.01, 5.0));
        assert_close(&cuts, &[0.0, 0.01, 0.06, 0.31, 1.0]);
    }

    #[test]
    fn multiplier_one_gives_equal_widths() {
        let cuts = boundaries(Bounds::new(0.0, 1.0), &PartitionSpec::new(0.25, 1.0));
        assert_close(&cuts, &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn uniform_steps_flag_ignores_multiplier() {
        let spec = PartitionSpec::new(0.25, 5.0).with_uniform_steps();
        let cuts = boundaries(Bounds::new(0.0, 1.0), &spec);
        assert_close(&cuts, &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn oversized_initial_step_yields_single_segment() {
        let cuts = boundaries(Bounds::new(2.0, 3.0), &PartitionSpec::new(10.0, 2.0));
        assert_close(&cuts, &[2.0, 3.0]);
    }

    #[test]
    fn nonzero_lower_bound_offsets_all_boundaries() {
        let cuts = boundaries(Bounds::new(1.0, 2.0), &PartitionSpec::new(0.5, 2.0));
        assert_close(&cuts, &[1.0, 1.5, 2.0]);
    }

    #[test]
    fn intervals_are_contiguous_and_cover_the_range() {
        let intervals =
            geometric_partition(Bounds::new(0.0, 7.0), &PartitionSpec::new(0.3, 1.7)).unwrap();
        assert!((intervals[0].lower - 0.0).abs() < 1e-12);
        assert!((intervals.last().unwrap().upper - 7.0).abs() < 1e-12);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
            assert!(pair[0].width() > 0.0);
        }
    }

    #[test]
    fn empty_domain_is_rejected() {
        let result = geometric_partition(Bounds::fixed(1.0), &PartitionSpec::new(0.1, 2.0));
        assert!(matches!(result, Err(ModelError::EmptyDomain { .. })));
    }

    #[test]
    fn inverted_domain_is_rejected() {
        let result =
            geometric_partition(Bounds::new(2.0, 1.0), &PartitionSpec::new(0.1, 2.0));
        assert!(matches!(result, Err(ModelError::InvalidRange { .. })));
    }

    #[test]
    fn unbounded_domain_is_rejected() {
        let result = geometric_partition(
            Bounds::new(0.0, f64::INFINITY),
            &PartitionSpec::new(0.1, 2.0),
        );
        assert!(matches!(result, Err(ModelError::InvalidPartition { .. })));
    }

    #[test]
    fn bad_step_and_multiplier_are_rejected() {
        let range = Bounds::new(0.0, 1.0);
        assert!(matches!(
            geometric_partition(range, &PartitionSpec::new(0.0, 2.0)),
            Err(ModelError::InvalidPartition { .. })
        ));
        assert!(matches!(
            geometric_partition(range, &PartitionSpec::new(-0.1, 2.0)),
            Err(ModelError::InvalidPartition { .. })
        ));
        assert!(matches!(
            geometric_partition(range, &PartitionSpec::new(0.1, 0.5)),
            Err(ModelError::InvalidPartition { .. })
        ));
    }

    #[test]
    fn start_at_zero_requires_zero_lower_bound() {
        let spec = PartitionSpec::new(0.5, 2.0).with_start_at_zero();
        assert!(geometric_partition(Bounds::new(0.0, 2.0), &spec).is_ok());
        assert!(matches!(
            geometric_partition(Bounds::new(1.0, 2.0), &spec),
            Err(ModelError::InvalidPartition { .. })
        ));
    }
}

//! Tolerance-based assertions.

/// Assert that two floating-point values differ by at most `tolerance`.
///
/// ```rust
/// use legion_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(1.0_f32, 1.0001, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`: {}",
                left, right, diff, tolerance, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that two [`Site`](legion_geometry::Site)s agree on every axis
/// within `tolerance` millimetres.
///
/// ```rust
/// use legion_geometry::Site;
/// use legion_test_helpers::assert_site_approx_eq;
///
/// assert_site_approx_eq!(Site::new(1.0, 2.0, -3.0), Site::new(1.0, 2.0005, -3.0), 1e-3);
/// ```
#[macro_export]
macro_rules! assert_site_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left: $crate::__private::Site = $left;
        let right: $crate::__private::Site = $right;
        let tolerance: f32 = $tolerance;
        if !left.approx_eq(&right, tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{}`,\n right: `{}`,\n  tolerance: `{:?}`",
                left, right, tolerance
            );
        }
    };
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {
        let left: $crate::__private::Site = $left;
        let right: $crate::__private::Site = $right;
        let tolerance: f32 = $tolerance;
        if !left.approx_eq(&right, tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{}`,\n right: `{}`,\n  tolerance: `{:?}`: {}",
                left, right, tolerance, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that every value in a float sequence moves in one direction.
///
/// ```rust
/// use legion_test_helpers::assert_monotonic_toward;
///
/// assert_monotonic_toward!(&[0.0_f32, 1.0, 1.0, 3.0], 3.0);
/// ```
#[macro_export]
macro_rules! assert_monotonic_toward {
    ($values:expr, $target:expr $(,)?) => {
        let values = $values;
        let target = $target;
        let mut iter = values.iter();
        if let Some(mut prev) = iter.next() {
            for (i, curr) in iter.enumerate() {
                if (target - *curr).abs() > (target - *prev).abs() {
                    panic!(
                        "assertion failed: sequence moves away from {:?} at index {}: {:?} -> {:?}",
                        target,
                        i + 1,
                        prev,
                        curr
                    );
                }
                prev = curr;
            }
        }
    };
}

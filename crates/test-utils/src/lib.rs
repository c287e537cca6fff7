//! Test support for the capabilities workspace.
//!
//! Fixture lookup lives in [`paths`], reference values in [`fixtures`] and
//! synthetic documents in [`generators`]. The macros below cover optional
//! real-server documents and float comparisons of projected coordinates.

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Path of a capabilities document, or return early from the test.
///
/// Real server documents are dropped into `TEST_DATA_DIR` by hand and are
/// not part of the repository.
///
/// ```ignore
/// let path = require_test_file!("geo_admin_wms.xml");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Set TEST_DATA_DIR to a directory of capabilities documents.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Like [`require_test_file!`] for several documents; yields a `Vec<PathBuf>`.
#[macro_export]
macro_rules! require_test_files {
    ($($name:expr),+ $(,)?) => {{
        let mut paths = Vec::new();
        $(
            paths.push($crate::require_test_file!($name));
        )+
        paths
    }};
}

/// `|left - right| <= epsilon`, both sides widened to `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Compare an `(x, y)` pair coordinate by coordinate.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

/// Compare a resolved `[min_x, min_y, max_x, max_y]` extent with one of the
/// 4-tuples in [`fixtures::bbox`].
///
/// ```ignore
/// assert_bbox_approx_eq!(layer.extent.unwrap(), fixtures::bbox::SWITZERLAND_LV95, 0.01);
/// ```
#[macro_export]
macro_rules! assert_bbox_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let actual: [f64; 4] = $actual;
        let (min_x, min_y, max_x, max_y): (f64, f64, f64, f64) = $expected;
        $crate::assert_approx_eq!(actual[0], min_x, $epsilon);
        $crate::assert_approx_eq!(actual[1], min_y, $epsilon);
        $crate::assert_approx_eq!(actual[2], max_x, $epsilon);
        $crate::assert_approx_eq!(actual[3], max_y, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_coords_approx_eq_passes() {
        assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
    }

    #[test]
    fn test_assert_bbox_approx_eq_passes() {
        assert_bbox_approx_eq!([5.960001, 45.82, 10.49, 47.81], fixtures::bbox::SWITZERLAND_WGS84, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_bbox_approx_eq_fails() {
        assert_bbox_approx_eq!([6.0, 45.82, 10.49, 47.81], fixtures::bbox::SWITZERLAND_WGS84, 0.001);
    }
}

//! Shared test utilities for the sandbox contour workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Contour raster generators (lines, closed loops, noise)
//! - ASCII raster fixtures for hand-drawn tracing cases
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{raster_from_ascii, fixtures, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
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

/// Macro for approximate equality of normalised positions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_position_approx_eq;
///
/// assert_position_approx_eq!(props.normalised_position, (0.5, 0.25), 1e-5);
/// ```
#[macro_export]
macro_rules! assert_position_approx_eq {
    ($pos:expr, ($x:expr, $y:expr), $epsilon:expr) => {{
        let pos = $pos;
        $crate::assert_approx_eq!(pos.x, $x, $epsilon);
        $crate::assert_approx_eq!(pos.y, $y, $epsilon);
    }};
}

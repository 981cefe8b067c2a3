pub mod climate;
pub mod equipment;
pub mod geometry;
pub mod report;

pub use climate::*;
pub use equipment::*;
pub use geometry::*;
pub use report::*;

/// Coerce a non-finite user input to zero at the boundary, so NaN/Inf can
/// never propagate into yield or cost figures.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

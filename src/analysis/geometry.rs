use crate::model::types::Point;

/// Euclidean distance between two points in ångströms.
///
/// Every distance the analysis reports goes through this function.
pub fn distance(a: &Point, b: &Point) -> f64 {
    nalgebra::distance(a, b)
}

/// Angle `a`-`vertex`-`b` in degrees, in `[0, 180]`.
///
/// Degenerate input (either arm of zero length) yields `0.0`.
pub fn angle(a: &Point, vertex: &Point, b: &Point) -> f64 {
    let u = a - vertex;
    let v = b - vertex;
    let norms = u.norm() * v.norm();
    if norms <= f64::EPSILON {
        return 0.0;
    }
    (u.dot(&v) / norms).clamp(-1.0, 1.0).acos().to_degrees()
}

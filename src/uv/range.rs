//! Integer-boundary predicates on UV values.

/// The smallest integer lying strictly between `a` and `b`, if any.
///
/// Endpoints that are themselves integers do not count: `integer_between(0.0, 1.0)`
/// is `None`, `integer_between(0.0, 1.5)` is `Some(1.0)`.
pub fn integer_between(a: f32, b: f32) -> Option<f32> {
    let min = a.min(b);
    let max = a.max(b);

    let start = min.floor() + 1.0;
    let end = max.ceil() - 1.0;

    (start <= end).then_some(start)
}

/// Check that no integer lies strictly between the extremes of three values.
pub fn values_close(a: f32, b: f32, c: f32) -> bool {
    let min = a.min(b).min(c);
    let max = a.max(b).max(c);
    integer_between(min, max).is_none()
}

/// Check that a triangle's UVs fit in one unit cell on both axes.
pub fn uvs_close(uvs: &[[f32; 2]; 3]) -> bool {
    values_close(uvs[0][0], uvs[1][0], uvs[2][0]) && values_close(uvs[0][1], uvs[1][1], uvs[2][1])
}

/// Check whether any corner UV is negative or above `threshold`.
pub fn needs_subdivision(uvs: &[[f32; 2]; 3], threshold: f32) -> bool {
    uvs.iter()
        .flatten()
        .any(|&value| value < 0.0 || value > threshold)
}

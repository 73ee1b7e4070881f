/// Quadratic ease-in-out time remapping on `[0, 1]`.
///
/// Continuous and monotonic, with `f(0) = 0`, `f(0.5) = 0.5`, `f(1) = 1`.
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

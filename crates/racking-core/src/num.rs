/// Floored division of two floats.
///
/// Computed from the remainder rather than as `(a / b).floor()`, which can
/// land one step too high when `a / b` rounds up to an integer (for example
/// `1.0 / 0.1`). Mount counts are reproducible only with this form.
pub(crate) fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && (b < 0.0) != (rem < 0.0) {
        div -= 1.0;
    }
    let floored = div.floor();
    if div - floored > 0.5 {
        floored + 1.0
    } else {
        floored
    }
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

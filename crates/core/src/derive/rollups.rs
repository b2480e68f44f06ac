/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `part / total` as a percentage, rounded to `decimals` places (whole
/// numbers when `None`). A zero total yields `0.0`.
pub fn percentage(part: usize, total: usize, decimals: Option<u32>) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(part as f64 * 100.0 / total as f64, decimals.unwrap_or(0))
}

/// Mean of the present values. The denominator is the number of present
/// values, not the length of the input. `None` when nothing contributes.
pub fn average(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Sums monetary amounts, rounding to cents after every addition so the
/// result does not drift with the number of terms.
pub fn sum_money(amounts: impl IntoIterator<Item = f64>) -> f64 {
    amounts
        .into_iter()
        .fold(0.0, |total, amount| round_to(total + amount, 2))
}

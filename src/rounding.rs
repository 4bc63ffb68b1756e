#[inline(always)]
pub fn round_2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let formatted = format!("{:.2}", value);
    formatted.parse::<f64>().unwrap_or(value)
}

#[inline(always)]
pub fn round_4(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let formatted = format!("{:.4}", value);
    formatted.parse::<f64>().unwrap_or(value)
}

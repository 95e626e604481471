//! Deterministic number rendering shared by every value serializer.

/// Renders a number with at most four decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    format_fixed(value, 4)
}

/// Renders a number rounded to `decimals` places, trimming trailing zeros.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 || !rounded.is_finite() {
        // Also folds -0.0 into "0".
        return "0".to_string();
    }
    let text = format!("{:.*}", decimals, rounded);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::from(0.3f32)), "0.3");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(216.000_000_01, 2), "216");
        assert_eq!(format_fixed(33.333_33, 2), "33.33");
    }
}

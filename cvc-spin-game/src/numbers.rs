//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Ratio of two counters, `0.0` when the denominator is zero.
#[must_use]
pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    f64::from(numerator) / f64::from(denominator)
}

/// Round a fraction in `[0, 1]` to a whole percentage, clamped to `0..=100`.
#[must_use]
pub fn round_percentage(fraction: f64) -> u32 {
    if !fraction.is_finite() {
        return 0;
    }
    let percent = (fraction * 100.0).round().clamp(0.0, 100.0);
    cast::<f64, u32>(percent).unwrap_or(0)
}

/// Clamp a f32 into `[min, max]`, substituting `fallback` for non-finite input.
#[must_use]
pub fn clamp_finite_f32(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Saturating usize to u32 conversion.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_handles_zero_denominator() {
        assert!(ratio(3, 0).abs() < f64::EPSILON);
        assert!((ratio(3, 4) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn percentages_round_and_clamp() {
        assert_eq!(round_percentage(0.125), 13);
        assert_eq!(round_percentage(1.5), 100);
        assert_eq!(round_percentage(-0.2), 0);
        assert_eq!(round_percentage(f64::NAN), 0);
    }

    #[test]
    fn clamp_substitutes_fallback_for_nan() {
        assert!((clamp_finite_f32(2.0, 0.0, 1.0, 0.5) - 1.0).abs() < f32::EPSILON);
        assert!((clamp_finite_f32(f32::NAN, 0.0, 1.0, 0.5) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn usize_conversions_saturate() {
        assert!((usize_to_f64(22) - 22.0).abs() < f64::EPSILON);
        assert_eq!(usize_to_u32(7), 7);
    }
}

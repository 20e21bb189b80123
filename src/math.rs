//! Natural-log domain constants shared by projection, scoring and abundance code.
//!
//! `LOG_0` is the canonical "zero probability" sentinel. Anything equal to it
//! must turn into a linear zero, never a NaN.

pub const LOG_0: f64 = f64::NEG_INFINITY;
pub const LOG_1: f64 = 0.0;
pub const LOG_ONEHALF: f64 = -std::f64::consts::LN_2;
/// ln(0.05): prior for an orphaned end of a stranded paired-end fragment.
pub const LOG_ORPHAN_PROB: f64 = -2.995_732_273_553_991;
pub const LOG_BILLION: f64 = 20.723_265_836_946_41;
pub const MILLION: f64 = 1_000_000.0;

/// `exp(x)` that maps the zero sentinel (and NaN) to exactly 0.
#[inline]
pub fn safe_exp(x: f64) -> f64 {
    if x == LOG_0 || x.is_nan() { 0.0 } else { x.exp() }
}

/// `ln(x)` for counts; 0 maps to `LOG_0`.
#[inline]
pub fn log_count(x: f64) -> f64 {
    if x > 0.0 { x.ln() } else { LOG_0 }
}

/// `ln(Σ exp(xᵢ))` without overflow; an empty or all-zero input gives `LOG_0`.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(LOG_0, f64::max);
    if max == LOG_0 {
        return LOG_0;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_their_linear_values() {
        assert!((LOG_ORPHAN_PROB - 0.05f64.ln()).abs() < 1e-12);
        assert!((LOG_BILLION - 1e9f64.ln()).abs() < 1e-12);
        assert!((LOG_ONEHALF - 0.5f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn zero_sentinel_round_trips_to_zero() {
        assert_eq!(safe_exp(LOG_0), 0.0);
        assert_eq!(log_count(0.0), LOG_0);
        assert_eq!(safe_exp(log_count(0.0)), 0.0);
        assert_eq!(log_sum_exp(&[]), LOG_0);
        assert_eq!(log_sum_exp(&[LOG_0, LOG_0]), LOG_0);
    }

    #[test]
    fn log_sum_exp_adds_in_linear_space() {
        let v = log_sum_exp(&[2.0f64.ln(), 3.0f64.ln(), LOG_0]);
        assert!((v.exp() - 5.0).abs() < 1e-12);
    }
}

//! Number formatting for report headers.
//!
//! Header fields are consumed by downstream tools that expect the
//! output of C's `%g`: six significant digits, trailing zeros removed,
//! and scientific notation with a signed two-digit exponent when the
//! decimal exponent is below -4 or at least 6.

const SIGNIFICANT_DIGITS: i32 = 6;

/// Format `x` like C `printf("%g", x)`.
pub fn format_g(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // The exponent must be taken after rounding to the target precision.
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            if exp < 0 { '-' } else { '+' },
            exp.abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        let fixed = format!("{:.*}", decimals, x);
        strip_trailing_zeros(&fixed).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

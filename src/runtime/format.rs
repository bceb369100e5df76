use crate::state::{parse_number, CalculatorState, Operator, ERROR_TEXT};

/// Magnitudes above this render in scientific notation.
pub const SCIENTIFIC_THRESHOLD: f64 = 999_999_999_999.0;
/// Fraction digits kept on screen; the rest are cut, not rounded.
pub const MAX_FRACTION_DIGITS: usize = 8;
const SCIENTIFIC_PRECISION: usize = 4;
const EXACT_DIGITS: usize = 400;

/// What a frontend shows after each operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayView {
    pub primary: String,
    pub expression: String,
    pub active_operator: Option<Operator>,
}

impl DisplayView {
    pub fn from_state(state: &CalculatorState) -> Self {
        Self {
            primary: format_display(state.display_value()),
            expression: state.expression().to_string(),
            active_operator: state.operator(),
        }
    }
}

pub fn format_display(display_value: &str) -> String {
    if display_value == ERROR_TEXT {
        return display_value.to_string();
    }

    let Some(value) = parse_number(display_value) else {
        return "0".to_string();
    };

    if value.abs() > SCIENTIFIC_THRESHOLD {
        return to_scientific(value);
    }

    let (integer, fraction) = match display_value.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (display_value, None),
    };

    let mut out = group_thousands(integer);
    if let Some(fraction) = fraction {
        out.push('.');
        out.extend(fraction.chars().take(MAX_FRACTION_DIGITS));
    }
    out
}

/// Mantissa with `SCIENTIFIC_PRECISION` fraction digits, ties rounded away
/// from zero, and an exponent that always carries its sign.
fn to_scientific(value: f64) -> String {
    // Every finite f64 above the threshold expands exactly within this many digits.
    let exact = format!("{:.prec$e}", value.abs(), prec = EXACT_DIGITS);
    let Some((mantissa, exponent)) = exact.split_once('e') else {
        return exact;
    };
    let Ok(mut exponent) = exponent.parse::<i32>() else {
        return exact;
    };

    let digits: Vec<u32> = mantissa.chars().filter_map(|ch| ch.to_digit(10)).collect();
    let kept = SCIENTIFIC_PRECISION + 1;
    let mut scaled = digits
        .iter()
        .take(kept)
        .fold(0u64, |acc, d| acc * 10 + u64::from(*d));
    if digits.get(kept).is_some_and(|d| *d >= 5) {
        scaled += 1;
    }
    let limit = 10u64.pow(kept as u32);
    if scaled >= limit {
        scaled /= 10;
        exponent += 1;
    }

    let scaled = scaled.to_string();
    let (lead, fraction) = scaled.split_at(1);
    let sign = if value < 0.0 { "-" } else { "" };
    let exponent_sign = if exponent < 0 { "-" } else { "+" };
    format!("{sign}{lead}.{fraction}e{exponent_sign}{}", exponent.abs())
}

/// Inserts "," between groups of three integer digits. Text that is not a
/// plain (optionally negative) digit run comes back unchanged.
fn group_thousands(integer: &str) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return integer.to_string();
    }

    let mut out = String::with_capacity(integer.len() + digits.len() / 3);
    out.push_str(sign);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_truncates_fraction() {
        assert_eq!(format_display("1234567.123456789"), "1,234,567.12345678");
        assert_eq!(format_display("0.999999999"), "0.99999999");
    }

    #[test]
    fn test_format_scientific_above_threshold() {
        assert_eq!(format_display("10000000000000"), "1.0000e+13");
        assert_eq!(format_display("-123456789012345"), "-1.2346e+14");
        assert_eq!(format_display("999999999999"), "999,999,999,999");
    }

    #[test]
    fn test_format_scientific_rounds_ties_up() {
        assert_eq!(format_display("1000050000000"), "1.0001e+12");
        assert_eq!(format_display("1000150000000"), "1.0002e+12");
        assert_eq!(format_display("-1000050000000"), "-1.0001e+12");
        assert_eq!(format_display("9999950000000"), "1.0000e+13");
        assert_eq!(format_display("1e+21"), "1.0000e+21");
    }

    #[test]
    fn test_format_keeps_partial_entry() {
        assert_eq!(format_display("12."), "12.");
        assert_eq!(format_display("0."), "0.");
        assert_eq!(format_display("-1234"), "-1,234");
        assert_eq!(format_display("123"), "123");
    }

    #[test]
    fn test_format_passthrough_and_fallback() {
        assert_eq!(format_display(ERROR_TEXT), ERROR_TEXT);
        assert_eq!(format_display("-"), "0");
        assert_eq!(format_display("1.5e-7"), "1.5e-7");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("-100000"), "-100,000");
        assert_eq!(group_thousands("1e"), "1e");
    }

    #[test]
    fn test_display_view_tracks_pending_operator() {
        let mut state = CalculatorState::new();
        state.input_digit(8);
        state.select_operator(Operator::Divide);

        let view = DisplayView::from_state(&state);
        assert_eq!(view.primary, "8");
        assert_eq!(view.expression, "8 \u{f7}");
        assert_eq!(view.active_operator, Some(Operator::Divide));
    }
}

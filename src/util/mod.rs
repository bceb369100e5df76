use unicode_width::UnicodeWidthStr;

/// Parse "true"/"false"/"1"/"0"/"on"/"off" from an owned String.
pub fn parse_bool_flag(s: String) -> Option<bool> {
    parse_bool_str(&s)
}

/// Parse "true"/"false"/"1"/"0"/"on"/"off" from a &str.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Right-aligns `text` to `width` terminal columns. Wider text is returned as is.
pub fn pad_left(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    if used >= width {
        return text.to_string();
    }
    format!("{}{text}", " ".repeat(width - used))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_helpers() {
        assert_eq!(parse_bool_str("true"), Some(true));
        assert_eq!(parse_bool_str("0"), Some(false));
        assert_eq!(parse_bool_flag("YES".to_string()), Some(true));
        assert_eq!(parse_bool_flag(" off ".to_string()), Some(false));
        assert_eq!(parse_bool_str("maybe"), None);
    }

    #[test]
    fn test_pad_left_counts_display_columns() {
        assert_eq!(pad_left("42", 5), "   42");
        assert_eq!(pad_left("7 \u{2212}", 5), "  7 \u{2212}");
        assert_eq!(pad_left("123456", 3), "123456");
    }
}

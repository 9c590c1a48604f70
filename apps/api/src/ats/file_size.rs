/// Formats an upload size the way the resume list displays it:
/// whole kilobytes up to 1024 KB, then megabytes with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    let kb = (bytes as f64 / 1024.0).round() as u64;
    if kb > 1024 {
        format!("{:.1} MB", kb as f64 / 1024.0)
    } else {
        format!("{kb} KB")
    }
}

/// Parses the leading integer of a declared size such as `"245 KB"`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Returns `None` when no digit follows.
pub fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut any_digit = false;
    for c in rest.chars() {
        let Some(d) = c.to_digit(10) else { break };
        any_digit = true;
        value = value.saturating_mul(10).saturating_add(d as i64);
    }

    any_digit.then_some(if negative { -value } else { value })
}

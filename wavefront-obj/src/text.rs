//! Small text primitives used while walking a single OBJ/MTL line: whitespace skipping, keyword
//! splitting, and number parsing. None of these allocate.

/// Splits a line into its leading keyword (`v`, `vt`, `usemtl`, ...) and the rest of the line with
/// leading whitespace stripped. Returns `None` for a blank or all-whitespace line.
pub fn split_line_key_rest(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let key_len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (key, rest) = trimmed.split_at(key_len);
    Some((key, rest.trim_start()))
}

/// Splits `rest` on single-character separator `sep`, discarding empty fields produced by
/// repeated separators (mirrors how OBJ face corners separated by `/` treat a missing field).
pub fn split_by_char(s: &str, sep: char) -> impl Iterator<Item = &str> {
    s.split(sep)
}

/// Advances past any run of space/tab characters, returning the remainder.
pub fn skip_ws(s: &str) -> &str {
    s.trim_start_matches([' ', '\t'])
}

/// Parses a single base-10 signed integer from the start of `s`, returning the value and the
/// unconsumed remainder. Accepts a leading `+` or `-`.
pub fn parse_int(s: &str) -> Option<(i64, &str)> {
    let s = skip_ws(s);
    let mut end = 0;
    let bytes = s.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Parses a single floating point number from the start of `s`, returning the value and the
/// unconsumed remainder.
pub fn parse_float(s: &str) -> Option<(f32, &str)> {
    let s = skip_ws(s);
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut saw_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        saw_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Repeatedly calls [`parse_float`] to fill `out`, stopping once `out` is full or no further
/// number can be parsed. Returns the number of values written.
pub fn parse_floats(mut rest: &str, out: &mut [f32]) -> usize {
    let mut count = 0;
    while count < out.len() {
        match parse_float(rest) {
            Some((value, remainder)) => {
                out[count] = value;
                count += 1;
                rest = remainder;
            }
            None => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_key_and_rest() {
        assert_eq!(split_line_key_rest("v 1.0 2.0 3.0"), Some(("v", "1.0 2.0 3.0")));
        assert_eq!(split_line_key_rest("   usemtl   Red"), Some(("usemtl", "Red")));
        assert_eq!(split_line_key_rest("   \r\n"), None);
    }

    #[test]
    fn parses_signed_ints() {
        assert_eq!(parse_int("-12/4"), Some((-12, "/4")));
        assert_eq!(parse_int("7"), Some((7, "")));
        assert_eq!(parse_int("abc"), None);
    }

    #[test]
    fn parses_floats_with_exponent() {
        assert_eq!(parse_float("1.5e-3 rest"), Some((1.5e-3, " rest")));
        assert_eq!(parse_float("-0.25"), Some((-0.25, "")));
    }

    #[test]
    fn parses_float_runs_into_buffer() {
        let mut out = [0.0f32; 4];
        let n = parse_floats("1.0 2.0 3.0", &mut out);
        assert_eq!(n, 3);
        assert_eq!(&out[..3], &[1.0, 2.0, 3.0]);
    }
}

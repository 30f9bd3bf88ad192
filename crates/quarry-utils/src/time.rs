/// Parses a duration string into a number of seconds.
///
/// Accepts a sequence of `<digits><unit>` groups where the unit is one of `s`, `m`, `h` or
/// `d` (for example `1h30m`). A bare number is read as seconds, so `"60"` and `"1m"` are
/// equivalent.
///
/// Returns `None` for malformed input or on overflow.
///
/// # Examples
///
/// ```
/// use quarry_utils::time::parse_duration;
///
/// assert_eq!(parse_duration("1h30m"), Some(5400));
/// assert_eq!(parse_duration("90"), Some(90));
/// ```
pub fn parse_duration(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.bytes().all(|b| b.is_ascii_digit()) {
        return input.parse().ok();
    }

    let mut total: u64 = 0;
    let mut chars = input.chars().peekable();

    while chars.peek().is_some() {
        let mut digits = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            digits.push(c);
        }
        if digits.is_empty() {
            return None;
        }

        let number: u64 = digits.parse().ok()?;
        let multiplier = match chars.next()? {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => return None,
        };

        total = total.checked_add(number.checked_mul(multiplier)?)?;
    }

    Some(total)
}

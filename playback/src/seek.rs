//! Parsing of the `hh:mm:ss` seek literal.

const COMPONENT_WEIGHTS: [u64; 3] = [3600, 60, 1];

/// Converts `hh:mm:ss` into seconds since midnight.
///
/// Components are not range checked (`00:90:00` is 5400). Empty components count as zero.
/// Anything other than three unsigned decimal components returns `None`, as does a value
/// that overflows.
pub fn parse_time_of_day(literal: &str) -> Option<u64> {
    let parts: Vec<&str> = literal.trim().split(':').collect();
    if parts.len() != COMPONENT_WEIGHTS.len() {
        return None;
    }

    let mut total: u64 = 0;
    for (part, weight) in parts.iter().zip(COMPONENT_WEIGHTS) {
        let part = part.trim();
        let value = if part.is_empty() {
            0
        } else if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse::<u64>().ok()?
        } else {
            return None;
        };
        total = total.checked_add(value.checked_mul(weight)?)?;
    }
    Some(total)
}

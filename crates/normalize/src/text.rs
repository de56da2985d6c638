/// Title-case a string: the first letter after any non-letter is upper-cased,
/// every other letter lower-cased.
///
/// ```
/// assert_eq!(nashville_normalize::title_case("civic facility"), "Civic Facility");
/// assert_eq!(nashville_normalize::title_case("HIP-HOP"), "Hip-Hop");
/// ```
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_handles_separators() {
        assert_eq!(title_case("event"), "Event");
        assert_eq!(title_case("live music venue"), "Live Music Venue");
        assert_eq!(title_case("o'brien's pub"), "O'Brien'S Pub");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn collapse_whitespace_trims_and_joins() {
        assert_eq!(collapse_whitespace("  The   Ryman\tAuditorium \n"), "The Ryman Auditorium");
    }
}

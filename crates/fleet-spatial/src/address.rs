//! Street address normalization.
//!
//! The package manifest and the distance table abbreviate compass directions
//! inconsistently (`410 S State St` vs `410 South State St`).  Both sides are
//! run through [`normalize_address`] so addresses compare equal as graph keys.

/// Expand standalone `N`, `S`, `E`, `W` tokens (any case) to the full word
/// and trim surrounding whitespace.
///
/// A token is a maximal run of ASCII alphanumerics, so `S.` and `S,` expand
/// but `SW` or `5S` do not.
///
/// ```
/// use fleet_spatial::normalize_address;
///
/// assert_eq!(normalize_address("410 S State St"), "410 South State St");
/// assert_eq!(normalize_address(" 3575 w Valley Central Station bus Loop "), "3575 West Valley Central Station bus Loop");
/// assert_eq!(normalize_address("1330 2100 S"), "1330 2100 South");
/// ```
pub fn normalize_address(address: &str) -> String {
    let address = address.trim();
    let mut out = String::with_capacity(address.len() + 8);
    let mut token = String::new();

    let flush = |token: &mut String, out: &mut String| {
        let expanded = match token.as_str() {
            "N" | "n" => "North",
            "S" | "s" => "South",
            "E" | "e" => "East",
            "W" | "w" => "West",
            other => other,
        };
        out.push_str(expanded);
        token.clear();
    };

    for c in address.chars() {
        if c.is_ascii_alphanumeric() {
            token.push(c);
        } else {
            flush(&mut token, &mut out);
            out.push(c);
        }
    }
    flush(&mut token, &mut out);
    out
}

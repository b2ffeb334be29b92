use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][0-9A-Za-z_]*$").expect("identifier pattern is valid"));

/// Word characters only, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

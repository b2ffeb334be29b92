use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NEGATED_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!([01])\b").expect("negated digit pattern is valid"));

static NEGATED_BOOLEAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!(true|false)\b").expect("negated boolean pattern is valid"));

/// Fold `!0`/`!1` into `true`/`false`, then flip `!true`/`!false`.
pub fn fold_booleans(input: &str) -> (String, usize) {
    let mut count = 0;
    let folded = NEGATED_DIGIT
        .replace_all(input, |caps: &Captures| {
            let end = caps.get(0).map_or(input.len(), |m| m.end());
            // `!0.5` is a negated float, not a boolean idiom
            if input[end..].starts_with('.') {
                return caps[0].to_string();
            }
            count += 1;
            let folded = if &caps[1] == "0" { "true" } else { "false" };
            folded.to_string()
        })
        .into_owned();

    let flipped = NEGATED_BOOLEAN
        .replace_all(&folded, |caps: &Captures| {
            count += 1;
            let flipped = if &caps[1] == "true" { "false" } else { "true" };
            flipped.to_string()
        })
        .into_owned();
    (flipped, count)
}

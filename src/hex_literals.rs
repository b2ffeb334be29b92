//! Hexadecimal integer literal normalization.
//!
//! Every `0x`/`0X` token followed by at least one hex digit is replaced by
//! its decimal value. Matching is lexical: occurrences inside string
//! literals, comments and identifiers such as `_0x1c22` are rewritten too.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

static HEX_LITERAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"0[xX]([0-9a-fA-F]+)").expect("hex literal pattern is valid")
});

/// One hex literal occurrence in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralMatch<'t> {
    /// Byte span of the whole token, prefix included.
    pub span: Range<usize>,
    /// The digit run after the prefix.
    pub digits: &'t str,
}

/// Iterate the hex literals of `text`, left to right, non-overlapping.
pub fn literal_matches(text: &str) -> impl Iterator<Item = LiteralMatch<'_>> {
    HEX_LITERAL_REGEX.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let digits = caps.get(1)?;
        Some(LiteralMatch {
            span: whole.range(),
            digits: digits.as_str(),
        })
    })
}

/// Rewrite every hex literal in `input` to decimal.
pub fn normalize_hex_literals(input: &str) -> String {
    normalize_counting(input).0
}

/// Same as [`normalize_hex_literals`], also returning the number of
/// literals rewritten.
pub fn normalize_counting(input: &str) -> (String, usize) {
    let mut count = 0;
    let output = HEX_LITERAL_REGEX
        .replace_all(input, |caps: &Captures| {
            match hex_to_decimal(&caps[1]) {
                Some(decimal) => {
                    count += 1;
                    decimal
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned();
    (output, count)
}

/// Convert a run of hex digits to its decimal representation.
///
/// Leading zeros are dropped; an all-zero run yields `"0"`. Runs too wide
/// for `u128` fall back to an exact digit-by-digit conversion. Returns
/// `None` for an empty run or one with a character outside `[0-9a-fA-F]`.
pub fn hex_to_decimal(digits: &str) -> Option<String> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some("0".to_string());
    }
    if significant.len() <= 32 {
        if let Ok(value) = u128::from_str_radix(significant, 16) {
            return Some(value.to_string());
        }
    }
    Some(wide_hex_to_decimal(significant))
}

// Decimal digits are kept little-endian, one per byte.
fn wide_hex_to_decimal(digits: &str) -> String {
    let mut decimal: Vec<u8> = vec![0];
    for nibble in digits.chars().filter_map(|c| c.to_digit(16)) {
        let mut carry = nibble;
        for d in decimal.iter_mut() {
            let v = u32::from(*d) * 16 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            decimal.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    while decimal.len() > 1 && decimal.last() == Some(&0) {
        decimal.pop();
    }
    decimal.iter().rev().map(|d| char::from(b'0' + d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_single_literal() {
        assert_eq!(normalize_hex_literals("x = 0x1A;"), "x = 26;");
    }

    #[test]
    fn rewrites_zero_and_lowercase() {
        assert_eq!(normalize_hex_literals("y = 0xff + 0x0;"), "y = 255 + 0;");
    }

    #[test]
    fn uppercase_prefix_matches() {
        assert_eq!(normalize_hex_literals("0XFF"), "255");
    }

    #[test]
    fn bare_prefix_untouched() {
        assert_eq!(normalize_hex_literals("a = 0x; b = 0xg1"), "a = 0x; b = 0xg1");
    }

    #[test]
    fn greedy_digit_run() {
        assert_eq!(normalize_hex_literals("0x10zz"), "16zz");
    }

    #[test]
    fn leading_zeros_dropped() {
        assert_eq!(hex_to_decimal("000a").as_deref(), Some("10"));
        assert_eq!(hex_to_decimal("0000").as_deref(), Some("0"));
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert_eq!(hex_to_decimal("+f"), None);
        assert_eq!(hex_to_decimal("-1"), None);
        assert_eq!(hex_to_decimal("zz"), None);
        assert_eq!(hex_to_decimal(""), None);
        assert_eq!(hex_to_decimal(" 1"), None);
    }

    #[test]
    fn rewrites_inside_string_literal() {
        let src = r#"log("mask is 0x1f")"#;
        assert_eq!(normalize_hex_literals(src), r#"log("mask is 31")"#);
    }

    #[test]
    fn rewrites_inside_identifier() {
        assert_eq!(normalize_hex_literals("var _0x1c226f;"), "var _1843823;");
    }

    #[test]
    fn wide_values_convert_exactly() {
        // 2^128
        assert_eq!(
            hex_to_decimal("100000000000000000000000000000000").as_deref(),
            Some("340282366920938463463374607431768211456")
        );
        assert_eq!(
            hex_to_decimal("ffffffffffffffffffffffffffffffff"),
            Some(u128::MAX.to_string())
        );
    }

    #[test]
    fn matches_report_span_and_digits() {
        let text = "a=0x1F,b=0X2";
        let found: Vec<_> = literal_matches(text).collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].span, 2..6);
        assert_eq!(found[0].digits, "1F");
        assert_eq!(&text[found[1].span.clone()], "0X2");
    }

    #[test]
    fn output_is_not_rescanned() {
        let (out, count) = normalize_counting("0x0x1");
        // "0x0" is the first match; the trailing "x1" has no prefix left.
        assert_eq!(out, "0x1");
        assert_eq!(count, 1);
        assert_eq!(normalize_hex_literals(&out), "1");
    }
}

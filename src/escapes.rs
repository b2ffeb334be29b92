use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

const ESCAPES: [(&str, &str); 5] = [
    (r"\x20", " "),
    (r"\x0a", "\n"),
    (r"\x0A", "\n"),
    (r"\x27", "'"),
    (r"\x22", "\""),
];

static ESCAPE_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .build(ESCAPES.iter().map(|(from, _)| *from))
        .expect("escape table is valid")
});

/// Decode the `\xHH` escapes minifiers use for spaces, newlines and quotes.
pub fn decode_escapes(input: &str) -> (String, usize) {
    let mut count = 0;
    let mut output = String::with_capacity(input.len());
    ESCAPE_MATCHER.replace_all_with(input, &mut output, |mat, _, dst| {
        count += 1;
        dst.push_str(ESCAPES[mat.pattern().as_usize()].1);
        true
    });
    (output, count)
}

//! Bracket-indexed property access to dot notation.
//!
//! `base["key"]` and `base['key']` become `base.key`. The double-quoted
//! pass runs first, then the single-quoted one. Each pass is one scan: a
//! whole chain such as `a["b"]["c"]` is matched at once and every link is
//! expanded inside the replacement, so `a.b` serves as the base of `["c"]`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

use crate::identifier::is_identifier;

static DOUBLE_QUOTED_ACCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([0-9A-Za-z_]+)\["([^"]+)"\]"#)
        .expect("double-quoted access pattern is valid")
});

static SINGLE_QUOTED_ACCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9A-Za-z_]+)\['([^']+)'\]").expect("single-quoted access pattern is valid")
});

static DOUBLE_QUOTED_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([0-9A-Za-z_]+)((?:\["[^"]+"\])+)"#)
        .expect("double-quoted chain pattern is valid")
});

static SINGLE_QUOTED_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9A-Za-z_]+)((?:\['[^']+'\])+)").expect("single-quoted chain pattern is valid")
});

// Links of either style, so a chain the double pass could not reach
// (`a['b']["c"]`) is finished by the single pass.
static ANY_QUOTED_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"([0-9A-Za-z_]+)"#,
        r#"((?:\['[^']+'\]|\["[^"]+"\])*\['[^']+'\](?:\['[^']+'\]|\["[^"]+"\])*)"#,
    ))
    .expect("mixed chain pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Double,
    Single,
}

impl QuoteStyle {
    fn regex(self) -> &'static Regex {
        match self {
            QuoteStyle::Double => &DOUBLE_QUOTED_ACCESS,
            QuoteStyle::Single => &SINGLE_QUOTED_ACCESS,
        }
    }

    fn chain_regex(self) -> &'static Regex {
        match self {
            QuoteStyle::Double => &DOUBLE_QUOTED_CHAIN,
            QuoteStyle::Single => &SINGLE_QUOTED_CHAIN,
        }
    }
}

/// Which keys may be turned into dot notation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Any key the pattern matches, even ones that are not valid bare names.
    #[default]
    Permissive,
    /// Only keys made of word characters that do not start with a digit.
    IdentifierOnly,
}

impl KeyPolicy {
    pub fn allows(self, key: &str) -> bool {
        match self {
            KeyPolicy::Permissive => true,
            KeyPolicy::IdentifierOnly => is_identifier(key),
        }
    }
}

impl std::str::FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(KeyPolicy::Permissive),
            "identifier-only" | "identifier_only" => Ok(KeyPolicy::IdentifierOnly),
            other => Err(format!("unknown key policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAccessMatch<'t> {
    pub span: Range<usize>,
    pub base: &'t str,
    pub quote: QuoteStyle,
    pub key: &'t str,
}

/// Single left-to-right scan for one quote style. Only the first link of
/// a chain is reported, since later links have no word-character base yet.
pub fn property_matches(text: &str, quote: QuoteStyle) -> Vec<PropertyAccessMatch<'_>> {
    quote
        .regex()
        .captures_iter(text)
        .filter_map(|caps| {
            Some(PropertyAccessMatch {
                span: caps.get(0)?.range(),
                base: caps.get(1)?.as_str(),
                quote,
                key: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

/// The double-quoted pass followed by the single-quoted pass.
pub fn rewrite_property_access(input: &str, policy: KeyPolicy) -> String {
    rewrite_counting(input, policy).0
}

pub fn rewrite_counting(input: &str, policy: KeyPolicy) -> (String, usize) {
    let (after_double, double) = rewrite_chains(input, &DOUBLE_QUOTED_CHAIN, policy);
    let (after_single, single) = rewrite_chains(&after_double, &ANY_QUOTED_CHAIN, policy);
    (after_single, double + single)
}

/// Rewrite every access using `quote`, whole chains included.
pub fn rewrite_quote_style(input: &str, quote: QuoteStyle, policy: KeyPolicy) -> String {
    rewrite_chains(input, quote.chain_regex(), policy).0
}

fn rewrite_chains(input: &str, chain: &Regex, policy: KeyPolicy) -> (String, usize) {
    let mut rewritten = 0;
    let output = chain
        .replace_all(input, |caps: &Captures| {
            expand_chain(&caps[1], &caps[2], policy, &mut rewritten)
        })
        .into_owned();
    (output, rewritten)
}

// `links` is one or more `[<q>key<q>]`. A rejected key leaves it and every
// later link bracketed, as they no longer follow a word-character base.
fn expand_chain(base: &str, links: &str, policy: KeyPolicy, rewritten: &mut usize) -> String {
    let mut out = String::with_capacity(base.len() + links.len());
    out.push_str(base);
    let mut rest = links;
    while !rest.is_empty() {
        let Some((key, next)) = split_link(rest) else {
            break;
        };
        if !policy.allows(key) {
            break;
        }
        out.push('.');
        out.push_str(key);
        *rewritten += 1;
        rest = next;
    }
    out.push_str(rest);
    out
}

fn split_link(link: &str) -> Option<(&str, &str)> {
    let after_bracket = link.strip_prefix('[')?;
    let mut chars = after_bracket.chars();
    let quote = chars.next()?;
    let inner = chars.as_str();
    let close = inner.find(quote)?;
    let next = inner[close + quote.len_utf8()..].strip_prefix(']')?;
    Some((&inner[..close], next))
}

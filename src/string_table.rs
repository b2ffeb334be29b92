//! Resolution of string-array lookup calls such as `_3304620(365)`.

use crate::errors::RuleError;
use crate::identifier::is_identifier;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};

pub type StringTables = BTreeMap<String, BTreeMap<String, String>>;

pub struct StringTableResolver {
    pattern: Option<Regex>,
    entries: HashMap<(String, u64), String>,
}

impl StringTableResolver {
    pub fn new(tables: &StringTables) -> Result<Self, RuleError> {
        let mut entries = HashMap::new();
        for (function, codes) in tables {
            if !is_identifier(function) {
                return Err(RuleError::InvalidIdentifier(function.clone()));
            }
            for (code, value) in codes {
                let parsed = code
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| RuleError::InvalidCode {
                        function: function.clone(),
                        code: code.clone(),
                    })?;
                if entries.insert((function.clone(), parsed), value.clone()).is_some() {
                    return Err(RuleError::DuplicateCode {
                        function: function.clone(),
                        code: parsed,
                    });
                }
            }
        }
        if entries.is_empty() {
            return Ok(Self { pattern: None, entries });
        }

        let alternation = tables
            .keys()
            .map(|f| regex::escape(f))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b({})\(([0-9]+)\)", alternation))?;
        Ok(Self {
            pattern: Some(pattern),
            entries,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Replace every known lookup call with a double-quoted literal.
    pub fn resolve(&self, input: &str) -> (String, usize) {
        let Some(pattern) = &self.pattern else {
            return (input.to_string(), 0);
        };
        let mut count = 0;
        let output = pattern
            .replace_all(input, |caps: &Captures| {
                let value = caps[2]
                    .parse::<u64>()
                    .ok()
                    .and_then(|code| self.entries.get(&(caps[1].to_string(), code)));
                match value {
                    Some(value) => {
                        count += 1;
                        quote_literal(value)
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned();
        (output, count)
    }
}

fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

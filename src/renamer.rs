use crate::errors::RuleError;
use crate::identifier::is_identifier;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};

/// Whole-word identifier renaming from a fixed table.
pub struct IdentifierRenamer {
    pattern: Option<Regex>,
    renames: HashMap<String, String>,
}

impl IdentifierRenamer {
    pub fn new(table: &BTreeMap<String, String>) -> Result<Self, RuleError> {
        for (from, to) in table {
            for name in [from, to] {
                if !is_identifier(name) {
                    return Err(RuleError::InvalidIdentifier(name.clone()));
                }
            }
        }
        if table.is_empty() {
            return Ok(Self {
                pattern: None,
                renames: HashMap::new(),
            });
        }

        let mut names: Vec<&str> = table.keys().map(String::as_str).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{})\b", alternation))?;

        Ok(Self {
            pattern: Some(pattern),
            renames: table.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn rename(&self, input: &str) -> (String, usize) {
        let Some(pattern) = &self.pattern else {
            return (input.to_string(), 0);
        };
        let mut count = 0;
        let output = pattern
            .replace_all(input, |caps: &Captures| {
                let name = &caps[0];
                match self.renames.get(name) {
                    Some(to) => {
                        count += 1;
                        to.clone()
                    }
                    None => name.to_string(),
                }
            })
            .into_owned();
        (output, count)
    }
}

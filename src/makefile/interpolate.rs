//! Variable table and reference resolution
//!
//! References use either `${name}` or `$(name)`. Undefined names expand to
//! the empty string; a variable whose expansion reaches itself again is an
//! error rather than an endless expansion.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$(?:\{(\w+)\}|\((\w+)\))").unwrap())
}

/// Name to value map for rule file variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    vars: HashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value; the last assignment wins
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expand every reference in `s` against the current table
    pub fn resolve(&self, s: &str) -> InterpolationResult<String> {
        let mut active = Vec::new();
        self.resolve_with(s, &mut active)
    }

    /// Replace every stored value with its fully expanded form
    ///
    /// All values are expanded against the table as it was before the
    /// call, so the result does not depend on iteration order.
    pub fn resolve_all(&mut self) -> InterpolationResult<()> {
        let resolved = self
            .vars
            .iter()
            .map(|(name, value)| self.resolve(value).map(|v| (name.clone(), v)))
            .collect::<InterpolationResult<HashMap<_, _>>>()?;
        self.vars = resolved;
        Ok(())
    }

    fn resolve_with(&self, s: &str, active: &mut Vec<String>) -> InterpolationResult<String> {
        let re = reference_pattern();
        let mut result = String::with_capacity(s.len());
        let mut last = 0;

        for caps in re.captures_iter(s) {
            let whole = caps.get(0).unwrap();
            result.push_str(&s[last..whole.start()]);
            last = whole.end();

            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();

            let Some(value) = self.vars.get(name) else {
                continue;
            };
            if active.iter().any(|n| n == name) {
                return Err(InterpolationError::Recursive(name.to_string()));
            }

            active.push(name.to_string());
            let expanded = self.resolve_with(value, active);
            active.pop();
            result.push_str(&expanded?);
        }

        result.push_str(&s[last..]);
        Ok(result)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = VariableTable::new();
        for (k, v) in iter {
            table.set(k, v);
        }
        table
    }
}

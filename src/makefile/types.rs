//! Core rule file types
//!
//! This module defines the finalized form of a rule file: commands, rules,
//! the name-to-rule store and the default targets.

use crate::error::{ParseError, ParseResult, Result};
use crate::makefile::VariableTable;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Marker that suppresses echoing a command line
pub const SILENT_PREFIX: char = '@';

/// A single recipe line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Text handed to the shell
    pub exec: String,

    /// Whether the text is printed before it runs
    pub need_echo: bool,
}

impl Command {
    pub fn new(exec: impl Into<String>, need_echo: bool) -> Self {
        Command {
            exec: exec.into(),
            need_echo,
        }
    }

    /// Build a command from a resolved recipe line, honouring a leading `@`
    pub fn from_line(line: &str) -> Self {
        match line.strip_prefix(SILENT_PREFIX) {
            Some(rest) => Command::new(rest.trim(), false),
            None => Command::new(line, true),
        }
    }
}

/// A target's dependencies plus the commands that rebuild it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
}

/// Identity of a rule, shared by every alias it is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

/// Target name to rule map
///
/// Rules live in an arena; names map to a [`RuleId`], so aliases of one
/// rule resolve to the same instance.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
    targets: HashMap<String, RuleId>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` under every name in `names`
    pub fn insert<I, S>(&mut self, names: I, rule: Rule) -> ParseResult<RuleId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = RuleId(self.rules.len());
        self.rules.push(rule);

        for name in names {
            let name = name.into();
            if self.targets.contains_key(&name) {
                return Err(ParseError::DuplicateRule(name));
            }
            self.targets.insert(name, id);
        }

        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.id(name).map(|id| self.rule(id))
    }

    pub fn id(&self, name: &str) -> Option<RuleId> {
        self.targets.get(name).copied()
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    /// Whether two names denote the same target
    ///
    /// Names backed by a rule compare by rule identity, so aliases match;
    /// names without a rule compare as plain paths.
    pub fn same_target(&self, a: &str, b: &str) -> bool {
        match (self.id(a), self.id(b)) {
            (Some(x), Some(y)) => x == y,
            (None, None) => a == b,
            _ => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Number of registered target names (aliases counted separately)
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Every name registered for `id`, sorted
    pub fn aliases(&self, id: RuleId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .targets
            .iter()
            .filter(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// A fully parsed and finalized rule file
#[derive(Debug, Clone, Default)]
pub struct Makefile {
    /// Variables with every reference expanded
    pub variables: VariableTable,

    /// Rules keyed by target name
    pub rules: RuleStore,

    /// Targets built when none are requested
    pub first_targets: Vec<String>,
}

#[derive(Serialize)]
struct Database<'a> {
    default_targets: &'a [String],
    variables: BTreeMap<&'a str, &'a str>,
    rules: BTreeMap<&'a str, &'a Rule>,
}

impl Makefile {
    /// Render variables, rules and default targets as YAML
    pub fn to_yaml(&self) -> Result<String> {
        let database = Database {
            default_targets: &self.first_targets,
            variables: self.variables.iter().collect(),
            rules: self
                .rules
                .names()
                .filter_map(|name| self.rules.get(name).map(|rule| (name, rule)))
                .collect(),
        };
        Ok(serde_yaml::to_string(&database)?)
    }
}

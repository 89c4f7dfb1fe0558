//! Post-parse resolution and rule table construction

use crate::error::ParseResult;
use crate::makefile::{Command, Makefile, ParsedFile, Rule, RuleStore};

/// Resolve all references and build the rule store
///
/// Lazy variables are expanded first, against the whole file, so they may
/// name variables declared further down. Target names, dependency lines
/// and command lines are then expanded against that table and split into
/// individual names.
pub fn finalize(parsed: ParsedFile) -> ParseResult<Makefile> {
    let ParsedFile {
        mut variables,
        rules: raw_rules,
        first_rule,
    } = parsed;

    variables.resolve_all()?;

    let mut rules = RuleStore::new();
    for raw in raw_rules {
        let targets = variables.resolve(&raw.targets)?;
        let depends = variables.resolve(&raw.depends)?;
        let commands = raw
            .commands
            .iter()
            .map(|line| variables.resolve(line).map(|line| Command::from_line(&line)))
            .collect::<Result<Vec<_>, _>>()?;

        let rule = Rule {
            depends: split_names(&depends),
            commands,
        };
        rules.insert(targets.split_whitespace(), rule)?;
    }

    let first_targets = match first_rule {
        Some(expr) => split_names(&variables.resolve(&expr)?),
        None => Vec::new(),
    };

    Ok(Makefile {
        variables,
        rules,
        first_targets,
    })
}

/// Split on whitespace, dropping repeated names
fn split_names(s: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in s.split_whitespace() {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

//! Rule file discovery and statement parsing

use crate::error::{ParseError, ParseResult};
use crate::makefile::{finalize, Makefile, Reader, VariableTable};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default rule file names to search for
pub const MAKEFILE_NAMES: &[&str] = &["Makefile", "makefile"];

fn statement_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let sym = r"[A-Za-z0-9_./\-$(){}]+";
        Regex::new(&format!(r"^({sym}(?:\s+{sym})*)\s*(:=|=|:)\s*(.*)$")).unwrap()
    })
}

/// A rule as written, before references are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRule {
    /// Target expression (one or more names)
    pub targets: String,

    /// First-line dependency expression, possibly empty
    pub depends: String,

    /// Command lines, trimmed, unresolved
    pub commands: Vec<String>,
}

/// Parser state after all statements are read
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Immediate values are already expanded; lazy ones are verbatim
    pub variables: VariableTable,

    /// Rules in declaration order
    pub rules: Vec<RawRule>,

    /// Target expression of the first rule in the file
    pub first_rule: Option<String>,
}

/// Statement parser
///
/// Owns the line source and everything collected from it.
pub struct Parser<R> {
    reader: Reader<R>,
    parsed: ParsedFile,
}

impl<R: BufRead> Parser<R> {
    pub fn new(source: R) -> Self {
        Parser {
            reader: Reader::new(source),
            parsed: ParsedFile::default(),
        }
    }

    /// Read every statement of the source
    pub fn parse(mut self) -> ParseResult<ParsedFile> {
        while let Some(line) = self.reader.next_line()? {
            if is_skippable(&line) {
                continue;
            }

            let caps = statement_pattern()
                .captures(&line)
                .ok_or_else(|| self.statement_error(&line))?;
            let lhs = caps[1].trim();
            let rhs = caps[3].trim();

            match &caps[2] {
                ":=" => self.parse_assign(lhs, rhs, true, &line)?,
                "=" => self.parse_assign(lhs, rhs, false, &line)?,
                _ => self.parse_rule(lhs, rhs)?,
            }
        }

        Ok(self.parsed)
    }

    fn parse_assign(&mut self, lhs: &str, rhs: &str, immediate: bool, line: &str) -> ParseResult<()> {
        if lhs.split_whitespace().nth(1).is_some() {
            return Err(self.statement_error(line));
        }

        let value = if immediate {
            self.parsed.variables.resolve(rhs)?
        } else {
            rhs.to_string()
        };
        self.parsed.variables.set(lhs, value);

        Ok(())
    }

    fn parse_rule(&mut self, lhs: &str, rhs: &str) -> ParseResult<()> {
        let mut commands = Vec::new();

        while let Some(line) = self.reader.next_line()? {
            if !line.starts_with('\t') {
                self.reader.push_back(line);
                break;
            }

            let command = line.trim();
            if command.is_empty() || command.starts_with('#') {
                continue;
            }
            commands.push(command.to_string());
        }

        if self.parsed.first_rule.is_none() {
            self.parsed.first_rule = Some(lhs.to_string());
        }
        self.parsed.rules.push(RawRule {
            targets: lhs.to_string(),
            depends: rhs.to_string(),
            commands,
        });

        Ok(())
    }

    fn statement_error(&self, line: &str) -> ParseError {
        ParseError::Statement {
            line: self.reader.line_no(),
            text: line.to_string(),
        }
    }
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse and finalize a rule file from any buffered source
pub fn parse<R: BufRead>(source: R) -> ParseResult<Makefile> {
    let parsed = Parser::new(source).parse()?;
    finalize(parsed)
}

/// Parse and finalize rule file text
pub fn parse_str(text: &str) -> ParseResult<Makefile> {
    parse(Cursor::new(text))
}

/// Parse and finalize a rule file on disk
pub fn parse_file(path: &Path) -> ParseResult<Makefile> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Find the rule file in `dir`
pub fn find_makefile(dir: &Path) -> ParseResult<PathBuf> {
    let mut searched = Vec::new();

    for name in MAKEFILE_NAMES {
        let path = dir.join(name);
        if path.is_file() {
            return Ok(path);
        }
        searched.push(path.display().to_string());
    }

    Err(ParseError::NotFound(searched.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn read(text: &str) -> ParsedFile {
        Parser::new(Cursor::new(text)).parse().unwrap()
    }

    fn raw(targets: &str, depends: &str, commands: &[&str]) -> RawRule {
        RawRule {
            targets: targets.to_string(),
            depends: depends.to_string(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_and_comment_input() {
        for text in ["", "\n", "#comment\n", "   \n# another\n\n"] {
            let parsed = read(text);
            assert!(parsed.variables.is_empty());
            assert!(parsed.rules.is_empty());
            assert_eq!(parsed.first_rule, None);
        }
    }

    #[test]
    fn test_overwrite_assign() {
        let parsed = read("VAR1 = var1\nVAR2 = var2\nVAR1 = var3\n");
        assert_eq!(parsed.variables.get("VAR1"), Some("var3"));
        assert_eq!(parsed.variables.get("VAR2"), Some("var2"));
        assert_eq!(parsed.variables.len(), 2);
    }

    #[test]
    fn test_immediate_and_lazy_assign() {
        let parsed = read(
            "VAR1 = var1\nVAR2 = $(VAR1)\nVAR3 := $(VAR1)\nVAR1 = var2\nVAR4 := $(VAR0)\n",
        );
        assert_eq!(parsed.variables.get("VAR1"), Some("var2"));
        assert_eq!(parsed.variables.get("VAR2"), Some("$(VAR1)"));
        assert_eq!(parsed.variables.get("VAR3"), Some("var1"));
        assert_eq!(parsed.variables.get("VAR4"), Some(""));
    }

    #[test]
    fn test_rules_with_commands() {
        let parsed = read(
            "\nrule1 : rule2  rule3\n\t# comment rule1\n\techo rule1\n\n\t\nrule2 : rule3\n\techo rule2\n\t@echo end\nrule3 :\n",
        );
        assert_eq!(
            parsed.rules,
            vec![
                raw("rule1", "rule2  rule3", &["echo rule1"]),
                raw("rule2", "rule3", &["echo rule2", "@echo end"]),
                raw("rule3", "", &[]),
            ]
        );
        assert_eq!(parsed.first_rule.as_deref(), Some("rule1"));
    }

    #[test]
    fn test_rule_line_after_commands_is_not_lost() {
        let parsed = read("a:\n\techo a\nVAR = x\nb: a\n");
        assert_eq!(parsed.rules.len(), 2);
        assert_eq!(parsed.variables.get("VAR"), Some("x"));
        assert_eq!(parsed.rules[1], raw("b", "a", &[]));
    }

    #[test]
    fn test_references_are_kept_verbatim() {
        let parsed = read("$(VAR1) : $(VAR2)\n\techo $(VAR1)\n");
        assert_eq!(parsed.rules, vec![raw("$(VAR1)", "$(VAR2)", &["echo $(VAR1)"])]);
        assert_eq!(parsed.first_rule.as_deref(), Some("$(VAR1)"));
    }

    #[test]
    fn test_multi_target_rule() {
        let parsed = read("A B: dep\n\ttouch A B\n");
        assert_eq!(parsed.rules, vec![raw("A B", "dep", &["touch A B"])]);
    }

    #[test]
    fn test_malformed_statement() {
        let result = Parser::new(Cursor::new("VAR = x\n\nthis is not valid\n")).parse();
        match result {
            Err(ParseError::Statement { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "this is not valid");
            }
            other => panic!("expected statement error, got {:?}", other),
        }
    }

    #[test]
    fn test_stray_command_line_is_an_error() {
        let result = Parser::new(Cursor::new("\techo orphan\n")).parse();
        assert!(matches!(result, Err(ParseError::Statement { line: 1, .. })));
    }

    #[test]
    fn test_assignment_needs_single_name() {
        let result = Parser::new(Cursor::new("A B = x\n")).parse();
        assert!(matches!(result, Err(ParseError::Statement { .. })));
    }

    #[test]
    fn test_find_makefile() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_makefile(temp_dir.path());
        assert!(matches!(result, Err(ParseError::NotFound(_))));

        let path = temp_dir.path().join("makefile");
        fs::write(&path, "all:\n").unwrap();
        assert_eq!(find_makefile(temp_dir.path()).unwrap(), path);
    }

    #[test]
    fn test_parse_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_file(&temp_dir.path().join("Makefile"));
        assert!(matches!(result, Err(ParseError::Read(_))));
    }
}

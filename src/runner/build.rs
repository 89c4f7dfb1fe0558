//! Staleness evaluation and the build loop
//!
//! A schedule is walked in order. Whether a target runs is decided by
//! comparing it with the entry immediately before it in the schedule only:
//! when that entry is one of the target's dependencies and is not newer
//! than the target, the target is up to date. A target with several
//! dependencies is therefore only checked against the last one scheduled.

use crate::error::{ExecutionError, ExecutionResult, LookupError, LookupResult, Result};
use crate::makefile::{Makefile, Rule};
use crate::runner::{Context, Executor, Scheduler};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// What happened while building one requested target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// The requested target
    pub target: String,

    /// Order the targets were considered in
    pub schedule: Vec<String>,

    /// Targets whose commands were run (or printed, in a dry run)
    pub rebuilt: Vec<String>,

    /// Number of command lines run
    pub commands_run: usize,
}

/// Modification time of `path`, if it exists
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Builds requested targets from a finalized rule file
pub struct Builder<'a, E> {
    makefile: &'a Makefile,
    ctx: &'a Context,
    executor: E,
}

impl<'a, E: Executor> Builder<'a, E> {
    pub fn new(makefile: &'a Makefile, ctx: &'a Context, executor: E) -> Self {
        Builder {
            makefile,
            ctx,
            executor,
        }
    }

    /// Build each target in turn, stopping at the first failure
    pub fn build_all<S: AsRef<str>>(&self, targets: &[S]) -> Result<Vec<BuildReport>> {
        targets.iter().map(|t| self.build(t.as_ref())).collect()
    }

    /// Build `target` and everything it depends on
    pub fn build(&self, target: &str) -> Result<BuildReport> {
        let rules = &self.makefile.rules;
        let schedule = Scheduler::new(rules).schedule(target);

        for edge in &schedule.dropped {
            self.ctx.print_warning(&edge.to_string());
        }
        self.ctx
            .print_debug(&format!("Schedule for '{}': {}", target, schedule.order.join(" ")));

        self.check_targets(&schedule.order)?;

        let mut report = BuildReport {
            target: target.to_string(),
            ..BuildReport::default()
        };
        let mut previous: Option<(&str, Option<SystemTime>)> = None;

        for name in &schedule.order {
            let path = self.ctx.target_path(name);
            let mut mtime = modified_time(&path);

            if let Some(rule) = rules.get(name) {
                if self.is_stale(rule, mtime, previous) {
                    self.run_rule(name, rule, &mut report)?;
                    mtime = modified_time(&path);
                } else {
                    self.ctx.print_debug(&format!("'{}' is up to date", name));
                }
            }

            previous = Some((name.as_str(), mtime));
        }

        report.schedule = schedule.order;
        if report.commands_run == 0 {
            self.ctx.print_up_to_date(target).map_err(ExecutionError::from)?;
        }

        Ok(report)
    }

    /// Every scheduled name needs a rule or a file before anything runs
    fn check_targets(&self, order: &[String]) -> LookupResult<()> {
        for name in order {
            if !self.makefile.rules.contains(name) && !self.ctx.target_path(name).exists() {
                return Err(LookupError::TargetNotFound(name.clone()));
            }
        }
        Ok(())
    }

    fn is_stale(
        &self,
        rule: &Rule,
        mtime: Option<SystemTime>,
        previous: Option<(&str, Option<SystemTime>)>,
    ) -> bool {
        if rule.depends.is_empty() {
            return true;
        }
        let Some(own) = mtime else {
            return true;
        };

        match previous {
            Some((prev, prev_time)) if self.depends_on(rule, prev) => {
                prev_time.unwrap_or(SystemTime::UNIX_EPOCH) > own
            }
            _ => true,
        }
    }

    fn depends_on(&self, rule: &Rule, name: &str) -> bool {
        rule.depends
            .iter()
            .any(|d| self.makefile.rules.same_target(d, name))
    }

    fn run_rule(&self, name: &str, rule: &Rule, report: &mut BuildReport) -> ExecutionResult<()> {
        self.ctx.print_debug(&format!("Building '{}'", name));

        for command in &rule.commands {
            if command.need_echo || self.ctx.dry_run {
                self.ctx.echo_command(&command.exec)?;
            }
            if !self.ctx.dry_run {
                self.executor.execute(&command.exec, self.ctx)?;
            }
            report.commands_run += 1;
        }

        report.rebuilt.push(name.to_string());
        Ok(())
    }
}

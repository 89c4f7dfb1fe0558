//! Dependency ordering
//!
//! Linearizes the dependency graph below a root target depth first, so
//! every dependency precedes its dependents. Edges that would close a
//! cycle are dropped and reported; they never abort a build.

use crate::makefile::{RuleId, RuleStore};
use std::fmt;

/// A dependency edge removed to break a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEdge {
    pub target: String,
    pub dependency: String,
}

impl fmt::Display for DroppedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular {} <- {} dropped", self.target, self.dependency)
    }
}

/// Execution order for one requested target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Target names, dependencies first, each target at most once
    pub order: Vec<String>,

    /// Edges skipped because they lead back onto the current path
    pub dropped: Vec<DroppedEdge>,
}

impl Schedule {
    fn contains(&self, rules: &RuleStore, name: &str) -> bool {
        self.order.iter().any(|n| rules.same_target(n, name))
    }
}

/// Depth-first scheduler over a rule store
pub struct Scheduler<'a> {
    rules: &'a RuleStore,
}

impl<'a> Scheduler<'a> {
    pub fn new(rules: &'a RuleStore) -> Self {
        Scheduler { rules }
    }

    /// Order `root` and everything it depends on
    pub fn schedule(&self, root: &str) -> Schedule {
        let mut schedule = Schedule::default();
        self.visit(root, &[], &mut schedule);
        schedule
    }

    /// `ancestors` holds the rules on the path from the root to `target`;
    /// each frame extends its own copy, so siblings never see each other's
    /// in-progress path.
    fn visit(&self, target: &str, ancestors: &[RuleId], schedule: &mut Schedule) {
        if schedule.contains(self.rules, target) {
            return;
        }

        let Some(id) = self.rules.id(target) else {
            // Existence is checked when the schedule is run
            schedule.order.push(target.to_string());
            return;
        };

        let mut path = ancestors.to_vec();
        path.push(id);

        for dependency in &self.rules.rule(id).depends {
            let closes_cycle = self
                .rules
                .id(dependency)
                .is_some_and(|dep_id| path.contains(&dep_id));

            if closes_cycle {
                schedule.dropped.push(DroppedEdge {
                    target: target.to_string(),
                    dependency: dependency.clone(),
                });
                continue;
            }

            self.visit(dependency, &path, schedule);
        }

        schedule.order.push(target.to_string());
    }
}

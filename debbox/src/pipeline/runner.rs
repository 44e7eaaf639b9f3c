//! Pipeline executor.

use std::collections::HashSet;

use super::step::{BoxedStep, Outcome};
use crate::errors::DebboxResult;

/// How a run ended, short of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every step ran (or was skipped).
    Finished,
    /// A step reported [`Outcome::AlreadyBuilt`]; later steps never ran.
    ShortCircuit { step: &'static str },
}

/// Outcome of one step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub name: &'static str,
    pub outcome: Outcome,
}

/// Record of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub completion: Completion,
}

/// Ordered sequence of steps executed against one shared context.
pub struct Pipeline<Ctx> {
    steps: Vec<BoxedStep<Ctx>>,
    excluded: HashSet<String>,
}

impl<Ctx: Send + Sync> Pipeline<Ctx> {
    pub fn new(steps: Vec<BoxedStep<Ctx>>) -> Self {
        Pipeline {
            steps,
            excluded: HashSet::new(),
        }
    }

    /// Mark a step as excluded; it is recorded as skipped without its entry
    /// point being called.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Step names and description lines, in execution order.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(step.name());
            out.push('\n');
            for line in step.description() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Run the steps strictly in order. Stops at the first failure, wrapping
    /// the error with the failing step's name; stops successfully at the
    /// first [`Outcome::AlreadyBuilt`].
    pub async fn execute(&self, ctx: &Ctx) -> DebboxResult<RunReport> {
        let mut reports = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let name = step.name();

            if self.excluded.contains(name) {
                tracing::info!(step = name, "skipped (excluded)");
                reports.push(StepReport {
                    name,
                    outcome: Outcome::Skipped,
                });
                continue;
            }

            tracing::info!(step = name, "running");
            match step.run(ctx).await {
                Ok(outcome @ (Outcome::Done | Outcome::Skipped)) => {
                    tracing::info!(step = name, ?outcome);
                    reports.push(StepReport { name, outcome });
                }
                Ok(Outcome::AlreadyBuilt) => {
                    tracing::info!(step = name, "already built, nothing to do");
                    reports.push(StepReport {
                        name,
                        outcome: Outcome::AlreadyBuilt,
                    });
                    return Ok(RunReport {
                        steps: reports,
                        completion: Completion::ShortCircuit { step: name },
                    });
                }
                Err(e) => {
                    tracing::error!(step = name, error = %e, "failed");
                    return Err(e.in_step(name));
                }
            }
        }

        Ok(RunReport {
            steps: reports,
            completion: Completion::Finished,
        })
    }
}

/// Process exit code for a run result: 0 on completion (the "already built"
/// short-circuit included) and 1 on the first step failure.
pub fn exit_code(result: &DebboxResult<RunReport>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

//! Sequential step-execution pipeline.
//!
//! A pipeline is an ordered, statically defined list of steps run against one
//! shared context. Steps report a tagged [`Outcome`]; failures travel on the
//! error channel and halt the run. Steps own their idempotency checks; the
//! pipeline applies none of its own.

mod runner;
mod step;

pub use runner::{exit_code, Completion, Pipeline, RunReport, StepReport};
pub use step::{BoxedStep, Outcome, Step};

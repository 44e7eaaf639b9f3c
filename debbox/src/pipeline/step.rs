//! Step trait and outcome contract.

use async_trait::async_trait;

use crate::errors::DebboxResult;

/// What a step reports when it returns without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The step performed its work.
    Done,
    /// The desired end-state already held; nothing was done. Continues the
    /// pipeline exactly like [`Outcome::Done`].
    Skipped,
    /// The requested artifact already exists. The whole run stops
    /// successfully and every later step, cleanup included, is bypassed.
    /// Reserved for the check step.
    AlreadyBuilt,
}

/// A named, described unit of work with a single entry point.
///
/// Generic over the shared context so the executor can be exercised with a
/// plain test context. Build steps implement `Step<BuildContext>`.
#[async_trait]
pub trait Step<Ctx>: Send + Sync {
    /// Stable identifier, also used for exclusion.
    fn name(&self) -> &'static str;

    /// Human-readable description lines.
    fn description(&self) -> &'static [&'static str] {
        &[]
    }

    /// Perform the step. Implementations probe state first and report
    /// [`Outcome::Skipped`] when the desired end-state already holds.
    async fn run(&self, ctx: &Ctx) -> DebboxResult<Outcome>;
}

pub type BoxedStep<Ctx> = Box<dyn Step<Ctx>>;

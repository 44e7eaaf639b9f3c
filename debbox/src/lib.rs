//! Library-only driver for building Debian packages inside disposable Docker
//! containers.
//!
//! The crate is organized around three layers:
//!
//! - [`docker`]: a thin, stateless wrapper over the Docker Engine API:
//!   container lifecycle, network attachment, and command execution with
//!   batch and interactive (TTY) modes. All container state is re-derived
//!   from the daemon on every query; nothing is cached in-process.
//! - [`pipeline`]: a sequential, table-driven step executor with a tagged
//!   Done / Skipped outcome contract, an "already built" short-circuit, and
//!   failures on the error channel.
//! - [`steps`]: the fixed build sequence (check, create, start, update,
//!   depends, package, test, archive, stop, remove) run against one shared
//!   [`BuildContext`].
//!
//! Every step probes daemon state before acting and no-ops when the desired
//! end-state already holds, so re-invoking a failed or interrupted build is
//! always safe.

pub mod context;
pub mod docker;
pub mod errors;
pub mod pipeline;
pub mod steps;
pub mod trace;

pub use context::{BuildContext, Naming, SourcePackage};
pub use docker::{CreateArgs, DockerClient, ExecArgs};
pub use errors::{DebboxError, DebboxResult};
pub use pipeline::{Completion, Outcome, Pipeline, RunReport, Step, StepReport};

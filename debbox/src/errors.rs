//! Crate-wide error type.
//!
//! Daemon errors are surfaced verbatim; the pipeline adds step context on the
//! way out. There are no retries anywhere in this crate; a failed run is
//! re-invoked as a whole, which is safe because every step is idempotent.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type DebboxResult<T> = std::result::Result<T, DebboxError>;

#[derive(Debug, Error)]
pub enum DebboxError {
    /// Any failure reported by the Docker daemon, including unreachable
    /// daemons and state conflicts (e.g. removing a running container).
    #[error("docker daemon: {0}")]
    Daemon(#[from] bollard::errors::Error),

    /// The daemon speaks an API version older than the supported floor.
    #[error("docker API version {reported} is older than the supported minimum {minimum}")]
    UnsupportedApiVersion { reported: String, minimum: String },

    /// A batch-executed command exited non-zero.
    #[error("command exited with status {0}")]
    CommandFailed(i64),

    /// Raw-mode switch or terminal size query failed. Fatal to the
    /// interactive session only.
    #[error("terminal: {0}")]
    Terminal(std::io::Error),

    /// Host filesystem failure (archive copies, index file creation).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A step failed; wraps the underlying cause with the step name.
    #[error("step {step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<DebboxError>,
    },
}

impl DebboxError {
    /// Wrap an error with the name of the step it occurred in.
    pub fn in_step(self, step: &'static str) -> Self {
        DebboxError::Step {
            step,
            source: Box::new(self),
        }
    }
}

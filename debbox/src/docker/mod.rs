//! Thin, stateless wrapper over the Docker Engine API.
//!
//! All container state lives in the daemon; every probe re-queries it, which
//! keeps the driver crash-safe and the steps above it idempotent. The client
//! is an explicitly constructed value passed by reference; there is no
//! process-wide singleton.

pub mod container;
mod exec;
mod network;
pub mod terminal;

pub use container::CreateArgs;
pub use exec::ExecArgs;
pub use network::BUILD_NETWORK;

use bollard::{Docker, API_DEFAULT_VERSION};

use crate::errors::{DebboxError, DebboxResult};

/// Minimum daemon API version the driver will talk to.
pub const MIN_API_VERSION: (u64, u64) = (1, 30);

const DAEMON_TIMEOUT_SECS: u64 = 120;

/// Handle to one Docker daemon. Cheap to clone; all operations borrow it.
#[derive(Clone)]
pub struct DockerClient {
    client: Docker,
}

impl DockerClient {
    /// Connect using the platform defaults (`DOCKER_HOST` or the local
    /// socket) and reject daemons older than [`MIN_API_VERSION`].
    pub async fn connect() -> DebboxResult<Self> {
        let client = DockerClient {
            client: Docker::connect_with_local_defaults()?,
        };
        client.verify_server_version().await?;
        Ok(client)
    }

    /// Connect to an explicit Unix socket. No request is made until the
    /// first operation; callers wanting the version floor enforced up front
    /// call [`DockerClient::verify_server_version`].
    pub fn connect_with_socket(path: &str) -> DebboxResult<Self> {
        Ok(DockerClient {
            client: Docker::connect_with_socket(path, DAEMON_TIMEOUT_SECS, API_DEFAULT_VERSION)?,
        })
    }

    /// Ask the daemon for its API version and reject anything older than
    /// [`MIN_API_VERSION`].
    pub async fn verify_server_version(&self) -> DebboxResult<()> {
        let version = self.client.version().await?;
        let reported = version.api_version.unwrap_or_default();
        if !api_version_at_least(&reported, MIN_API_VERSION) {
            return Err(DebboxError::UnsupportedApiVersion {
                reported,
                minimum: format!("{}.{}", MIN_API_VERSION.0, MIN_API_VERSION.1),
            });
        }
        Ok(())
    }

    pub(crate) fn raw(&self) -> &Docker {
        &self.client
    }
}

/// Compare a daemon-reported `major.minor` version string against a floor.
/// Unparseable strings fail the check.
fn api_version_at_least(reported: &str, floor: (u64, u64)) -> bool {
    let mut parts = reported.splitn(2, '.');
    let major = parts.next().and_then(|p| p.parse::<u64>().ok());
    let minor = parts.next().and_then(|p| p.parse::<u64>().ok());
    match (major, minor) {
        (Some(major), Some(minor)) => (major, minor) >= floor,
        _ => false,
    }
}

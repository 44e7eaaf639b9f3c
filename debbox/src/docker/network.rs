//! Network attachment toggle.
//!
//! The Exec Channel calls [`DockerClient::set_network_attached`] before every
//! command, so each exec declares its own network posture instead of relying
//! on whatever the previous command left behind. The packaging step runs
//! detached; setup steps run attached.

use bollard::container::InspectContainerOptions;
use bollard::models::EndpointSettings;
use bollard::network::{ConnectNetworkOptions, DisconnectNetworkOptions};

use super::DockerClient;
use crate::errors::DebboxResult;

/// The single well-known network builds attach to.
pub const BUILD_NETWORK: &str = "bridge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NetworkAction {
    Connect,
    Disconnect,
}

/// Decide what to do given actual and desired attachment. `None` means the
/// desired state already holds.
fn plan(attached: bool, want: bool) -> Option<NetworkAction> {
    match (attached, want) {
        (false, true) => Some(NetworkAction::Connect),
        (true, false) => Some(NetworkAction::Disconnect),
        _ => None,
    }
}

impl DockerClient {
    /// Whether the container is currently attached to [`BUILD_NETWORK`].
    pub async fn is_network_attached(&self, name: &str) -> DebboxResult<bool> {
        let inspect = self
            .raw()
            .inspect_container(name, None::<InspectContainerOptions>)
            .await?;

        Ok(inspect
            .network_settings
            .and_then(|settings| settings.networks)
            .map(|networks| networks.contains_key(BUILD_NETWORK))
            .unwrap_or(false))
    }

    /// Connect or disconnect [`BUILD_NETWORK`] so that attachment matches
    /// `want`. No-op when it already does.
    pub async fn set_network_attached(&self, name: &str, want: bool) -> DebboxResult<()> {
        let attached = self.is_network_attached(name).await?;

        match plan(attached, want) {
            Some(NetworkAction::Connect) => {
                tracing::debug!(container = name, "attaching to {}", BUILD_NETWORK);
                let options = ConnectNetworkOptions {
                    container: name.to_string(),
                    endpoint_config: EndpointSettings::default(),
                };
                self.raw().connect_network(BUILD_NETWORK, options).await?;
            }
            Some(NetworkAction::Disconnect) => {
                tracing::debug!(container = name, "detaching from {}", BUILD_NETWORK);
                let options = DisconnectNetworkOptions {
                    container: name.to_string(),
                    force: false,
                };
                self.raw()
                    .disconnect_network(BUILD_NETWORK, options)
                    .await?;
            }
            None => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_acts_only_on_state_change() {
        assert_eq!(plan(false, true), Some(NetworkAction::Connect));
        assert_eq!(plan(true, false), Some(NetworkAction::Disconnect));
        assert_eq!(plan(true, true), None);
        assert_eq!(plan(false, false), None);
    }

    #[test]
    fn toggle_is_idempotent() {
        // Applying the plan once reaches the desired state; planning again
        // from there yields no further action.
        for want in [true, false] {
            for attached in [true, false] {
                let after = match plan(attached, want) {
                    Some(NetworkAction::Connect) => true,
                    Some(NetworkAction::Disconnect) => false,
                    None => attached,
                };
                assert_eq!(after, want);
                assert_eq!(plan(after, want), None);
            }
        }
    }
}

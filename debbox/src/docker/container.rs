//! Container lifecycle operations and state probes.
//!
//! The listing API has no exact-name filter that behaves the same across
//! daemon versions, so every probe lists all containers and matches
//! client-side on the normalized name (leading `/` stripped). Probes never
//! cache: each call re-reads authoritative daemon state.

use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions,
    RemoveContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::models::{
    ContainerSummary, HostConfig, Mount, MountPoint, MountPointTypeEnum, MountTypeEnum,
};

use super::DockerClient;
use crate::errors::DebboxResult;

/// Daemon container states as reported by the list endpoint.
pub mod state {
    pub const CREATED: &str = "created";
    pub const RUNNING: &str = "running";
    pub const EXITED: &str = "exited";
    pub const RESTARTING: &str = "restarting";
    pub const PAUSED: &str = "paused";
    pub const DEAD: &str = "dead";
}

/// Grace period the daemon waits before force-killing a stopping container.
/// Nothing inside a build container holds state worth flushing; teardown is
/// immediate by intent.
pub const STOP_TIMEOUT_SECS: i64 = 0;

/// Arguments for [`DockerClient::create_container`].
#[derive(Debug, Clone)]
pub struct CreateArgs {
    pub name: String,
    pub image: String,
    pub mounts: Vec<Mount>,
    /// `uid:gid` the container runs as.
    pub user: String,
}

impl DockerClient {
    async fn list_all(&self) -> DebboxResult<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        Ok(self.raw().list_containers(Some(options)).await?)
    }

    /// Whether a container with this exact name exists, in any state.
    pub async fn container_exists(&self, name: &str) -> DebboxResult<bool> {
        Ok(find_state(&self.list_all().await?, name).is_some())
    }

    /// Whether the container exists and is in the `running` state.
    pub async fn is_container_running(&self, name: &str) -> DebboxResult<bool> {
        Ok(find_state(&self.list_all().await?, name).is_some_and(|s| s == state::RUNNING))
    }

    /// Logical negation of running; an absent container counts as stopped.
    pub async fn is_container_stopped(&self, name: &str) -> DebboxResult<bool> {
        Ok(!self.is_container_running(name).await?)
    }

    /// Create a container. Fails if the name is already taken; callers probe
    /// [`DockerClient::container_exists`] first to keep their step idempotent.
    /// Mount source directories must already exist on the host.
    pub async fn create_container(&self, args: CreateArgs) -> DebboxResult<()> {
        let options = CreateContainerOptions {
            name: args.name.as_str(),
            platform: None,
        };
        let config = Config {
            image: Some(args.image.as_str()),
            user: Some(args.user.as_str()),
            host_config: Some(HostConfig {
                mounts: Some(args.mounts),
                ..Default::default()
            }),
            ..Default::default()
        };

        self.raw().create_container(Some(options), config).await?;
        Ok(())
    }

    /// Start a created container. Not no-op-safe on its own; callers guard
    /// with [`DockerClient::is_container_running`].
    pub async fn start_container(&self, name: &str) -> DebboxResult<()> {
        self.raw()
            .start_container(name, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    /// Request a stop with the (intentionally immediate) grace period.
    pub async fn stop_container(&self, name: &str) -> DebboxResult<()> {
        self.raw()
            .stop_container(
                name,
                Some(StopContainerOptions {
                    t: STOP_TIMEOUT_SECS,
                }),
            )
            .await?;
        Ok(())
    }

    /// Remove a stopped container. The daemon rejects removal while running.
    pub async fn remove_container(&self, name: &str) -> DebboxResult<()> {
        self.raw()
            .remove_container(name, None::<RemoveContainerOptions>)
            .await?;
        Ok(())
    }

    /// Names of all containers starting with `prefix`, used for bulk cleanup
    /// of historical builds.
    pub async fn containers_with_prefix(&self, prefix: &str) -> DebboxResult<Vec<String>> {
        Ok(names_with_prefix(&self.list_all().await?, prefix))
    }

    /// Reflect back the mounts attached to a container, translating the
    /// daemon's read/write flag into the read-only flag used here.
    pub async fn container_mounts(&self, name: &str) -> DebboxResult<Vec<Mount>> {
        let inspect = self
            .raw()
            .inspect_container(name, None::<InspectContainerOptions>)
            .await?;

        Ok(inspect
            .mounts
            .unwrap_or_default()
            .iter()
            .map(mount_from_point)
            .collect())
    }
}

/// The daemon prefixes every name with `/`.
fn normalize(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

fn has_name(summary: &ContainerSummary, name: &str) -> bool {
    summary
        .names
        .iter()
        .flatten()
        .any(|n| normalize(n) == name)
}

fn find_state<'a>(list: &'a [ContainerSummary], name: &str) -> Option<&'a str> {
    list.iter()
        .find(|summary| has_name(summary, name))
        .map(|summary| summary.state.as_deref().unwrap_or_default())
}

fn names_with_prefix(list: &[ContainerSummary], prefix: &str) -> Vec<String> {
    list.iter()
        .flat_map(|summary| summary.names.iter().flatten())
        .map(|n| normalize(n))
        .filter(|n| n.starts_with(prefix))
        .map(str::to_string)
        .collect()
}

fn mount_from_point(point: &MountPoint) -> Mount {
    Mount {
        source: point.source.clone(),
        target: point.destination.clone(),
        typ: point.typ.clone().map(mount_type),
        read_only: Some(!point.rw.unwrap_or(true)),
        ..Default::default()
    }
}

/// The inspect and create endpoints model the mount type as two distinct
/// enums with the same value set; carry the inspected type over verbatim.
fn mount_type(point_type: MountPointTypeEnum) -> MountTypeEnum {
    match point_type {
        MountPointTypeEnum::EMPTY => MountTypeEnum::EMPTY,
        MountPointTypeEnum::BIND => MountTypeEnum::BIND,
        MountPointTypeEnum::VOLUME => MountTypeEnum::VOLUME,
        MountPointTypeEnum::TMPFS => MountTypeEnum::TMPFS,
        MountPointTypeEnum::NPIPE => MountTypeEnum::NPIPE,
        MountPointTypeEnum::CLUSTER => MountTypeEnum::CLUSTER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, state: &str) -> ContainerSummary {
        ContainerSummary {
            names: Some(vec![format!("/{}", name)]),
            state: Some(state.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn name_matching_strips_leading_slash() {
        let list = vec![summary("debbox_unstable_hello_2.10-3", state::RUNNING)];
        assert_eq!(
            find_state(&list, "debbox_unstable_hello_2.10-3"),
            Some(state::RUNNING)
        );
        // Exact equality: neither prefix nor suffix matches.
        assert_eq!(find_state(&list, "debbox_unstable_hello"), None);
        assert_eq!(find_state(&list, "hello_2.10-3"), None);
    }

    #[test]
    fn running_implies_not_stopped_and_absent_counts_as_stopped() {
        let list = vec![
            summary("a", state::RUNNING),
            summary("b", state::EXITED),
            summary("c", state::CREATED),
        ];

        let running = |name: &str| find_state(&list, name) == Some(state::RUNNING);
        let stopped = |name: &str| !running(name);

        assert!(running("a") && !stopped("a"));
        assert!(!running("b") && stopped("b"));
        assert!(!running("c") && stopped("c"));
        // Absent: not running, stopped.
        assert!(!running("zzz") && stopped("zzz"));
        assert_eq!(find_state(&list, "zzz"), None);
    }

    #[test]
    fn prefix_listing_normalizes_names() {
        let list = vec![
            summary("debbox_unstable_hello_1", state::EXITED),
            summary("debbox_unstable_hello_2", state::RUNNING),
            summary("other", state::EXITED),
        ];
        assert_eq!(
            names_with_prefix(&list, "debbox_"),
            vec!["debbox_unstable_hello_1", "debbox_unstable_hello_2"]
        );
        assert!(names_with_prefix(&list, "nope").is_empty());
    }

    #[test]
    fn mount_translation_flips_rw_into_read_only() {
        let point = MountPoint {
            source: Some("/home/user/src".to_string()),
            destination: Some("/build/source".to_string()),
            rw: Some(true),
            ..Default::default()
        };
        let mount = mount_from_point(&point);
        assert_eq!(mount.read_only, Some(false));
        assert_eq!(mount.target.as_deref(), Some("/build/source"));

        let ro_point = MountPoint {
            rw: Some(false),
            ..Default::default()
        };
        assert_eq!(mount_from_point(&ro_point).read_only, Some(true));
    }

    #[test]
    fn mount_translation_preserves_the_inspected_type() {
        let bind = MountPoint {
            typ: Some(MountPointTypeEnum::BIND),
            ..Default::default()
        };
        assert_eq!(mount_from_point(&bind).typ, Some(MountTypeEnum::BIND));

        let volume = MountPoint {
            typ: Some(MountPointTypeEnum::VOLUME),
            ..Default::default()
        };
        assert_eq!(mount_from_point(&volume).typ, Some(MountTypeEnum::VOLUME));

        let untyped = MountPoint::default();
        assert_eq!(mount_from_point(&untyped).typ, None);
    }
}

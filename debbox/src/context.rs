//! Shared build context and naming boundary types.
//!
//! Package metadata and naming are produced by external collaborators
//! (changelog parsing, CLI); the core only carries them around. `Naming` is a
//! dumb string/path builder; the container lifecycle code treats the derived
//! names as opaque keys.

use std::path::{Path, PathBuf};

use crate::docker::DockerClient;
use crate::errors::DebboxResult;

/// Environment variable holding extra flags appended to `dpkg-buildpackage`.
/// Read once at context construction.
pub const DPKG_FLAGS_ENV: &str = "DEBBOX_DPKG_BUILDPACKAGE_FLAGS";

/// Where the archive directory is mounted in the container.
pub const CONTAINER_ARCHIVE_DIR: &str = "/archive";
/// Where the build directory is mounted in the container.
pub const CONTAINER_BUILD_DIR: &str = "/build";
/// Where the package source is mounted in the container.
pub const CONTAINER_SOURCE_DIR: &str = "/build/source";
/// Where the apt cache is mounted in the container.
pub const CONTAINER_CACHE_DIR: &str = "/var/cache/apt";

/// Metadata of the source package being built. Parsed elsewhere; opaque here.
#[derive(Debug, Clone)]
pub struct SourcePackage {
    pub name: String,
    pub version: String,
    pub distribution: String,
}

/// Derived names and host directories for one build.
#[derive(Debug, Clone)]
pub struct Naming {
    /// Unique container name, also used as the prefix key for bulk cleanup.
    pub container: String,
    /// Image the container is created from.
    pub image: String,
    /// Host directory holding the package source tree.
    pub source_dir: PathBuf,
    /// Host scratch directory where build outputs land.
    pub build_dir: PathBuf,
    /// Host apt cache directory, shared between builds of one distribution.
    pub cache_dir: PathBuf,
    /// Host archive directory for the target distribution.
    pub archive_dir: PathBuf,
    /// Directory under `archive_dir` holding this package/version's artifacts.
    pub archive_package_dir: PathBuf,
}

impl Naming {
    pub fn new(
        source: &SourcePackage,
        source_dir: impl Into<PathBuf>,
        build_base: &Path,
        cache_base: &Path,
        archive_base: &Path,
    ) -> Self {
        let version = sanitize(&source.version);
        let dist = sanitize(&source.distribution);
        let tag = format!("debbox_{}_{}_{}", dist, source.name, version);

        let archive_dir = archive_base.join(&dist);
        let archive_package_dir = archive_dir.join(format!("{}_{}", source.name, version));

        Naming {
            image: format!("debbox:{}", dist),
            source_dir: source_dir.into(),
            build_dir: build_base.join(&tag),
            cache_dir: cache_base.join(format!("debbox_{}", dist)),
            archive_dir,
            archive_package_dir,
            container: tag,
        }
    }

    /// Create the host-side mount sources that must exist before the
    /// container is created. The source directory is the caller's tree and
    /// is never created here.
    pub fn prepare_host_dirs(&self) -> DebboxResult<()> {
        std::fs::create_dir_all(&self.build_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(&self.archive_dir)?;
        Ok(())
    }
}

/// Replace characters that are valid in Debian versions but not in container
/// names or image tags.
fn sanitize(s: &str) -> String {
    s.replace([':', '~'], "-")
}

/// Everything a step needs to act: the daemon client, the package being
/// built, derived naming, and the few process-wide inputs read once up front.
pub struct BuildContext {
    pub docker: DockerClient,
    pub source: SourcePackage,
    pub naming: Naming,
    /// Extra `dpkg-buildpackage` flags from [`DPKG_FLAGS_ENV`].
    pub dpkg_flags: String,
    /// `uid:gid` the container and build commands run as.
    pub user: String,
    /// When false, the test step's commands are skip-flagged.
    pub run_tests: bool,
}

impl BuildContext {
    pub fn new(docker: DockerClient, source: SourcePackage, naming: Naming) -> Self {
        let uid = nix::unistd::Uid::current();
        let gid = nix::unistd::Gid::current();

        BuildContext {
            docker,
            source,
            naming,
            dpkg_flags: std::env::var(DPKG_FLAGS_ENV).unwrap_or_default(),
            user: format!("{}:{}", uid, gid),
            run_tests: true,
        }
    }

    /// Bind mounts established at container creation time.
    pub fn mounts(&self) -> Vec<bollard::models::Mount> {
        [
            (&self.naming.build_dir, CONTAINER_BUILD_DIR, false),
            (&self.naming.source_dir, CONTAINER_SOURCE_DIR, false),
            (&self.naming.cache_dir, CONTAINER_CACHE_DIR, false),
            (&self.naming.archive_dir, CONTAINER_ARCHIVE_DIR, false),
        ]
        .into_iter()
        .map(|(source, target, read_only)| bollard::models::Mount {
            source: Some(source.to_string_lossy().into_owned()),
            target: Some(target.to_string()),
            typ: Some(bollard::models::MountTypeEnum::BIND),
            read_only: Some(read_only),
            ..Default::default()
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SourcePackage {
        SourcePackage {
            name: "hello".to_string(),
            version: "2.10-3".to_string(),
            distribution: "unstable".to_string(),
        }
    }

    fn naming(source: &SourcePackage) -> Naming {
        Naming::new(
            source,
            "/home/user/hello",
            Path::new("/tmp/debbox"),
            Path::new("/home/user/.cache"),
            Path::new("/home/user/debbox"),
        )
    }

    #[test]
    fn names_derive_from_package_metadata() {
        let n = naming(&sample());
        assert_eq!(n.container, "debbox_unstable_hello_2.10-3");
        assert_eq!(n.image, "debbox:unstable");
        assert_eq!(
            n.archive_package_dir,
            PathBuf::from("/home/user/debbox/unstable/hello_2.10-3")
        );
    }

    #[test]
    fn version_epoch_and_tilde_are_sanitized() {
        let mut source = sample();
        source.version = "1:2.10~rc1-1".to_string();
        let n = naming(&source);
        assert_eq!(n.container, "debbox_unstable_hello_1-2.10-rc1-1");
    }

    #[test]
    fn mounts_cover_all_container_targets() {
        let docker = DockerClient::connect_with_socket("/nonexistent/debbox-test.sock").unwrap();
        let source = sample();
        let naming = naming(&source);
        let ctx = BuildContext::new(docker, source, naming);

        let mounts = ctx.mounts();
        let targets: Vec<_> = mounts.iter().filter_map(|m| m.target.as_deref()).collect();
        assert_eq!(
            targets,
            vec![
                CONTAINER_BUILD_DIR,
                CONTAINER_SOURCE_DIR,
                CONTAINER_CACHE_DIR,
                CONTAINER_ARCHIVE_DIR
            ]
        );
        assert!(mounts
            .iter()
            .all(|m| m.typ == Some(bollard::models::MountTypeEnum::BIND)));
    }

    #[test]
    fn context_user_is_uid_gid_pair() {
        let docker = DockerClient::connect_with_socket("/nonexistent/debbox-test.sock").unwrap();
        let source = sample();
        let naming = naming(&source);
        let ctx = BuildContext::new(docker, source, naming);
        let (uid, gid) = ctx.user.split_once(':').expect("uid:gid");
        assert!(uid.parse::<u32>().is_ok());
        assert!(gid.parse::<u32>().is_ok());
    }
}

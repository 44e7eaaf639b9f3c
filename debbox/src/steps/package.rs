//! Step: the actual package build.
//!
//! The one step that runs with the network detached, so the build cannot
//! silently fetch anything the declared dependencies don't provide.

use async_trait::async_trait;

use crate::context::{BuildContext, CONTAINER_SOURCE_DIR};
use crate::docker::ExecArgs;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};
use crate::steps::ensure_packages_index;

pub struct PackageStep;

/// `dpkg-buildpackage` plus whatever extra flags the context carries.
fn build_command(flags: &str) -> String {
    if flags.is_empty() {
        "dpkg-buildpackage".to_string()
    } else {
        format!("dpkg-buildpackage {}", flags)
    }
}

#[async_trait]
impl Step<BuildContext> for PackageStep {
    fn name(&self) -> &'static str {
        "package"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Runs `dpkg-buildpackage` in the container with the network",
            "detached. Extra flags are taken from the",
            "DEBBOX_DPKG_BUILDPACKAGE_FLAGS environment variable.",
        ]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!(package = %ctx.source.name, "building package");

        ensure_packages_index(&ctx.naming.archive_dir)?;

        ctx.docker
            .container_exec(ExecArgs {
                name: ctx.naming.container.clone(),
                cmd: build_command(&ctx.dpkg_flags),
                work_dir: CONTAINER_SOURCE_DIR.to_string(),
                network: false,
                ..Default::default()
            })
            .await?;

        Ok(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_appended_when_present() {
        assert_eq!(build_command(""), "dpkg-buildpackage");
        assert_eq!(
            build_command("-us -uc -b"),
            "dpkg-buildpackage -us -uc -b"
        );
    }
}

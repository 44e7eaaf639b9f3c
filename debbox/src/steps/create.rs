//! Step: container creation.

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::docker::CreateArgs;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};

pub struct CreateStep;

#[async_trait]
impl Step<BuildContext> for CreateStep {
    fn name(&self) -> &'static str {
        "create"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Creates the build container with source, build, cache and",
            "archive directories bind-mounted, running as the invoking user.",
        ]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!(container = %ctx.naming.container, "creating container");

        if ctx.docker.container_exists(&ctx.naming.container).await? {
            return Ok(Outcome::Skipped);
        }

        ctx.naming.prepare_host_dirs()?;

        ctx.docker
            .create_container(CreateArgs {
                name: ctx.naming.container.clone(),
                image: ctx.naming.image.clone(),
                mounts: ctx.mounts(),
                user: ctx.user.clone(),
            })
            .await?;

        Ok(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::{testsupport, DockerClient};
    use crate::steps::testutil;
    use tempfile::tempdir;

    #[tokio::test]
    async fn existing_container_is_not_created_again() {
        let dir = tempdir().unwrap();
        let socket = dir.path().join("daemon.sock");
        // The exited container still exists, which is enough to skip; a
        // create request after the probe would fail the step.
        let daemon = testsupport::canned_daemon(
            &socket,
            vec![r#"[{"Names":["/debbox_unstable_hello_2.10-3"],"State":"exited"}]"#.to_string()],
        );

        let mut ctx = testutil::context(dir.path());
        ctx.docker = DockerClient::connect_with_socket(socket.to_str().unwrap()).unwrap();

        assert_eq!(CreateStep.run(&ctx).await.unwrap(), Outcome::Skipped);
        assert_eq!(daemon.await.unwrap(), 1);
    }
}

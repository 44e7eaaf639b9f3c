//! Step: container removal.

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};

pub struct RemoveStep;

#[async_trait]
impl Step<BuildContext> for RemoveStep {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Removes the stopped build container."]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!(container = %ctx.naming.container, "removing container");

        if !ctx.docker.container_exists(&ctx.naming.container).await? {
            return Ok(Outcome::Skipped);
        }

        ctx.docker.remove_container(&ctx.naming.container).await?;

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
    async fn absent_container_is_not_removed() {
        let dir = tempdir().unwrap();
        let socket = dir.path().join("daemon.sock");
        let daemon = testsupport::canned_daemon(&socket, vec!["[]".to_string()]);

        let mut ctx = testutil::context(dir.path());
        ctx.docker = DockerClient::connect_with_socket(socket.to_str().unwrap()).unwrap();

        assert_eq!(RemoveStep.run(&ctx).await.unwrap(), Outcome::Skipped);
        assert_eq!(daemon.await.unwrap(), 1);
    }
}

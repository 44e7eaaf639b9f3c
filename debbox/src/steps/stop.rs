//! Step: container stop.

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};

pub struct StopStep;

#[async_trait]
impl Step<BuildContext> for StopStep {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Stops the build container, with an immediate grace period."]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!(container = %ctx.naming.container, "stopping container");

        if ctx
            .docker
            .is_container_stopped(&ctx.naming.container)
            .await?
        {
            return Ok(Outcome::Skipped);
        }

        ctx.docker.stop_container(&ctx.naming.container).await?;

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
    async fn absent_container_counts_as_stopped() {
        let dir = tempdir().unwrap();
        let socket = dir.path().join("daemon.sock");
        // The probe sees no containers at all; a stop request after it
        // would fail because the daemon is gone.
        let daemon = testsupport::canned_daemon(&socket, vec!["[]".to_string()]);

        let mut ctx = testutil::context(dir.path());
        ctx.docker = DockerClient::connect_with_socket(socket.to_str().unwrap()).unwrap();

        assert_eq!(StopStep.run(&ctx).await.unwrap(), Outcome::Skipped);
        assert_eq!(daemon.await.unwrap(), 1);
    }
}

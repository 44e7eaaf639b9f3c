//! Step: container start.

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};

pub struct StartStep;

#[async_trait]
impl Step<BuildContext> for StartStep {
    fn name(&self) -> &'static str {
        "start"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Starts the build container."]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!(container = %ctx.naming.container, "starting container");

        if ctx
            .docker
            .is_container_running(&ctx.naming.container)
            .await?
        {
            return Ok(Outcome::Skipped);
        }

        ctx.docker.start_container(&ctx.naming.container).await?;

        Ok(Outcome::Done)
    }
}

//! Step: apt index refresh.

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::docker::ExecArgs;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};
use crate::steps::ensure_packages_index;

pub struct UpdateStep;

#[async_trait]
impl Step<BuildContext> for UpdateStep {
    fn name(&self) -> &'static str {
        "update"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Runs `apt-get update` in the container, with the archive",
            "directory acting as a local repository.",
        ]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!("updating apt indexes");

        ensure_packages_index(&ctx.naming.archive_dir)?;

        ctx.docker
            .container_exec(ExecArgs {
                name: ctx.naming.container.clone(),
                cmd: "apt-get update".to_string(),
                as_root: true,
                network: true,
                ..Default::default()
            })
            .await?;

        Ok(Outcome::Done)
    }
}

//! Step: build dependency installation.

use async_trait::async_trait;

use crate::context::{BuildContext, CONTAINER_SOURCE_DIR};
use crate::docker::ExecArgs;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};

const INSTALL_CMD: &str =
    "mk-build-deps --install --remove --tool 'apt-get --no-install-recommends --yes' debian/control";

pub struct DependsStep;

#[async_trait]
impl Step<BuildContext> for DependsStep {
    fn name(&self) -> &'static str {
        "depends"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Installs the package's build dependencies in the container."]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!("installing build dependencies");

        ctx.docker
            .container_exec(ExecArgs {
                name: ctx.naming.container.clone(),
                cmd: INSTALL_CMD.to_string(),
                work_dir: CONTAINER_SOURCE_DIR.to_string(),
                as_root: true,
                network: true,
                ..Default::default()
            })
            .await?;

        Ok(Outcome::Done)
    }
}

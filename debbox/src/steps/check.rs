//! Step: archive check.

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};

pub struct CheckStep;

#[async_trait]
impl Step<BuildContext> for CheckStep {
    fn name(&self) -> &'static str {
        "check"
    }

    fn description(&self) -> &'static [&'static str] {
        &[
            "Checks if the to-be-built package is already built and archived.",
            "If it is, the whole run stops successfully before anything else.",
            "Exclude this step to build anyway.",
        ]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!("checking archive");

        if ctx.naming.archive_package_dir.exists() {
            Ok(Outcome::AlreadyBuilt)
        } else {
            Ok(Outcome::Done)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::testutil;
    use tempfile::tempdir;

    #[tokio::test]
    async fn absent_artifact_means_done() {
        let dir = tempdir().unwrap();
        let ctx = testutil::context(dir.path());
        assert_eq!(CheckStep.run(&ctx).await.unwrap(), Outcome::Done);
    }

    #[tokio::test]
    async fn present_artifact_short_circuits() {
        let dir = tempdir().unwrap();
        let ctx = testutil::context(dir.path());
        std::fs::create_dir_all(&ctx.naming.archive_package_dir).unwrap();
        assert_eq!(CheckStep.run(&ctx).await.unwrap(), Outcome::AlreadyBuilt);
    }
}

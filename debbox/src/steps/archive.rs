//! Step: artifact archiving.

use std::fs;
use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::errors::DebboxResult;
use crate::pipeline::{Outcome, Step};

pub struct ArchiveStep;

/// Copy the regular files from the build directory into `dest`, creating it.
/// Build outputs (`.deb`, `.dsc`, `.changes`, tarballs) land as plain files
/// next to the mounted source subdirectory, which is skipped.
fn archive_artifacts(build_dir: &Path, dest: &Path) -> io::Result<usize> {
    fs::create_dir_all(dest)?;

    let mut copied = 0;
    for entry in fs::read_dir(build_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::copy(entry.path(), dest.join(entry.file_name()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[async_trait]
impl Step<BuildContext> for ArchiveStep {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn description(&self) -> &'static [&'static str] {
        &["Moves built artifacts from the build directory to the archive."]
    }

    async fn run(&self, ctx: &BuildContext) -> DebboxResult<Outcome> {
        tracing::info!(archive = %ctx.naming.archive_package_dir.display(), "archiving artifacts");

        if ctx.naming.archive_package_dir.exists() {
            return Ok(Outcome::Skipped);
        }

        let copied = archive_artifacts(&ctx.naming.build_dir, &ctx.naming.archive_package_dir)?;
        tracing::info!(copied, "artifacts archived");

        Ok(Outcome::Done)
    }
}

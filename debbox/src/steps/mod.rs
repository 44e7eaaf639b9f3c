//! The fixed build sequence.
//!
//! Steps run strictly in this order: check, create, start, update, depends,
//! package, test, archive, stop, remove. Each step probes daemon or
//! filesystem state before acting and skips when its end-state already
//! holds, so the whole sequence is safe to re-run.

mod archive;
mod check;
mod create;
mod depends;
mod package;
mod remove;
mod start;
mod stop;
mod update;

pub use archive::ArchiveStep;
pub use check::CheckStep;
pub use create::CreateStep;
pub use depends::DependsStep;
pub use package::PackageStep;
pub use remove::RemoveStep;
pub use start::StartStep;
pub use stop::StopStep;
pub use test::TestStep;
pub use update::UpdateStep;

use std::fs;
use std::path::{Path, PathBuf};

use crate::context::BuildContext;
use crate::errors::DebboxResult;
use crate::pipeline::{BoxedStep, Pipeline};

/// The standard steps in execution order.
pub fn standard_steps() -> Vec<BoxedStep<BuildContext>> {
    vec![
        Box::new(CheckStep),
        Box::new(CreateStep),
        Box::new(StartStep),
        Box::new(UpdateStep),
        Box::new(DependsStep),
        Box::new(PackageStep),
        Box::new(TestStep),
        Box::new(ArchiveStep),
        Box::new(StopStep),
        Box::new(RemoveStep),
    ]
}

/// A pipeline over [`standard_steps`].
pub fn standard_pipeline() -> Pipeline<BuildContext> {
    Pipeline::new(standard_steps())
}

/// Apt inside the container treats `/archive` as a local repository; it needs
/// a `Packages` index file to exist even when empty. Returns its path.
pub(crate) fn ensure_packages_index(archive_dir: &Path) -> DebboxResult<PathBuf> {
    let index = archive_dir.join("Packages");
    if !index.exists() {
        fs::create_dir_all(archive_dir)?;
        fs::File::create(&index)?;
    }
    Ok(index)
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn standard_order_is_fixed() {
        let names: Vec<_> = standard_steps().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "check", "create", "start", "update", "depends", "package", "test", "archive",
                "stop", "remove"
            ]
        );
    }

    #[test]
    fn every_step_is_described() {
        for step in standard_steps() {
            assert!(
                !step.description().is_empty(),
                "step {} has no description",
                step.name()
            );
        }
    }

    #[test]
    fn packages_index_is_created_once() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("archive");

        let index = ensure_packages_index(&archive).unwrap();
        assert!(index.is_file());

        std::fs::write(&index, b"Package: hello\n").unwrap();
        ensure_packages_index(&archive).unwrap();
        // Existing index is left alone.
        assert_eq!(std::fs::read(&index).unwrap(), b"Package: hello\n");
    }
}

use std::{io::ErrorKind, path::Path};

use crate::foundation::error::{DaybreakError, DaybreakResult};

/// Remove every path in `paths`, best effort.
///
/// Missing files are not an error. Any other failure is logged and swallowed.
/// Returns how many files were actually removed.
pub fn remove_artifacts<'a>(paths: impl IntoIterator<Item = &'a Path>) -> usize {
    let mut removed = 0;
    for path in paths {
        match remove_artifact(path) {
            Ok(true) => {
                tracing::info!(path = %path.display(), "removed run artifact");
                removed += 1;
            }
            Ok(false) => {}
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "cleanup failed"),
        }
    }
    removed
}

/// Remove one file. `Ok(false)` when it was already gone.
pub(crate) fn remove_artifact(path: &Path) -> DaybreakResult<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DaybreakError::cleanup(format!(
            "remove '{}': {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/cleanup.rs"]
mod tests;

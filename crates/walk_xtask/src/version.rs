//! Version strings derived from git tags.

use std::path::Path;

use git2::{DescribeFormatOptions, DescribeOptions, Repository};
use serde::Serialize;

use crate::error::{XtaskError, XtaskResult};

/// Abbreviated commit id length used in the long form.
const ABBREV: u32 = 7;

/// Both forms of the version derived from the nearest tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    /// `<tag>-<distance>-g<id>[-dirty]`, or just `<tag>[-dirty]` on the tag
    /// itself. Falls back to the abbreviated commit id when nothing is tagged.
    pub dirty: String,
    /// Nearest tag alone, or the abbreviated commit id when nothing is tagged.
    pub abbreviated: String,
}

/// Describe the repository containing `path`.
///
/// # Errors
///
/// Returns [`XtaskError::NoRepository`] outside a repository, and a git error
/// when `HEAD` has no commits.
pub fn describe(path: &Path) -> XtaskResult<Version> {
    let repo =
        Repository::discover(path).map_err(|_| XtaskError::NoRepository(path.to_path_buf()))?;

    let mut fallback = DescribeOptions::new();
    fallback.describe_tags().show_commit_oid_as_fallback(true);
    let description = repo.describe(&fallback)?;

    let mut long = DescribeFormatOptions::new();
    long.abbreviated_size(ABBREV).dirty_suffix("-dirty");
    let dirty = description.format(Some(&long))?;

    let mut tags_only = DescribeOptions::new();
    tags_only.describe_tags();
    let abbreviated = match repo.describe(&tags_only) {
        Ok(tagged) => {
            let mut short = DescribeFormatOptions::new();
            short.abbreviated_size(0);
            tagged.format(Some(&short))?
        }
        Err(_) => short_head_id(&repo)?,
    };

    Ok(Version { dirty, abbreviated })
}

fn short_head_id(repo: &Repository) -> XtaskResult<String> {
    let head = repo.head()?.peel_to_commit()?;
    let id = head.id().to_string();
    Ok(id[..ABBREV as usize].to_string())
}

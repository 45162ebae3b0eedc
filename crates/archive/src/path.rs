//! Archive entry path validation.
//!
//! Entry names inside an archive are attacker-controlled. Every name is
//! resolved against the workspace root before anything is written, so that an
//! entry like `../../.bashrc` can never land outside the workspace.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Resolves an archive entry name to a path relative to the workspace root.
///
/// Both `/` and `\` separate segments, since archives built on Windows
/// often use the latter. Leading separators and `.` segments are dropped and
/// `..` may only climb back out of directories the name itself entered.
///
/// A name that resolves to the root itself (`/`, `./`) is reported as
/// [`ErrorKind::EmptyEntryName`], which callers can skip for directory
/// entries. Null bytes and a leading drive prefix (`C:`) are rejected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use cbnorm_archive::validate_path;
/// assert!(validate_path("ComicInfo.xml").is_ok());
/// assert!(validate_path("pages/../page01.jpg").is_ok());
/// assert!(validate_path("../escape.jpg").is_err());
/// assert!(validate_path("a/../../b").is_err());
/// assert!(validate_path("./").is_err());
/// assert_eq!(validate_path("/pages/./01.jpg").unwrap(), Path::new("pages/01.jpg"));
/// assert_eq!(validate_path("Issue 1\\02.jpg").unwrap(), Path::new("Issue 1/02.jpg"));
/// ```
pub fn validate(name: &str) -> Result<PathBuf> {
    let invalid = || ErrorKind::InvalidPath(PathBuf::from(name));
    let mut segments: Vec<&str> = Vec::new();
    for (index, segment) in name.split(['/', '\\']).enumerate() {
        match segment {
            s if index == 0 && is_drive(s) => exn::bail!(invalid()),
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
            s if s.contains('\0') => exn::bail!(invalid()),
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        exn::bail!(ErrorKind::EmptyEntryName(name.to_string()));
    }
    Ok(segments.into_iter().collect())
}

fn is_drive(segment: &str) -> bool {
    matches!(segment.as_bytes(), [letter, b':'] if letter.is_ascii_alphabetic())
}

/// Converts a workspace-relative path back into a zip entry name, which always
/// uses `/` as the separator.
pub(crate) fn entry_name(relative: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(s) => match s.to_str() {
                Some(s) => segments.push(s),
                None => exn::bail!(ErrorKind::InvalidPath(relative.to_path_buf())),
            },
            _ => exn::bail!(ErrorKind::InvalidPath(relative.to_path_buf())),
        }
    }
    if segments.is_empty() {
        exn::bail!(ErrorKind::InvalidPath(relative.to_path_buf()));
    }
    Ok(segments.join("/"))
}

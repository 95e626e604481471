//! Dot-path helpers. `colors.blue.500` addresses token `500` in group
//! `colors.blue`; the empty path addresses the root group.

use crate::error::TokenError;

pub const PATH_SEPARATOR: char = '.';

/// Splits a dot-path into segments. The empty path has no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split(PATH_SEPARATOR).collect()
    }
}

pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}

/// Parent of a path; top-level entries have the root (`""`) as parent.
pub fn parent_path(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(path.rsplit_once(PATH_SEPARATOR).map_or("", |(parent, _)| parent))
}

pub fn last_segment(path: &str) -> &str {
    path.rsplit_once(PATH_SEPARATOR).map_or(path, |(_, name)| name)
}

pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// True when `path` equals `ancestor` or lies below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    ancestor.is_empty()
        || path == ancestor
        || (path.starts_with(ancestor) && path[ancestor.len()..].starts_with(PATH_SEPARATOR))
}

/// Checks that `name` can be used as a single path segment.
pub fn validate_name(name: &str) -> Result<(), TokenError> {
    let invalid = |reason: &str| {
        Err(TokenError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return invalid("name must not be empty");
    }
    if name.starts_with('$') {
        return invalid("names starting with '$' are reserved");
    }
    if name.contains(PATH_SEPARATOR) {
        return invalid("names must not contain '.'");
    }
    if name.contains('{') || name.contains('}') {
        return invalid("names must not contain braces");
    }
    Ok(())
}

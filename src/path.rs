use std::path::Path;



/// Replace every `\` with `/`, so entry names look the same no matter which platform built them.
///
/// Nothing else is touched: `.` and `..` segments, doubled slashes, leading and trailing slashes all survive.
///
/// ```
/// assert_eq!(zipper::normalize("a\\b/c"), "a/b/c");
/// assert_eq!(zipper::normalize("/x/../y/"), "/x/../y/");
/// ```
pub fn normalize(path: &str) -> String { path.replace('\\', "/") }

/// [normalize] for host paths.  Non-UTF-8 components are replaced lossily.
pub fn normalize_host(path: &Path) -> String { normalize(&path.to_string_lossy()) }

/// `name` with trailing separators of either kind removed, normalized, and exactly one `/` appended.
pub(crate) fn directory_prefix(name: &str) -> String {
    let mut prefix = normalize(name.trim_end_matches(is_separator));
    prefix.push('/');
    prefix
}

pub(crate) fn is_separator(ch: char) -> bool { ch == '/' || ch == '\\' }

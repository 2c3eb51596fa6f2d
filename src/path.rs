/// Path utilities for validation and normalization
///
/// All functions are **pure**: given same input, always produce same output
/// with no side effects.
use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use signpost::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/foo"));
/// assert!(is_valid_path("/users/123"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("foo")); // Missing leading /
/// assert!(!is_valid_path("/foo/")); // Trailing /
/// assert!(!is_valid_path("/foo//bar")); // Double //
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") {
        return false;
    }

    if path == "/" {
        return true;
    }

    !path.ends_with('/')
}

/// Normalizes a path to canonical form
///
/// Zero-copy on already-valid paths via `Cow::Borrowed`; single allocation
/// otherwise.
///
/// - Trailing slashes: `/foo/` → `/foo`
/// - Duplicate slashes: `/foo//bar` → `/foo/bar`
/// - Missing leading slash: `foo` → `/foo`
/// - Empty input: `` → `/`
///
/// # Examples
///
/// ```
/// use signpost::path::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/foo");
/// assert!(matches!(path, Cow::Borrowed("/foo")));
///
/// assert_eq!(normalize_path("/foo/"), "/foo");
/// assert_eq!(normalize_path("/foo//bar"), "/foo/bar");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    Cow::Owned(format!("/{}", normalized))
}

/// Splits a path into its non-empty segments
///
/// The root path `/` yields no segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/foo"));
        assert!(is_valid_path("/foo/bar"));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(!is_valid_path(""));
        assert!(!is_valid_path("foo"));
        assert!(!is_valid_path("/foo/"));
        assert!(!is_valid_path("/foo//bar"));
    }

    #[test]
    fn test_normalize_is_zero_copy_for_valid() {
        assert!(matches!(normalize_path("/foo/bar"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_normalize_fixes_common_mistakes() {
        assert_eq!(normalize_path("/foo/"), "/foo");
        assert_eq!(normalize_path("foo/bar"), "/foo/bar");
        assert_eq!(normalize_path("/foo///bar"), "/foo/bar");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("/"), Vec::<&str>::new());
        assert_eq!(segments("/foo/bar"), vec!["foo", "bar"]);
        assert_eq!(segments("/foo/"), vec!["foo"]);
    }
}

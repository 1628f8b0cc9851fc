//! Folder path normalization.

/// Strip any trailing slashes and append exactly one.
///
/// An empty folder becomes `"/"`, the server root.
pub fn normalize_folder(folder: &str) -> String {
    format!("{}/", folder.trim_end_matches('/'))
}

/// The folder one level up: the last `segment/` removed.
///
/// A top-level folder's parent is the root `"/"`, which is its own parent.
pub fn parent_folder(folder: &str) -> String {
    let folder = normalize_folder(folder);
    let without_slash = folder.trim_end_matches('/');
    match without_slash.rfind('/') {
        Some(pos) => without_slash[..=pos].to_string(),
        None => "/".to_string(),
    }
}

/// Whether an href names a direct subfolder: one segment and a trailing slash.
pub fn is_subfolder_href(href: &str) -> bool {
    match href.strip_suffix('/') {
        Some(name) => !name.is_empty() && !name.contains('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_appends_one_slash() {
        assert_eq!(normalize_folder("photos"), "photos/");
        assert_eq!(normalize_folder("photos/"), "photos/");
        assert_eq!(normalize_folder("https://host/a/b"), "https://host/a/b/");
        assert_eq!(normalize_folder(""), "/");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["", "x", "x/", "x//", "a/b/c", "/"] {
            let once = normalize_folder(input);
            assert_eq!(normalize_folder(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_normalize_collapses_repeated_trailing_slashes() {
        assert_eq!(normalize_folder("photos///"), "photos/");
        assert_eq!(normalize_folder("/"), "/");
    }

    #[test]
    fn test_parent_folder() {
        assert_eq!(parent_folder("a/b/c/"), "a/b/");
        assert_eq!(parent_folder("a/b"), "a/");
        assert_eq!(parent_folder("a/"), "/");
        assert_eq!(parent_folder("scans"), "/");
        assert_eq!(parent_folder(""), "/");
        assert_eq!(parent_folder("/images/"), "/");
        assert_eq!(parent_folder("/"), "/");
    }

    #[test]
    fn test_subfolder_href() {
        assert!(is_subfolder_href("sub/"));
        assert!(is_subfolder_href("2024 scans/"));
        assert!(!is_subfolder_href("sub"));
        assert!(!is_subfolder_href("/"));
        assert!(!is_subfolder_href("a/b/"));
        assert!(!is_subfolder_href("/abs/"));
        // Same rule as any other single segment
        assert!(is_subfolder_href("../"));
    }
}

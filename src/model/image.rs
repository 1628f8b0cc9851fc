//! Image record data model.

use crate::constants::ID_UNSAFE_CHARS;

/// One image in the gallery sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Normalized identifier, safe for URL fragments and selectors
    pub id: String,
    /// Path the image is fetched from (folder prefix already applied)
    pub source_path: String,
    /// Name shown to the user
    pub display_name: String,
    /// Optional link to an external page for this image
    pub external_link: Option<String>,
    /// Set once the image has finished downloading
    pub loaded: bool,
    /// Set once the renderer has built this image's container
    pub inserted: bool,
}

impl ImageRecord {
    /// Create a record, deriving its id from `display_name`.
    pub fn new(source_path: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            id: derive_id(&display_name),
            source_path: source_path.into(),
            display_name,
            external_link: None,
            loaded: false,
            inserted: false,
        }
    }

    /// Attach an external link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.external_link = Some(link.into());
        self
    }
}

/// Derive an identifier from a filename.
///
/// Every run of whitespace or characters from [`ID_UNSAFE_CHARS`] collapses
/// into a single `_`. Distinct filenames can map to the same id.
pub fn derive_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_whitespace() || ID_UNSAFE_CHARS.contains(c) {
            if !in_run {
                id.push('_');
                in_run = true;
            }
        } else {
            id.push(c);
            in_run = false;
        }
    }
    id
}

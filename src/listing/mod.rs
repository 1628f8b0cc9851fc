//! Listing normalization.
//!
//! Turns the two supported gallery sources into one canonical form:
//!
//! - **Server listings**: an HTML index page whose anchors name images and
//!   subfolders ([`parse_listing`])
//! - **Manifests**: a JSON description of images, links and subfolders
//!   ([`parse_manifest`])
//!
//! Either way the result is a [`Listing`], which replaces the gallery
//! wholesale.

mod folder;
mod html;
mod manifest;

pub use folder::{is_subfolder_href, normalize_folder, parent_folder};
pub use html::{anchor_hrefs, is_image_href, parse_listing};
pub use manifest::{Manifest, ManifestContent, ManifestImage, parse_manifest};

use crate::model::ImageRecord;

/// The canonical result of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Folder the images live in (ends in `/`, or empty)
    pub folder: String,
    /// Images in display order
    pub images: Vec<ImageRecord>,
    /// Subfolder names relative to `folder`
    pub subfolders: Vec<String>,
}

impl Listing {
    /// Create an empty listing for a folder.
    pub fn new(folder: String) -> Self {
        Self {
            folder,
            images: Vec::new(),
            subfolders: Vec::new(),
        }
    }
}

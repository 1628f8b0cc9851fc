//! JSON manifest normalization.
//!
//! A manifest stands in for a server listing when the server cannot produce
//! one, and can attach an external link to each image:
//!
//! ```json
//! {
//!   "folder": "https://example.org/scans",
//!   "images": [{ "img": "p1.jpg", "link": "https://example.org/p1" }],
//!   "subfolders": ["covers/"]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::listing::Listing;
use crate::listing::folder::normalize_folder;
use crate::model::ImageRecord;

/// Raw manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Folder prefixed to every image path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Images in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ManifestImage>>,

    /// Subfolder names relative to `folder`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfolders: Option<Vec<String>>,
}

/// One image entry in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestImage {
    /// Image path, relative to the manifest folder if one is given
    pub img: String,

    /// Optional external link for this image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// What a manifest turned out to describe.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestContent {
    /// Images and/or subfolders to show directly
    Gallery(Listing),
    /// Only a folder: its server listing should be fetched instead
    NeedsListing(String),
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalize into a listing, or ask for the folder's server listing.
    pub fn into_content(self) -> ManifestContent {
        // A missing or empty folder leaves image paths as given
        let folder = self
            .folder
            .as_deref()
            .filter(|folder| !folder.is_empty())
            .map(normalize_folder)
            .unwrap_or_default();

        if self.images.is_none() && self.subfolders.is_none() && !folder.is_empty() {
            return ManifestContent::NeedsListing(folder);
        }

        let mut listing = Listing::new(folder);
        listing.images = self
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|entry| {
                let record = ImageRecord::new(format!("{}{}", listing.folder, entry.img), entry.img);
                match entry.link {
                    Some(link) => record.with_link(link),
                    None => record,
                }
            })
            .collect();
        listing.subfolders = self.subfolders.unwrap_or_default();
        ManifestContent::Gallery(listing)
    }
}

/// Parse and normalize manifest JSON in one step.
pub fn parse_manifest(json: &str) -> Result<ManifestContent, ViewerError> {
    Ok(Manifest::from_json(json)?.into_content())
}

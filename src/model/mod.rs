//! Data models for the gallery.

mod gallery;
mod image;

pub use gallery::{GalleryModel, LoadProgress};
pub use image::{ImageRecord, derive_id};

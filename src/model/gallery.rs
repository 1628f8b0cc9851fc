//! Gallery model: the canonical image sequence and its load progress.

use std::collections::HashMap;

use crate::error::ViewerError;
use crate::model::ImageRecord;

/// Load progress reported after each image-loaded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Images reported loaded so far
    pub loaded: usize,
    /// Images in the gallery
    pub total: usize,
    /// True only for the call that first reached `total`
    pub just_completed: bool,
}

/// Holds the ordered gallery and everything derived from one normalization pass.
#[derive(Debug, Clone, Default)]
pub struct GalleryModel {
    /// Folder the gallery was built from (ends in `/`, or empty)
    folder: String,
    /// Images in display order
    images: Vec<ImageRecord>,
    /// Subfolder names relative to `folder`
    subfolders: Vec<String>,
    /// Counter driven by `record_loaded`
    loaded_count: usize,
    /// Whether the fully-loaded edge has already fired
    completion_signalled: bool,
}

impl GalleryModel {
    /// Create an empty gallery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with the result of a fresh normalization pass.
    pub fn replace(&mut self, folder: String, images: Vec<ImageRecord>, subfolders: Vec<String>) {
        self.folder = folder;
        self.images = images;
        self.subfolders = subfolders;
        self.reset_progress();

        for id in self.duplicate_ids() {
            log::warn!("Image id '{}' is shared by more than one image; lookups use the first", id);
        }
        log::info!(
            "Gallery for '{}': {} images, {} subfolders",
            self.folder,
            self.images.len(),
            self.subfolders.len()
        );
    }

    /// Drop all images and subfolders, keeping the folder.
    pub fn clear(&mut self) {
        self.images.clear();
        self.subfolders.clear();
        self.reset_progress();
    }

    /// Restart progress tracking (a fresh build starts from zero).
    pub fn reset_progress(&mut self) {
        self.loaded_count = 0;
        self.completion_signalled = false;
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn set_folder(&mut self, folder: String) {
        self.folder = folder;
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn subfolders(&self) -> &[String] {
        &self.subfolders
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.images.get(index)
    }

    /// Index of the first image with this id.
    pub fn lookup_index_by_id(&self, id: &str) -> Option<usize> {
        self.images.iter().position(|image| image.id == id)
    }

    /// Like [`lookup_index_by_id`](Self::lookup_index_by_id), as a `Result`.
    pub fn require_index(&self, id: &str) -> Result<usize, ViewerError> {
        self.lookup_index_by_id(id)
            .ok_or_else(|| ViewerError::lookup_miss(id))
    }

    /// Ids that more than one record maps to, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for image in &self.images {
            let count = counts.entry(image.id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(image.id.clone());
            }
        }
        duplicates
    }

    /// Whether the container for this id has been built.
    pub fn is_inserted(&self, id: &str) -> bool {
        self.lookup_index_by_id(id)
            .is_some_and(|index| self.images[index].inserted)
    }

    /// Record that the renderer built the container at `index`.
    pub fn mark_inserted(&mut self, index: usize) -> Result<(), ViewerError> {
        let len = self.images.len();
        let image = self
            .images
            .get_mut(index)
            .ok_or(ViewerError::IndexOutOfRange { index, len })?;
        image.inserted = true;
        Ok(())
    }

    /// Forget all built containers (the display was cleared).
    pub fn clear_inserted(&mut self) {
        for image in &mut self.images {
            image.inserted = false;
        }
    }

    /// Flip the `loaded` flag of the first image with this id.
    ///
    /// Returns false if the id is unknown.
    pub fn mark_loaded(&mut self, id: &str) -> bool {
        match self.lookup_index_by_id(id) {
            Some(index) => {
                self.images[index].loaded = true;
                true
            }
            None => false,
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    /// Count one more loaded image.
    ///
    /// Repeated calls for the same image are not detected and count again.
    /// `just_completed` is true exactly once per build: on the call that
    /// first brings the counter to the total.
    pub fn record_loaded(&mut self) -> LoadProgress {
        self.loaded_count += 1;
        let total = self.images.len();
        let just_completed =
            !self.completion_signalled && total > 0 && self.loaded_count >= total;
        if just_completed {
            self.completion_signalled = true;
            log::info!("All {} images loaded", total);
        }
        LoadProgress {
            loaded: self.loaded_count,
            total,
            just_completed,
        }
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.completion_signalled
    }
}

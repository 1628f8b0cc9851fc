//! Renderer interface.
//!
//! The engine never touches a display surface directly. It describes what
//! should be shown through [`Renderer`], and the host (a DOM renderer in the
//! browser, [`LogRenderer`] on the command line) does the drawing.

use std::collections::VecDeque;

use serde::Serialize;

use crate::planner::Placement;
use crate::transform::ViewTransform;

/// Everything a renderer needs to build one image container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    /// Position in the gallery sequence
    pub index: usize,
    /// Image id; also the container's addressable id
    pub id: String,
    /// Name shown in the container's title bar
    pub display_name: String,
    /// Full-size image path
    pub source_path: String,
    /// Smaller variant for narrow layouts, if configured
    pub thumbnail_path: Option<String>,
    /// External link and the text to show for it
    pub external_link: Option<(String, String)>,
    /// Id targeted by the "previous" control
    pub previous_id: String,
    /// Id targeted by the "next" control
    pub next_id: String,
}

/// Display operations the viewer drives.
pub trait Renderer {
    /// Remove every image container and any message.
    fn clear_display(&mut self);

    /// Replace the display with a single diagnostic message.
    fn show_error(&mut self, message: &str);

    /// Show the current folder and links to its subfolders.
    fn show_folder_info(&mut self, folder: &str, subfolders: &[String]);

    /// Build containers for `blocks`, in order, at the given end of the display.
    fn materialize_batch(&mut self, blocks: &[ImageBlock], placement: Placement);

    /// Update the loading progress display.
    fn show_progress(&mut self, loaded: usize, total: usize);

    /// Hide the loading progress display.
    fn hide_progress(&mut self);

    /// Show or stop showing an image in the large view.
    fn set_selected(&mut self, id: &str, selected: bool);

    /// Add or remove the "just closed" marker.
    fn set_recently_closed(&mut self, id: &str, marked: bool);

    /// Scroll an image's container into view.
    fn scroll_into_view(&mut self, id: &str);

    /// Apply rotation and scale to an image.
    fn apply_transform(&mut self, id: &str, transform: ViewTransform);

    /// Open a URL in a separate window.
    fn open_external(&mut self, url: &str);

    /// Hint that an image will be needed soon.
    fn preload_image(&mut self, path: &str);
}

/// A headless renderer that logs every call and keeps the container order.
#[derive(Debug, Default)]
pub struct LogRenderer {
    order: VecDeque<String>,
    selected: Option<String>,
    last_message: Option<String>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container ids as they would appear on screen.
    pub fn display_order(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The last diagnostic shown, if any.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }
}

impl Renderer for LogRenderer {
    fn clear_display(&mut self) {
        self.order.clear();
        self.selected = None;
        self.last_message = None;
    }

    fn show_error(&mut self, message: &str) {
        self.clear_display();
        log::error!("{}", message);
        self.last_message = Some(message.to_string());
    }

    fn show_folder_info(&mut self, folder: &str, subfolders: &[String]) {
        log::info!("Folder '{}'", folder);
        for subfolder in subfolders {
            log::info!("  subfolder {}", subfolder);
        }
    }

    fn materialize_batch(&mut self, blocks: &[ImageBlock], placement: Placement) {
        log::info!(
            "Building {} containers ({:?}): {:?}",
            blocks.len(),
            placement,
            blocks.iter().map(|b| b.index).collect::<Vec<_>>()
        );
        for block in blocks {
            match placement {
                Placement::Append => self.order.push_back(block.id.clone()),
                Placement::Prepend => self.order.push_front(block.id.clone()),
            }
        }
    }

    fn show_progress(&mut self, loaded: usize, total: usize) {
        log::debug!("Loaded {}/{}", loaded, total);
    }

    fn hide_progress(&mut self) {
        log::debug!("Progress hidden");
    }

    fn set_selected(&mut self, id: &str, selected: bool) {
        if selected {
            log::info!("Open '{}'", id);
            self.selected = Some(id.to_string());
        } else if self.selected.as_deref() == Some(id) {
            log::info!("Close '{}'", id);
            self.selected = None;
        }
    }

    fn set_recently_closed(&mut self, id: &str, marked: bool) {
        log::debug!("Just-closed marker on '{}': {}", id, marked);
    }

    fn scroll_into_view(&mut self, id: &str) {
        log::debug!("Scroll to '{}'", id);
    }

    fn apply_transform(&mut self, id: &str, transform: ViewTransform) {
        log::info!(
            "Transform '{}': {} {}",
            id,
            transform.rotation_css(),
            transform.scale_css()
        );
    }

    fn open_external(&mut self, url: &str) {
        log::info!("Open external {}", url);
    }

    fn preload_image(&mut self, path: &str) {
        log::debug!("Preload {}", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: usize, id: &str) -> ImageBlock {
        ImageBlock {
            index,
            id: id.to_string(),
            display_name: id.to_string(),
            source_path: id.to_string(),
            thumbnail_path: None,
            external_link: None,
            previous_id: id.to_string(),
            next_id: id.to_string(),
        }
    }

    #[test]
    fn test_prepend_builds_ascending_front() {
        let mut renderer = LogRenderer::new();
        renderer.materialize_batch(&[block(2, "c"), block(3, "d")], Placement::Append);
        renderer.materialize_batch(&[block(1, "b"), block(0, "a")], Placement::Prepend);
        assert_eq!(renderer.display_order(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_error_replaces_display() {
        let mut renderer = LogRenderer::new();
        renderer.materialize_batch(&[block(0, "a")], Placement::Append);
        renderer.set_selected("a", true);
        renderer.show_error("Unable to retrieve image listing");
        assert!(renderer.display_order().is_empty());
        assert_eq!(renderer.selected(), None);
        assert_eq!(renderer.last_message(), Some("Unable to retrieve image listing"));
    }
}

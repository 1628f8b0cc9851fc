//! Control dispatch table.
//!
//! Every image container carries the same set of controls. A click arrives
//! as `(ControlKind, id)` and is resolved here into an [`Action`], so the
//! action logic does not depend on how the renderer wires up its events.

use std::fmt;

use crate::config::ViewerConfig;
use crate::model::GalleryModel;

/// The controls on an image container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Open the previous image (wraps to the last)
    Previous,
    /// Open the next image (wraps to the first)
    Next,
    /// Close the open image
    Close,
    /// Open this image in the large view (click on the image itself)
    OpenLarge,
    /// Show the image on its own in a separate window
    ViewExternal,
    /// Rotate a quarter turn clockwise
    Rotate,
    /// Scale up by one step
    Enlarge,
    /// Scale down by one step
    Shrink,
}

impl ControlKind {
    /// All controls in template order.
    pub fn all() -> &'static [ControlKind] {
        &[
            ControlKind::Previous,
            ControlKind::Next,
            ControlKind::Close,
            ControlKind::OpenLarge,
            ControlKind::ViewExternal,
            ControlKind::Rotate,
            ControlKind::Enlarge,
            ControlKind::Shrink,
        ]
    }

    /// Name used by renderers to tag the control element.
    pub fn name(&self) -> &'static str {
        match self {
            ControlKind::Previous => "prev",
            ControlKind::Next => "next",
            ControlKind::Close => "close",
            ControlKind::OpenLarge => "me",
            ControlKind::ViewExternal => "view",
            ControlKind::Rotate => "rotate",
            ControlKind::Enlarge => "enlarge",
            ControlKind::Shrink => "shrink",
        }
    }

    /// Tooltip text for the control.
    pub fn title(&self) -> &'static str {
        match self {
            ControlKind::Previous => "Previous image",
            ControlKind::Next => "Next image",
            ControlKind::Close => "Close",
            ControlKind::OpenLarge => "Open",
            ControlKind::ViewExternal => "View this image in a separate window.",
            ControlKind::Rotate => "Rotate",
            ControlKind::Enlarge => "Enlarge",
            ControlKind::Shrink => "Shrink",
        }
    }

    /// Look a control up by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a control click should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open an image in the large view
    Select(String),
    /// Close an image
    Deselect(String),
    /// Open a URL outside the gallery
    OpenExternal(String),
    /// Rotate an image
    Rotate(String),
    /// Scale an image up or down
    Scale {
        /// Image to scale
        id: String,
        /// Grow when true, shrink when false
        enlarge: bool,
    },
}

/// Resolve a control click on the image `id`.
///
/// Returns `None` if `id` is not in the gallery.
pub fn resolve(
    kind: ControlKind,
    id: &str,
    gallery: &GalleryModel,
    config: &ViewerConfig,
) -> Option<Action> {
    let index = gallery.lookup_index_by_id(id)?;
    let len = gallery.len();

    let action = match kind {
        ControlKind::Previous => {
            let prev = if index == 0 { len - 1 } else { index - 1 };
            Action::Select(gallery.get(prev)?.id.clone())
        }
        ControlKind::Next => {
            let next = if index + 1 >= len { 0 } else { index + 1 };
            Action::Select(gallery.get(next)?.id.clone())
        }
        ControlKind::Close => Action::Deselect(id.to_string()),
        ControlKind::OpenLarge => Action::Select(id.to_string()),
        ControlKind::ViewExternal => {
            let source = &gallery.get(index)?.source_path;
            Action::OpenExternal(config.large_path(source))
        }
        ControlKind::Rotate => Action::Rotate(id.to_string()),
        ControlKind::Enlarge => Action::Scale {
            id: id.to_string(),
            enlarge: true,
        },
        ControlKind::Shrink => Action::Scale {
            id: id.to_string(),
            enlarge: false,
        },
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathRewrite;
    use crate::model::ImageRecord;

    fn gallery() -> GalleryModel {
        let mut gallery = GalleryModel::new();
        gallery.replace(
            "scans/".to_string(),
            ["a.jpg", "b.jpg", "c.jpg"]
                .iter()
                .map(|n| ImageRecord::new(format!("scans/{}", n), *n))
                .collect(),
            Vec::new(),
        );
        gallery
    }

    #[test]
    fn test_previous_and_next_wrap() {
        let gallery = gallery();
        let config = ViewerConfig::default();
        let select = |id: &str| Some(Action::Select(id.to_string()));

        assert_eq!(resolve(ControlKind::Previous, "b.jpg", &gallery, &config), select("a.jpg"));
        assert_eq!(resolve(ControlKind::Previous, "a.jpg", &gallery, &config), select("c.jpg"));
        assert_eq!(resolve(ControlKind::Next, "b.jpg", &gallery, &config), select("c.jpg"));
        assert_eq!(resolve(ControlKind::Next, "c.jpg", &gallery, &config), select("a.jpg"));
    }

    #[test]
    fn test_single_image_wraps_to_itself() {
        let mut gallery = GalleryModel::new();
        gallery.replace(String::new(), vec![ImageRecord::new("x.png", "x.png")], Vec::new());
        let config = ViewerConfig::default();
        assert_eq!(
            resolve(ControlKind::Next, "x.png", &gallery, &config),
            Some(Action::Select("x.png".to_string()))
        );
    }

    #[test]
    fn test_direct_actions() {
        let gallery = gallery();
        let config = ViewerConfig::default();
        assert_eq!(
            resolve(ControlKind::Close, "a.jpg", &gallery, &config),
            Some(Action::Deselect("a.jpg".to_string()))
        );
        assert_eq!(
            resolve(ControlKind::OpenLarge, "a.jpg", &gallery, &config),
            Some(Action::Select("a.jpg".to_string()))
        );
        assert_eq!(
            resolve(ControlKind::Rotate, "a.jpg", &gallery, &config),
            Some(Action::Rotate("a.jpg".to_string()))
        );
        assert_eq!(
            resolve(ControlKind::Shrink, "a.jpg", &gallery, &config),
            Some(Action::Scale {
                id: "a.jpg".to_string(),
                enlarge: false
            })
        );
    }

    #[test]
    fn test_view_external_uses_large_rewrite() {
        let gallery = gallery();
        let mut config = ViewerConfig::default();
        assert_eq!(
            resolve(ControlKind::ViewExternal, "b.jpg", &gallery, &config),
            Some(Action::OpenExternal("scans/b.jpg".to_string()))
        );

        config.large_rewrite = Some(PathRewrite::new("scans/", "scans/large/"));
        assert_eq!(
            resolve(ControlKind::ViewExternal, "b.jpg", &gallery, &config),
            Some(Action::OpenExternal("scans/large/b.jpg".to_string()))
        );
    }

    #[test]
    fn test_unknown_id_resolves_to_nothing() {
        let gallery = gallery();
        let config = ViewerConfig::default();
        for kind in ControlKind::all() {
            assert_eq!(resolve(*kind, "zzz.jpg", &gallery, &config), None);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for kind in ControlKind::all() {
            assert_eq!(ControlKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(ControlKind::from_name("bogus"), None);
    }

    #[test]
    fn test_every_control_has_a_title() {
        for kind in ControlKind::all() {
            assert!(!kind.title().is_empty(), "{} has no title", kind);
        }
        assert_eq!(ControlKind::OpenLarge.title(), "Open");
    }
}

//! Global constants for the Folio gallery engine

/// Images constructed on each side of a target before the rest of the gallery
pub const DEFAULT_WINDOW_RADIUS: usize = 10;

/// Scale change applied by one enlarge/shrink command
pub const DEFAULT_SCALE_STEP: f32 = 0.3;

/// Text shown for a manifest-supplied external link
pub const DEFAULT_LINK_TEXT: &str = "Link";

/// Rotation applied by one rotate command, in degrees
pub const ROTATION_STEP_DEGREES: u16 = 90;

/// Extensions recognised as images in a directory listing
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "svg", "gif"];

/// Characters that are replaced with `_` when deriving an image identifier
pub const ID_UNSAFE_CHARS: &str = "'\",?!@#$%[]{};:";

/// Query parameter naming the initial folder
pub const FOLDER_PARAM: &str = "folder";

/// Query parameter naming the initial target image
pub const IMAGE_PARAM: &str = "image";

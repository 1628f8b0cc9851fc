//! Folio - gallery construction and navigation engine
//!
//! Turns a folder listing or a JSON manifest into an ordered image gallery,
//! builds it around a target image first, and keeps the open image in sync
//! with the page's navigation history. Drawing is delegated to a
//! [`Renderer`]; in the browser that is a JavaScript delegate (see the
//! `wasm` module), on the command line it is [`LogRenderer`].

mod config;
mod constants;
mod dispatch;
mod error;
mod history;
mod listing;
mod model;
mod planner;
mod renderer;
mod selection;
mod transform;
mod viewer;

pub use config::{CONFIG_VERSION, ConfigError, LogLevel, PathRewrite, ViewerConfig};
pub use dispatch::{Action, ControlKind};
pub use error::ViewerError;
pub use history::{HistoryEntry, Location, MemoryHistory, NavigationHistory};
pub use listing::{
    Listing, Manifest, ManifestContent, ManifestImage, anchor_hrefs, is_image_href,
    is_subfolder_href, normalize_folder, parent_folder, parse_listing, parse_manifest,
};
pub use model::{GalleryModel, ImageRecord, LoadProgress, derive_id};
pub use planner::{ConstructionBatch, ConstructionPlan, Placement};
pub use renderer::{ImageBlock, LogRenderer, Renderer};
pub use selection::{SelectOrigin, SelectionMachine, Transition};
pub use transform::{TransformTracker, ViewTransform};
pub use viewer::{FetchResponse, ListingRequest, RequestKind, Viewer};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

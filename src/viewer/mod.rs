//! The viewer context.
//!
//! A [`Viewer`] owns one gallery and everything that reacts to it: the
//! selection state, per-image transforms, the renderer and the navigation
//! history. Hosts feed it events (fetched listings, image loads, control
//! clicks, history pops) and it drives the renderer in response.
//!
//! Fetching is left to the host. Operations that need data return a
//! [`ListingRequest`]; the host fetches it and hands the response back with
//! [`Viewer::receive`]. If several requests are in flight, whichever
//! response is received last wins.


use crate::config::ViewerConfig;
use crate::dispatch::{self, Action, ControlKind};
use crate::error::ViewerError;
use crate::history::{HistoryEntry, NavigationHistory};
use crate::listing::{self, Listing, ManifestContent, normalize_folder, parent_folder};
use crate::model::{GalleryModel, LoadProgress};
use crate::planner::ConstructionPlan;
use crate::renderer::{ImageBlock, Renderer};
use crate::selection::{SelectOrigin, SelectionMachine, Transition};
use crate::transform::{TransformTracker, ViewTransform};

/// What a [`ListingRequest`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A folder whose server index page should be fetched
    Listing,
    /// A JSON manifest
    Manifest,
}

/// A fetch the host should perform on the viewer's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    /// URL to fetch
    pub url: String,
    /// How the response should be interpreted
    pub kind: RequestKind,
}

impl ListingRequest {
    pub fn listing(folder: impl Into<String>) -> Self {
        Self {
            url: folder.into(),
            kind: RequestKind::Listing,
        }
    }

    pub fn manifest(uri: impl Into<String>) -> Self {
        Self {
            url: uri.into(),
            kind: RequestKind::Manifest,
        }
    }
}

/// A completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One gallery viewer instance.
pub struct Viewer<R: Renderer, H: NavigationHistory> {
    config: ViewerConfig,
    gallery: GalleryModel,
    selection: SelectionMachine,
    transforms: TransformTracker,
    renderer: R,
    history: H,
    /// Image to open once the next non-empty gallery is built
    pending_target: Option<String>,
    /// Folder named by the page location or config, not yet requested
    initial_folder: Option<String>,
}

impl<R: Renderer, H: NavigationHistory> Viewer<R, H> {
    /// Create a viewer, reading the initial folder and target from the location.
    pub fn new(config: ViewerConfig, renderer: R, history: H) -> Self {
        let location = history.location();
        let pending_target = location.initial_target();
        let initial_folder = location
            .folder_param()
            .or_else(|| (!config.folder.is_empty()).then(|| config.folder.clone()));

        log::debug!(
            "Viewer created (folder: {:?}, target: {:?})",
            initial_folder,
            pending_target
        );

        Self {
            transforms: TransformTracker::with_scale_step(config.scale_step),
            config,
            gallery: GalleryModel::new(),
            selection: SelectionMachine::new(),
            renderer,
            history,
            pending_target,
            initial_folder,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn gallery(&self) -> &GalleryModel {
        &self.gallery
    }

    pub fn selection(&self) -> &SelectionMachine {
        &self.selection
    }

    pub fn transforms(&self) -> &TransformTracker {
        &self.transforms
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// The image that will be opened when the next gallery is built.
    pub fn pending_target(&self) -> Option<&str> {
        self.pending_target.as_deref()
    }

    // ------------------------------------------------------------------
    // Sources
    // ------------------------------------------------------------------

    /// The request for the folder named at startup, if there was one.
    pub fn initial_request(&mut self) -> Option<ListingRequest> {
        let folder = self.initial_folder.take()?;
        Some(self.set_folder(&folder))
    }

    /// Switch to a folder. The host must fetch the returned listing.
    pub fn set_folder(&mut self, folder: &str) -> ListingRequest {
        let folder = normalize_folder(folder);
        log::info!("Opening folder '{}'", folder);
        self.gallery.set_folder(folder.clone());
        ListingRequest::listing(folder)
    }

    /// Switch to a manifest. The host must fetch the returned request.
    pub fn load_manifest(&mut self, uri: &str) -> ListingRequest {
        log::info!("Opening manifest '{}'", uri);
        ListingRequest::manifest(uri)
    }

    /// Go up one folder.
    pub fn open_parent_folder(&mut self) -> ListingRequest {
        let parent = parent_folder(self.gallery.folder());
        self.set_folder(&parent)
    }

    /// Open the subfolder at `index` in the current subfolder list.
    pub fn open_subfolder(&mut self, index: usize) -> Option<ListingRequest> {
        let subfolder = self.gallery.subfolders().get(index)?;
        let folder = format!("{}{}", self.gallery.folder(), subfolder);
        Some(self.set_folder(&folder))
    }

    /// Hand back the response to a request.
    ///
    /// Returns a follow-up request when a manifest only names a folder.
    pub fn receive(
        &mut self,
        request: &ListingRequest,
        response: FetchResponse,
    ) -> Result<Option<ListingRequest>, ViewerError> {
        if !response.is_success() {
            let message = format!("HTTP error; status = {}", response.status);
            return Err(self.fail_retrieval(&request.url, message));
        }

        match request.kind {
            RequestKind::Listing => {
                let listing = listing::parse_listing(&request.url, &response.body);
                self.show_listing(listing)?;
                Ok(None)
            }
            RequestKind::Manifest => self.read_manifest(&response.body),
        }
    }

    /// Hand back a server listing for the current folder.
    pub fn receive_listing(&mut self, response: FetchResponse) -> Result<(), ViewerError> {
        let request = ListingRequest::listing(self.gallery.folder());
        self.receive(&request, response).map(|_| ())
    }

    /// Report a fetch that failed before any response arrived.
    pub fn receive_failure(&mut self, request: &ListingRequest, message: &str) -> ViewerError {
        self.fail_retrieval(&request.url, message.to_string())
    }

    /// Build the gallery from manifest JSON.
    ///
    /// Malformed JSON is reported and leaves the current gallery untouched.
    pub fn read_manifest(&mut self, json: &str) -> Result<Option<ListingRequest>, ViewerError> {
        let content = match listing::parse_manifest(json) {
            Ok(content) => content,
            Err(e) => {
                log::error!("{}", e);
                // The display is gone, so nothing is inserted or open any more
                self.gallery.clear_inserted();
                self.selection.reset();
                self.transforms.clear();
                self.renderer.show_error(&e.to_string());
                return Err(e);
            }
        };

        match content {
            ManifestContent::Gallery(listing) => {
                self.show_listing(listing)?;
                Ok(None)
            }
            ManifestContent::NeedsListing(folder) => Ok(Some(self.set_folder(&folder))),
        }
    }

    /// Replace the gallery with a normalized listing and build it.
    pub fn show_listing(&mut self, listing: Listing) -> Result<(), ViewerError> {
        self.gallery
            .replace(listing.folder, listing.images, listing.subfolders);

        let target = if self.gallery.is_empty() {
            self.pending_target.clone()
        } else {
            self.pending_target.take()
        };
        self.render(target.as_deref())
    }

    fn fail_retrieval(&mut self, folder: &str, message: String) -> ViewerError {
        let error = ViewerError::retrieval(folder, message);
        log::error!("{}", error);
        self.gallery.clear();
        self.selection.reset();
        self.transforms.clear();
        self.renderer.show_error(&error.to_string());
        error
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Rebuild the display, prioritizing `target` and opening it.
    pub fn render(&mut self, target: Option<&str>) -> Result<(), ViewerError> {
        self.renderer.clear_display();
        self.selection.reset();
        self.transforms.clear();
        self.gallery.clear_inserted();
        self.gallery.reset_progress();

        if self.gallery.is_empty() {
            self.renderer.hide_progress();
        } else {
            self.renderer.show_progress(0, self.gallery.len());
        }

        if self.config.show_extra_info {
            self.renderer
                .show_folder_info(self.gallery.folder(), self.gallery.subfolders());
        }

        let plan = ConstructionPlan::for_gallery(&self.gallery, target, self.config.window_radius);
        if let Some(image) = plan.target().and_then(|index| self.gallery.get(index)) {
            let path = image.source_path.clone();
            self.renderer.preload_image(&path);
        }

        if plan.is_windowed() {
            log::info!(
                "Building {} images in {} batches around '{}'",
                self.gallery.len(),
                plan.batches().len(),
                target.unwrap_or_default()
            );
        } else {
            log::info!("Building {} images in one batch", self.gallery.len());
        }

        for (batch_number, batch) in plan.batches().iter().enumerate() {
            let blocks = batch
                .indices
                .iter()
                .map(|&index| self.image_block(index))
                .collect::<Result<Vec<_>, _>>()?;
            self.renderer.materialize_batch(&blocks, batch.placement);
            for &index in &batch.indices {
                self.gallery.mark_inserted(index)?;
            }

            // The priority window always holds the target; open it before
            // the rest of the gallery is built
            if batch_number == 0 {
                if let Some(id) = plan
                    .target()
                    .and_then(|index| self.gallery.get(index))
                    .map(|image| image.id.clone())
                {
                    self.select(&id, SelectOrigin::User);
                }
            }
        }
        Ok(())
    }

    /// Everything the renderer needs to build the container at `index`.
    pub fn image_block(&self, index: usize) -> Result<ImageBlock, ViewerError> {
        let len = self.gallery.len();
        let image = self
            .gallery
            .get(index)
            .ok_or(ViewerError::IndexOutOfRange { index, len })?;
        let previous = if index == 0 { len - 1 } else { index - 1 };
        let next = if index + 1 >= len { 0 } else { index + 1 };

        Ok(ImageBlock {
            index,
            id: image.id.clone(),
            display_name: image.display_name.clone(),
            source_path: image.source_path.clone(),
            thumbnail_path: self.config.thumbnail_path(&image.source_path),
            external_link: image
                .external_link
                .clone()
                .map(|link| (link, self.config.link_text.clone())),
            previous_id: self.gallery.images()[previous].id.clone(),
            next_id: self.gallery.images()[next].id.clone(),
        })
    }

    /// An image finished downloading.
    ///
    /// Events for ids outside the current gallery (e.g. from a gallery that
    /// has since been replaced) are ignored.
    pub fn image_loaded(&mut self, id: &str) -> Option<LoadProgress> {
        if !self.gallery.mark_loaded(id) {
            log::debug!("Ignoring load event for unknown image '{}'", id);
            return None;
        }
        let progress = self.gallery.record_loaded();
        self.renderer.show_progress(progress.loaded, progress.total);
        if progress.just_completed {
            self.renderer.hide_progress();
        }
        Some(progress)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Open an image in the large view.
    ///
    /// Returns false if the image's container has not been built.
    pub fn select(&mut self, id: &str, origin: SelectOrigin) -> bool {
        if !self.gallery.is_inserted(id) {
            log::debug!("Cannot select '{}': no container", id);
            return false;
        }
        let transition = self.selection.select(id, origin);
        self.apply_transition(transition);
        true
    }

    /// Close an image. Only the open image can be closed.
    pub fn deselect(&mut self, id: &str) -> bool {
        if !self.gallery.is_inserted(id) {
            log::debug!("Cannot deselect '{}': no container", id);
            return false;
        }
        let transition = self.selection.deselect(id);
        let closed = transition.closed.is_some();
        if closed {
            self.history.clear_fragment();
        }
        self.apply_transition(transition);
        closed
    }

    /// React to a back/forward navigation.
    ///
    /// Opens the image named by the new fragment without pushing history, or
    /// closes the open image if the fragment is now empty.
    pub fn pop_state(&mut self) -> bool {
        let fragment = self.history.location().fragment;

        if fragment.is_empty() {
            let Some(open) = self.selection.current().map(str::to_string) else {
                return false;
            };
            let transition = self.selection.deselect(&open);
            self.apply_transition(transition);
            return true;
        }

        if self.selection.is_open(&fragment) {
            return false;
        }
        self.select(&fragment, SelectOrigin::History)
    }

    fn apply_transition(&mut self, transition: Transition) {
        if let Some(id) = &transition.closed {
            self.transforms.reset(id);
            self.renderer.apply_transform(id, ViewTransform::identity());
            self.renderer.set_selected(id, false);
        }
        if let Some(id) = &transition.marker_cleared {
            self.renderer.set_recently_closed(id, false);
        }
        if let Some(id) = &transition.marker_set {
            self.renderer.set_recently_closed(id, true);
            self.renderer.scroll_into_view(id);
        }
        if let Some(id) = &transition.opened {
            if transition.push_history {
                let location = self.history.location();
                if location.fragment != *id {
                    self.history
                        .push(HistoryEntry::now(location.with_fragment(id)));
                }
            }
            self.renderer.set_selected(id, true);
            self.renderer.scroll_into_view(id);
        }
    }

    // ------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------

    /// Handle a click on one of an image's controls.
    ///
    /// Returns false if the click had no effect.
    pub fn control_click(&mut self, kind: ControlKind, id: &str) -> bool {
        let Some(action) = dispatch::resolve(kind, id, &self.gallery, &self.config) else {
            log::debug!("Control '{}' on unknown image '{}'", kind, id);
            return false;
        };
        log::debug!("Control '{}' on '{}': {:?}", kind, id, action);
        self.perform(action)
    }

    /// Carry out a resolved action.
    pub fn perform(&mut self, action: Action) -> bool {
        match action {
            Action::Select(id) => self.select(&id, SelectOrigin::User),
            Action::Deselect(id) => self.deselect(&id),
            Action::OpenExternal(url) => {
                self.renderer.open_external(&url);
                true
            }
            Action::Rotate(id) => {
                if !self.gallery.is_inserted(&id) {
                    return false;
                }
                let transform = self.transforms.rotate(&id);
                self.renderer.apply_transform(&id, transform);
                true
            }
            Action::Scale { id, enlarge } => {
                if !self.gallery.is_inserted(&id) {
                    return false;
                }
                let transform = self.transforms.scale(&id, enlarge);
                self.renderer.apply_transform(&id, transform);
                true
            }
        }
    }
}

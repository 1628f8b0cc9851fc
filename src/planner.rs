//! Windowed construction planning.
//!
//! Large galleries are built in batches so that the image the user asked for
//! (and a window of neighbours around it) is on screen before the rest.
//!
//! With a target at index `T`, radius `R` and `N` images the plan is:
//!
//! 1. `[T-R, T+R]` ascending, appended (clamped to the gallery)
//! 2. everything after the window, ascending, appended
//! 3. everything before the window, **descending**, each prepended at the
//!    front, so the final on-screen order is still ascending
//!
//! Without a target, or with one that is not in the gallery, the plan is a
//! single ascending batch.

use crate::model::GalleryModel;

/// Where the renderer puts the containers of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Append each container after the current last one
    Append,
    /// Insert each container before the current first one
    Prepend,
}

/// A run of gallery indices to materialize together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionBatch {
    /// Indices in the order they must be materialized
    pub indices: Vec<usize>,
    /// How the renderer places them
    pub placement: Placement,
}

impl ConstructionBatch {
    fn append(indices: impl Iterator<Item = usize>) -> Self {
        Self {
            indices: indices.collect(),
            placement: Placement::Append,
        }
    }

    fn prepend(indices: impl Iterator<Item = usize>) -> Self {
        Self {
            indices: indices.collect(),
            placement: Placement::Prepend,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The ordered batches for one build. Computed fresh for every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionPlan {
    batches: Vec<ConstructionBatch>,
    target: Option<usize>,
}

impl ConstructionPlan {
    /// Plan a gallery of `len` images around an optional target index.
    ///
    /// A target index past the end is treated as no target.
    pub fn new(len: usize, target: Option<usize>, radius: usize) -> Self {
        let target = target.filter(|&t| t < len);
        let Some(t) = target else {
            let batches = if len == 0 {
                Vec::new()
            } else {
                vec![ConstructionBatch::append(0..len)]
            };
            return Self {
                batches,
                target: None,
            };
        };

        let start = t.saturating_sub(radius);
        let end = t.saturating_add(radius).min(len - 1);

        let mut batches = vec![ConstructionBatch::append(start..=end)];
        if end + 1 < len {
            batches.push(ConstructionBatch::append(end + 1..len));
        }
        if start > 0 {
            batches.push(ConstructionBatch::prepend((0..start).rev()));
        }

        Self {
            batches,
            target: Some(t),
        }
    }

    /// Plan a gallery around the image with `target_id`, if it is present.
    pub fn for_gallery(gallery: &GalleryModel, target_id: Option<&str>, radius: usize) -> Self {
        let target = target_id
            .filter(|id| !id.is_empty())
            .and_then(|id| {
                let index = gallery.lookup_index_by_id(id);
                if index.is_none() {
                    log::debug!("Target '{}' not in gallery, building in order", id);
                }
                index
            });
        Self::new(gallery.len(), target, radius)
    }

    pub fn batches(&self) -> &[ConstructionBatch] {
        &self.batches
    }

    /// Index of the target, when the plan is windowed.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Whether batch 1 is a priority window around a target.
    pub fn is_windowed(&self) -> bool {
        self.target.is_some()
    }

    /// Final on-screen order after every batch is applied with its placement.
    pub fn display_order(&self) -> Vec<usize> {
        let mut front: Vec<usize> = Vec::new();
        let mut back: Vec<usize> = Vec::new();
        for batch in &self.batches {
            match batch.placement {
                Placement::Append => back.extend(&batch.indices),
                Placement::Prepend => front.extend(&batch.indices),
            }
        }
        front.reverse();
        front.extend(back);
        front
    }
}

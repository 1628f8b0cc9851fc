//! Per-image rotation and scale.
//!
//! The tracker only stores numbers. Keeping a transformed image inside the
//! viewport is the renderer's job; it reads the values from here.

use std::collections::HashMap;

use crate::constants::{DEFAULT_SCALE_STEP, ROTATION_STEP_DEGREES};

/// Rotation and scale of one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Clockwise rotation in degrees: 0, 90, 180 or 270
    pub rotation_degrees: u16,
    /// Scale factor; not clamped, so it can reach zero or go negative
    pub scale: f32,
}

impl ViewTransform {
    /// Create an identity transform (no rotation, scale 1).
    pub fn identity() -> Self {
        Self {
            rotation_degrees: 0,
            scale: 1.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Rotate a further quarter turn clockwise.
    pub fn rotated(&self) -> Self {
        Self {
            rotation_degrees: (self.rotation_degrees + ROTATION_STEP_DEGREES) % 360,
            scale: self.scale,
        }
    }

    /// Grow or shrink by `step`.
    pub fn scaled(&self, enlarge: bool, step: f32) -> Self {
        Self {
            rotation_degrees: self.rotation_degrees,
            scale: if enlarge {
                self.scale + step
            } else {
                self.scale - step
            },
        }
    }

    /// CSS transform for the image element, e.g. `rotate(90deg)`.
    pub fn rotation_css(&self) -> String {
        format!("rotate({}deg)", self.rotation_degrees)
    }

    /// CSS transform for the image container, e.g. `scale(1.3)`.
    pub fn scale_css(&self) -> String {
        format!("scale({})", self.scale)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transforms keyed by image id. Only images that have been changed are stored.
#[derive(Debug, Clone)]
pub struct TransformTracker {
    transforms: HashMap<String, ViewTransform>,
    scale_step: f32,
}

impl TransformTracker {
    /// Create an empty tracker with the default scale step.
    pub fn new() -> Self {
        Self::with_scale_step(DEFAULT_SCALE_STEP)
    }

    /// Create an empty tracker with a custom scale step.
    pub fn with_scale_step(scale_step: f32) -> Self {
        Self {
            transforms: HashMap::new(),
            scale_step,
        }
    }

    /// Current transform of an image (identity if never changed).
    pub fn get(&self, id: &str) -> ViewTransform {
        self.transforms.get(id).copied().unwrap_or_default()
    }

    pub fn rotate(&mut self, id: &str) -> ViewTransform {
        let transform = self.get(id).rotated();
        log::debug!("Rotate '{}': {}°", id, transform.rotation_degrees);
        self.transforms.insert(id.to_string(), transform);
        transform
    }

    pub fn scale(&mut self, id: &str, enlarge: bool) -> ViewTransform {
        let transform = self.get(id).scaled(enlarge, self.scale_step);
        log::debug!("Scale '{}': {:.2}x", id, transform.scale);
        self.transforms.insert(id.to_string(), transform);
        transform
    }

    /// Back to identity. Returns true if the image had been transformed.
    pub fn reset(&mut self, id: &str) -> bool {
        self.transforms
            .remove(id)
            .is_some_and(|transform| !transform.is_identity())
    }

    /// Forget every transform (all containers are being rebuilt).
    pub fn clear(&mut self) {
        self.transforms.clear();
    }

    pub fn scale_step(&self) -> f32 {
        self.scale_step
    }
}

impl Default for TransformTracker {
    fn default() -> Self {
        Self::new()
    }
}

//! Image picker modal

use crate::models::{ImageAsset, remove_images_prefix};

/// Field the picked image is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerTarget {
    Main,
    TransitionIn,
    TransitionOut,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePicker {
    pub target: PickerTarget,
    pub selected: usize,
    /// Display path currently in the target field
    pub current: String,
}

impl ImagePicker {
    pub fn open(target: PickerTarget, images: &[ImageAsset], current: &str) -> Self {
        let selected = images
            .iter()
            .position(|img| remove_images_prefix(&img.path) == current)
            .unwrap_or(0);
        Self {
            target,
            selected,
            current: current.to_string(),
        }
    }

    pub fn is_current(&self, image: &ImageAsset) -> bool {
        remove_images_prefix(&image.path) == self.current
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn previous(&mut self, len: usize) {
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Keep the cursor valid after the image list changed
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

//! Point sprites and the shared sprite buffer
//!
//! Entities never own GPU memory. Each render call writes its sprites into a
//! [`PointSink`], which takes `&mut self`: one entity's render call finishes
//! before the next one can touch the shared buffers.

use crate::vecmath::flatten;
use glam::{Vec2, Vec4};

/// Anything entities can draw circular points into.
pub trait PointSink {
    /// Draw one filled circle of `size` pixels at a clip-space `position`.
    fn draw_point(&mut self, position: Vec2, color: Vec4, size: f32);
}

/// One drawn point, as recorded by a [`PointBatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSprite {
    pub position: Vec2,
    pub color: Vec4,
    pub size: f32,
}

/// CPU image of the shared position / color / size buffers.
///
/// The capacity is fixed when the batch is created; sprites beyond it are
/// dropped and reported once per frame.
#[derive(Debug)]
pub struct PointBatch {
    positions: Vec<Vec2>,
    colors: Vec<Vec4>,
    sizes: Vec<f32>,
    capacity: usize,
    overflowed: bool,
}

impl PointBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            sizes: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    /// Forget last frame's sprites; the allocation is kept.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.sizes.clear();
        self.overflowed = false;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn sprite(&self, index: usize) -> Option<PointSprite> {
        Some(PointSprite {
            position: *self.positions.get(index)?,
            color: *self.colors.get(index)?,
            size: *self.sizes.get(index)?,
        })
    }

    pub fn sprites(&self) -> impl Iterator<Item = PointSprite> + '_ {
        (0..self.len()).filter_map(|i| self.sprite(i))
    }

    /// Flattened positions (2 floats per sprite) ready for upload.
    pub fn position_data(&self) -> Vec<f32> {
        flatten(&self.positions)
    }

    /// Flattened colors (4 floats per sprite) ready for upload.
    pub fn color_data(&self) -> Vec<f32> {
        flatten(&self.colors)
    }

    /// Point sizes (1 float per sprite) ready for upload.
    pub fn size_data(&self) -> &[f32] {
        &self.sizes
    }
}

impl PointSink for PointBatch {
    fn draw_point(&mut self, position: Vec2, color: Vec4, size: f32) {
        if self.positions.len() >= self.capacity {
            if !self.overflowed {
                log::warn!(
                    "Point batch full ({} sprites), dropping the rest of this frame",
                    self.capacity
                );
                self.overflowed = true;
            }
            return;
        }

        self.positions.push(position);
        self.colors.push(color);
        self.sizes.push(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_records_in_draw_order() {
        let mut batch = PointBatch::with_capacity(4);
        batch.draw_point(Vec2::new(0.1, 0.2), Vec4::ONE, 10.0);
        batch.draw_point(Vec2::new(-0.5, 0.5), Vec4::new(1.0, 0.0, 0.0, 0.5), 4.0);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.position_data(), vec![0.1, 0.2, -0.5, 0.5]);
        assert_eq!(
            batch.color_data(),
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.5]
        );
        assert_eq!(batch.size_data(), &[10.0, 4.0]);
    }

    #[test]
    fn test_batch_drops_sprites_past_capacity() {
        let mut batch = PointBatch::with_capacity(1);
        batch.draw_point(Vec2::ZERO, Vec4::ONE, 1.0);
        batch.draw_point(Vec2::ONE, Vec4::ONE, 2.0);

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.sprite(0).map(|s| s.size), Some(1.0));

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.capacity(), 1);
    }
}

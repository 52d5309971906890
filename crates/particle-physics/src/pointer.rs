//! Pointer / touch state in simulation coordinates

use glam::Vec2;

/// The drawing surface's rectangle in client (window) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    /// A rectangle anchored at the client origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Map client pixels to clip space. Screen Y grows downward, simulation Y
    /// grows upward.
    pub fn to_clip(&self, client: Vec2) -> Vec2 {
        let x = client.x - self.left;
        let y = client.y - self.top;
        Vec2::new(
            x / self.width.max(1.0) * 2.0 - 1.0,
            y / self.height.max(1.0) * -2.0 + 1.0,
        )
    }
}

/// Touch phases the tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Last known pointer position and whether it is over the surface.
///
/// Written only by input handlers; particles read it during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub over_surface: bool,
}

impl PointerState {
    pub fn moved(&mut self, client: Vec2, rect: &SurfaceRect) {
        self.position = rect.to_clip(client);
    }

    pub fn entered(&mut self) {
        self.over_surface = true;
    }

    pub fn left(&mut self) {
        self.over_surface = false;
    }

    /// Apply a touch event. Always returns `true`: touches on the surface are
    /// consumed so the host does not scroll or zoom.
    pub fn touch(&mut self, phase: TouchPhase, client: Vec2, rect: &SurfaceRect) -> bool {
        match phase {
            TouchPhase::Started => {
                self.over_surface = true;
                self.moved(client, rect);
            }
            TouchPhase::Moved => self.moved(client, rect),
            TouchPhase::Ended | TouchPhase::Cancelled => self.over_surface = false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_clip_space() {
        let rect = SurfaceRect::from_size(200.0, 100.0);

        assert_eq!(rect.to_clip(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(rect.to_clip(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -1.0));
        assert_eq!(rect.to_clip(Vec2::new(100.0, 50.0)), Vec2::ZERO);
    }

    #[test]
    fn test_offset_rect() {
        let rect = SurfaceRect {
            left: 50.0,
            top: 20.0,
            width: 100.0,
            height: 100.0,
        };
        assert_eq!(rect.to_clip(Vec2::new(75.0, 95.0)), Vec2::new(-0.5, -0.5));
    }

    #[test]
    fn test_enter_leave_and_touch() {
        let rect = SurfaceRect::from_size(100.0, 100.0);
        let mut pointer = PointerState::default();
        assert!(!pointer.over_surface);

        pointer.entered();
        assert!(pointer.over_surface);
        pointer.left();
        assert!(!pointer.over_surface);

        assert!(pointer.touch(TouchPhase::Started, Vec2::new(100.0, 0.0), &rect));
        assert!(pointer.over_surface);
        assert_eq!(pointer.position, Vec2::new(1.0, 1.0));

        pointer.touch(TouchPhase::Moved, Vec2::new(0.0, 100.0), &rect);
        assert_eq!(pointer.position, Vec2::new(-1.0, -1.0));

        pointer.touch(TouchPhase::Cancelled, Vec2::ZERO, &rect);
        assert!(!pointer.over_surface);
        assert_eq!(pointer.position, Vec2::new(-1.0, -1.0));
    }
}

//! Routes winit pointer and touch events into a simulation's pointer state.

use glam::Vec2;
use particle_physics::{PointerState, SurfaceRect, TouchPhase};
use winit::dpi::PhysicalPosition;
use winit::event::WindowEvent;

/// Apply `event` to `pointer`. Returns true if the event was a pointer event
/// and has been consumed.
///
/// winit reports positions in physical pixels relative to the client area, so
/// `rect` is the surface size anchored at the origin.
pub fn route_pointer(event: &WindowEvent, pointer: &mut PointerState, rect: &SurfaceRect) -> bool {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            pointer.moved(client_position(*position), rect);
            true
        }
        WindowEvent::CursorEntered { .. } => {
            pointer.entered();
            true
        }
        WindowEvent::CursorLeft { .. } => {
            pointer.left();
            true
        }
        WindowEvent::Touch(touch) => {
            // Consumed so the platform does not also scroll or zoom
            pointer.touch(touch_phase(touch.phase), client_position(touch.location), rect)
        }
        _ => false,
    }
}

fn client_position(position: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(position.x as f32, position.y as f32)
}

fn touch_phase(phase: winit::event::TouchPhase) -> TouchPhase {
    match phase {
        winit::event::TouchPhase::Started => TouchPhase::Started,
        winit::event::TouchPhase::Moved => TouchPhase::Moved,
        winit::event::TouchPhase::Ended => TouchPhase::Ended,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_phase_mapping() {
        assert_eq!(
            touch_phase(winit::event::TouchPhase::Started),
            TouchPhase::Started
        );
        assert_eq!(
            touch_phase(winit::event::TouchPhase::Cancelled),
            TouchPhase::Cancelled
        );
    }

    #[test]
    fn test_client_position_maps_to_clip_space() {
        let rect = SurfaceRect::from_size(600.0, 400.0);
        let client = client_position(PhysicalPosition::new(450.0, 100.0));
        let clip = rect.to_clip(client);
        assert!((clip.x - 0.5).abs() < 1e-6);
        assert!((clip.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_pointer_events_pass_through() {
        let mut pointer = PointerState::default();
        let rect = SurfaceRect::from_size(600.0, 600.0);
        assert!(!route_pointer(&WindowEvent::Focused(true), &mut pointer, &rect));
        assert!(!pointer.over_surface);
    }
}

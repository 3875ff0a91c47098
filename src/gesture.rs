// gesture.rs: pointer / single-finger drag → look angles

use crate::orientation::{DisplayMode, Orientation};

/// Degrees of rotation per pixel of drag.
pub const DRAG_SENSITIVITY_DEG_PER_PX: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub active: bool,
    pub last_x: f32,
    pub last_y: f32,
}

/// Turns drag deltas into `Orientation::adjust` calls.
///
/// Mouse and touch share one session; touch input only drives it while exactly
/// one finger is down.
#[derive(Debug, Default)]
pub struct GestureTranslator {
    session: Option<DragSession>,
    touches: Vec<u64>,
}

impl GestureTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.map_or(false, |s| s.active)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn drag_start(&mut self, x: f32, y: f32) {
        self.session = Some(DragSession {
            active: true,
            last_x: x,
            last_y: y,
        });
    }

    /// Returns true if the orientation was adjusted.
    pub fn drag_move(
        &mut self,
        x: f32,
        y: f32,
        orientation: &mut Orientation,
        mode: DisplayMode,
    ) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| s.active) else {
            return false;
        };

        let dx = x - session.last_x;
        let dy = y - session.last_y;

        // screen y grows downward: dragging down lowers latitude
        orientation.adjust(
            dx * DRAG_SENSITIVITY_DEG_PER_PX,
            -dy * DRAG_SENSITIVITY_DEG_PER_PX,
            mode,
        );

        session.last_x = x;
        session.last_y = y;
        true
    }

    pub fn drag_end(&mut self) {
        self.session = None;
    }

    pub fn touch_start(&mut self, id: u64, x: f32, y: f32) {
        if !self.touches.contains(&id) {
            self.touches.push(id);
        }
        if self.touches.len() == 1 {
            self.drag_start(x, y);
        } else {
            // second finger: no pinch, just stop looking around
            self.drag_end();
        }
    }

    pub fn touch_move(
        &mut self,
        id: u64,
        x: f32,
        y: f32,
        orientation: &mut Orientation,
        mode: DisplayMode,
    ) -> bool {
        if self.touches.len() != 1 || self.touches[0] != id {
            return false;
        }
        self.drag_move(x, y, orientation, mode)
    }

    pub fn touch_end(&mut self, id: u64) {
        self.touches.retain(|t| *t != id);
        self.drag_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_drag_turns_longitude() {
        let mut g = GestureTranslator::new();
        let mut o = Orientation::default();
        g.drag_start(0.0, 0.0);
        assert!(g.drag_move(10.0, 0.0, &mut o, DisplayMode::Half360));
        assert!((o.longitude_deg - 1.0).abs() < 1e-6);
        assert_eq!(o.latitude_deg, 0.0);
    }

    #[test]
    fn vertical_drag_is_inverted() {
        let mut g = GestureTranslator::new();
        let mut o = Orientation::default();
        g.drag_start(100.0, 100.0);
        g.drag_move(100.0, 150.0, &mut o, DisplayMode::Full360);
        assert!((o.latitude_deg + 5.0).abs() < 1e-5);
        // lower latitude aims the camera below the horizon
        let pose = crate::camera::compute_pose(&o, DisplayMode::Full360);
        assert!(pose.target.y < 0.0);
        g.drag_move(100.0, 50.0, &mut o, DisplayMode::Full360);
        assert!((o.latitude_deg - 5.0).abs() < 1e-5);
    }

    #[test]
    fn deltas_are_relative_to_last_move() {
        let mut g = GestureTranslator::new();
        let mut o = Orientation::default();
        g.drag_start(0.0, 0.0);
        g.drag_move(10.0, 0.0, &mut o, DisplayMode::Half360);
        g.drag_move(20.0, 0.0, &mut o, DisplayMode::Half360);
        assert!((o.longitude_deg - 2.0).abs() < 1e-5);
        let s = g.session().unwrap();
        assert_eq!((s.last_x, s.last_y), (20.0, 0.0));
    }

    #[test]
    fn moves_without_session_are_ignored() {
        let mut g = GestureTranslator::new();
        let mut o = Orientation::default();
        assert!(!g.drag_move(50.0, 50.0, &mut o, DisplayMode::Half360));
        g.drag_start(0.0, 0.0);
        g.drag_end();
        assert!(!g.drag_move(50.0, 50.0, &mut o, DisplayMode::Half360));
        assert_eq!(o, Orientation::default());
        assert!(!g.is_dragging());
    }

    #[test]
    fn mono_drag_stays_within_peek_bound() {
        let mut g = GestureTranslator::new();
        let mut o = Orientation::default();
        g.drag_start(0.0, 0.0);
        g.drag_move(0.0, -5000.0, &mut o, DisplayMode::Mono);
        assert_eq!(o.latitude_deg, 20.0);
        g.drag_move(0.0, 5000.0, &mut o, DisplayMode::Mono);
        assert_eq!(o.latitude_deg, -20.0);
    }

    #[test]
    fn single_finger_drives_the_drag() {
        let mut g = GestureTranslator::new();
        let mut o = Orientation::default();
        g.touch_start(7, 0.0, 0.0);
        assert!(g.touch_move(7, 30.0, 0.0, &mut o, DisplayMode::Full360));
        assert!((o.longitude_deg - 3.0).abs() < 1e-5);
        g.touch_end(7);
        assert!(!g.is_dragging());
    }

    #[test]
    fn second_finger_cancels_and_is_ignored() {
        let mut g = GestureTranslator::new();
        let mut o = Orientation::default();
        g.touch_start(1, 0.0, 0.0);
        g.touch_start(2, 100.0, 0.0);
        assert!(!g.is_dragging());
        assert!(!g.touch_move(1, 50.0, 0.0, &mut o, DisplayMode::Full360));
        assert!(!g.touch_move(2, 150.0, 0.0, &mut o, DisplayMode::Full360));
        assert_eq!(o, Orientation::default());

        // lifting one finger ends the gesture; the next touch starts fresh
        g.touch_end(2);
        g.touch_end(1);
        g.touch_start(3, 10.0, 10.0);
        assert!(g.is_dragging());
    }
}

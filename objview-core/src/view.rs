/// View transform and pointer interaction state
use nalgebra::{Rotation3, Vector3};

/// Default pixels per model unit
pub const DEFAULT_SCALE: f64 = 100.0;

/// Rotation around the X and Y axes (in radians).
///
/// Angles accumulate without wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Rotation matrix applying X first, then Y
    pub fn matrix(&self) -> Rotation3<f64> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.y);
        ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Pointer drag state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Mutable view parameters, kept apart from geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub rotation: RotationState,
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Pointer position recorded when the drag began, in whole pixels
    pub last_x: i32,
    pub last_y: i32,
    pub drag: DragState,
    pub rotating: bool,
}

impl ViewState {
    pub fn new(scale: f64) -> Self {
        Self {
            rotation: RotationState::zero(),
            scale,
            translate_x: 0.0,
            translate_y: 0.0,
            last_x: 0,
            last_y: 0,
            drag: DragState::Idle,
            rotating: true,
        }
    }

    /// Zero translation and rotation; scale and drag state are kept
    pub fn reset_transform(&mut self) {
        self.translate_x = 0.0;
        self.translate_y = 0.0;
        self.rotation = RotationState::zero();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);

        state.rotate(0.1, 0.2);
        assert!((state.x - 0.1).abs() < 1e-12);
        assert!((state.y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = RotationState::zero().matrix();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((matrix * p - p).norm() < 1e-12);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let matrix = RotationState::new(0.0, std::f64::consts::FRAC_PI_2).matrix();
        let p = matrix * Point3::new(1.0, 0.0, 0.0);
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_view_defaults() {
        let view = ViewState::default();
        assert_eq!(view.scale, DEFAULT_SCALE);
        assert_eq!(view.drag, DragState::Idle);
        assert!(view.rotating);
    }

    #[test]
    fn test_reset_transform_keeps_scale() {
        let mut view = ViewState::new(42.0);
        view.translate_x = 3.0;
        view.translate_y = -1.0;
        view.rotation.rotate(1.0, 2.0);
        view.reset_transform();
        assert_eq!(view.translate_x, 0.0);
        assert_eq!(view.translate_y, 0.0);
        assert_eq!(view.rotation, RotationState::zero());
        assert_eq!(view.scale, 42.0);
    }
}

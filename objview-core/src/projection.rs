/// Model-to-screen projection
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::geometry::Vertex;
use crate::view::ViewState;

/// Maps a model-space vertex to viewport pixel coordinates
pub trait Projector: Debug {
    fn project(&self, vertex: &Vertex, view: &ViewState, width: u32, height: u32) -> (f64, f64);
}

/// Projector selection for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectorKind {
    #[default]
    Orthographic,
    Rotating,
}

impl ProjectorKind {
    pub fn build(self) -> Box<dyn Projector> {
        match self {
            ProjectorKind::Orthographic => Box::new(OrthographicProjector),
            ProjectorKind::Rotating => Box::new(RotatingProjector),
        }
    }

    pub fn next(self) -> Self {
        match self {
            ProjectorKind::Orthographic => ProjectorKind::Rotating,
            ProjectorKind::Rotating => ProjectorKind::Orthographic,
        }
    }
}

/// Scale x/y and center them in the viewport.
///
/// Depth, rotation and translation are ignored. The viewport center uses
/// whole-pixel halves (`width / 2` in integer arithmetic).
#[derive(Debug, Clone, Copy, Default)]
pub struct OrthographicProjector;

impl Projector for OrthographicProjector {
    fn project(&self, vertex: &Vertex, view: &ViewState, width: u32, height: u32) -> (f64, f64) {
        screen_offset(vertex.x, vertex.y, view.scale, width, height)
    }
}

/// Rotates by the view angles and applies the pan before the orthographic
/// mapping. Not part of the classic viewer; selected explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotatingProjector;

impl Projector for RotatingProjector {
    fn project(&self, vertex: &Vertex, view: &ViewState, width: u32, height: u32) -> (f64, f64) {
        let rotated = view.rotation.matrix() * vertex;
        screen_offset(
            rotated.x + view.translate_x,
            rotated.y + view.translate_y,
            view.scale,
            width,
            height,
        )
    }
}

fn screen_offset(x: f64, y: f64, scale: f64, width: u32, height: u32) -> (f64, f64) {
    (
        x * scale + (width / 2) as f64,
        -y * scale + (height / 2) as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_orthographic_centering() {
        let view = ViewState::default();
        let p = OrthographicProjector.project(&Vertex::new(1.0, 1.0, 5.0), &view, 200, 200);
        assert_eq!(p, (200.0, 0.0));
    }

    #[test]
    fn test_orthographic_odd_viewport_truncates_center() {
        let view = ViewState::default();
        let p = OrthographicProjector.project(&Vertex::origin(), &view, 201, 99);
        assert_eq!(p, (100.0, 49.0));
    }

    #[test]
    fn test_orthographic_ignores_rotation_and_pan() {
        let mut view = ViewState::default();
        view.rotation.rotate(1.0, 2.0);
        view.translate_x = 5.0;
        view.translate_y = 5.0;
        let v = Vertex::new(0.5, -0.5, 0.0);
        assert_eq!(
            OrthographicProjector.project(&v, &view, 100, 100),
            (100.0, 100.0)
        );
    }

    #[test]
    fn test_rotating_projector_turns_points() {
        let mut view = ViewState::default();
        view.rotation.rotate(0.0, FRAC_PI_2);
        let p = RotatingProjector.project(&Vertex::new(1.0, 0.0, 0.0), &view, 200, 200);
        assert!(close(p, (100.0, 100.0)));
    }

    #[test]
    fn test_rotating_projector_applies_pan() {
        let mut view = ViewState::default();
        view.translate_x = 0.5;
        let p = RotatingProjector.project(&Vertex::origin(), &view, 200, 200);
        assert!(close(p, (150.0, 100.0)));
    }

    #[test]
    fn test_kind_cycles() {
        assert_eq!(ProjectorKind::Orthographic.next(), ProjectorKind::Rotating);
        assert_eq!(ProjectorKind::Rotating.next(), ProjectorKind::Orthographic);
    }
}

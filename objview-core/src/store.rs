//! Model store: geometry plus the view state a host draws from
//!
//! The host owns the clock and the input devices. It feeds OBJ text, ticks,
//! and pointer events in, then asks for projected points each frame.

use std::time::Duration;

use nalgebra::Vector3;
use tracing::{debug, info, trace};

use crate::config::ViewerConfig;
use crate::error::{self, ParseError, ViewError};
use crate::geometry::{Face, Mesh, Vertex};
use crate::obj::parse_obj_lines;
use crate::projection::{Projector, ProjectorKind};
use crate::view::{DragState, ViewState};

/// Summary figures for a status display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelStats {
    pub vertex_count: usize,
    pub face_count: usize,
    pub size: Vector3<f64>,
}

#[derive(Debug)]
pub struct ModelStore {
    mesh: Mesh,
    view: ViewState,
    config: ViewerConfig,
    projector_kind: ProjectorKind,
    projector: Box<dyn Projector>,
    skipped: Vec<ParseError>,
    pending: Duration,
    needs_redraw: bool,
}

impl ModelStore {
    /// An empty store with the classic viewer settings
    pub fn new() -> Self {
        Self::from_checked(ViewerConfig::default())
    }

    /// A store using `config`, which must pass [`ViewerConfig::validate`]
    pub fn with_config(config: ViewerConfig) -> error::Result<Self> {
        config.validate()?;
        Ok(Self::from_checked(config))
    }

    fn from_checked(config: ViewerConfig) -> Self {
        let projector_kind = config.projector;
        Self {
            mesh: Mesh::new(),
            view: ViewState::new(config.default_scale),
            projector: projector_kind.build(),
            projector_kind,
            config,
            skipped: Vec::new(),
            pending: Duration::ZERO,
            needs_redraw: true,
        }
    }

    /// Replace the current geometry with the contents of OBJ text.
    ///
    /// The text is parsed in full before anything is committed; on error the
    /// previous geometry stays in place.
    pub fn load(&mut self, text: &str) -> Result<(), ParseError> {
        self.load_lines(text.lines())
    }

    pub fn load_lines<'a, I>(&mut self, lines: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let parsed = parse_obj_lines(lines, &self.config.parse)?;
        info!(
            vertices = parsed.mesh.vertex_count(),
            faces = parsed.mesh.face_count(),
            skipped = parsed.skipped.len(),
            "loaded model"
        );
        self.mesh = parsed.mesh;
        self.skipped = parsed.skipped;
        self.needs_redraw = true;
        Ok(())
    }

    /// Swap the model for the built-in cube. View state is left alone.
    pub fn close(&mut self) {
        debug!("closing model, showing built-in cube");
        self.mesh = Mesh::unit_cube();
        self.skipped.clear();
        self.needs_redraw = true;
    }

    /// Zero pan and rotation. Scale and geometry are kept.
    pub fn reset(&mut self) {
        debug!("resetting view transform");
        self.view.reset_transform();
        self.needs_redraw = true;
    }

    pub fn has_model(&self) -> bool {
        !self.mesh.is_empty()
    }

    /// Advance the rotation by one step.
    ///
    /// The step is fixed per call; `dt_millis` does not scale it. Hosts call
    /// this on a steady cadence (see [`ViewerConfig::tick_interval_ms`]).
    pub fn tick(&mut self, dt_millis: u64) {
        if !self.view.rotating {
            return;
        }
        let step = self.config.rotation_step;
        self.view.rotation.rotate(step, step);
        self.needs_redraw = true;
        trace!(dt_millis, angle_x = self.view.rotation.x, "tick");
    }

    /// Convert wall-clock time into whole ticks, carrying the remainder.
    /// Returns the number of ticks issued.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let interval = Duration::from_millis(self.config.tick_interval_ms);
        self.pending += elapsed;
        let mut ticks = 0;
        while self.pending >= interval {
            self.pending -= interval;
            self.tick(self.config.tick_interval_ms);
            ticks += 1;
        }
        ticks
    }

    /// Start a drag with the pointer at `(x, y)`; coordinates are truncated
    /// to whole pixels for the anchor.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.view.last_x = x as i32;
        self.view.last_y = y as i32;
        self.view.drag = DragState::Dragging;
    }

    /// Pan by the pointer movement since the anchor. Ignored unless dragging.
    pub fn drag_to(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if !self.view.is_dragging() {
            return;
        }

        let scale = self.view.scale;
        let half_w = (width / 2) as f64;
        let half_h = (height / 2) as f64;

        let mouse_x = (x - half_w) / scale;
        let mouse_y = (y - half_h) / scale;
        let last_mouse_x = (self.view.last_x as f64 - half_w) / scale;
        let last_mouse_y = (self.view.last_y as f64 - half_h) / scale;

        self.view.translate_x += mouse_x - last_mouse_x;
        self.view.translate_y += (mouse_y - last_mouse_y) * self.config.y_pan_factor;

        if self.config.refresh_anchor_on_move {
            self.view.last_x = x as i32;
            self.view.last_y = y as i32;
        }
        self.needs_redraw = true;
    }

    pub fn end_drag(&mut self) {
        self.view.drag = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        self.view.is_dragging()
    }

    /// Screen positions of every vertex, in vertex order
    pub fn projected_points(&self, width: u32, height: u32) -> Vec<(f64, f64)> {
        self.projected_points_with(self.projector.as_ref(), width, height)
    }

    pub fn projected_points_with(
        &self,
        projector: &dyn Projector,
        width: u32,
        height: u32,
    ) -> Vec<(f64, f64)> {
        self.mesh
            .vertices
            .iter()
            .map(|v| projector.project(v, &self.view, width, height))
            .collect()
    }

    pub fn set_projector(&mut self, kind: ProjectorKind) {
        debug!(?kind, "switching projector");
        self.projector_kind = kind;
        self.projector = kind.build();
        self.needs_redraw = true;
    }

    pub fn projector_kind(&self) -> ProjectorKind {
        self.projector_kind
    }

    pub fn set_rotating(&mut self, rotating: bool) {
        self.view.rotating = rotating;
    }

    pub fn toggle_rotating(&mut self) -> bool {
        self.view.rotating = !self.view.rotating;
        self.view.rotating
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), ViewError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ViewError::InvalidScale(scale));
        }
        self.view.scale = scale;
        self.needs_redraw = true;
        Ok(())
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.mesh.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.mesh.faces
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Lines dropped by the last load when malformed lines are skipped
    pub fn skipped_lines(&self) -> &[ParseError] {
        &self.skipped
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            vertex_count: self.mesh.vertex_count(),
            face_count: self.mesh.face_count(),
            size: self.mesh.size(),
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Flag a redraw for host-side changes such as a resized viewport
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Return the redraw flag and clear it
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

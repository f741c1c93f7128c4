/// objview core - OBJ model store for point-cloud viewers
///
/// Parses the `v`/`f` subset of Wavefront OBJ, keeps the view transform and
/// drag state, and projects vertices to 2D points for a host to draw.

pub mod config;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod projection;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::{ConfigError, ObjviewError, ParseError, Result, ViewError};
pub use geometry::{Face, Mesh, Vertex};
pub use obj::{parse_obj, MalformedLinePolicy, ParseOptions};
pub use projection::{OrthographicProjector, Projector, ProjectorKind, RotatingProjector};
pub use store::{ModelStats, ModelStore};
pub use view::{DragState, RotationState, ViewState};

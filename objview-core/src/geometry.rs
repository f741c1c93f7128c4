/// Geometry primitives held by the viewer
use nalgebra::{Point3, Vector3};

/// A model-space vertex position
pub type Vertex = Point3<f64>;

/// A polygon as 0-based indices into the vertex list
pub type Face = Vec<usize>;

/// Parsed model geometry: vertices and the faces referencing them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when either list is empty; a mesh needs both to be shown as a model
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let (min, max) = self
            .vertices
            .iter()
            .fold((*first, *first), |(min, max), v| (min.inf(v), max.sup(v)));
        Some((min, max))
    }

    /// Extent of the bounding box along each axis
    pub fn size(&self) -> Vector3<f64> {
        self.bounds()
            .map(|(min, max)| max - min)
            .unwrap_or_else(Vector3::zeros)
    }

    /// The built-in cube shown when no model file is open.
    ///
    /// Corners sit at +/-1 on every axis; faces are quads over those corners.
    pub fn unit_cube() -> Self {
        let vertices = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ];

        let faces = vec![
            vec![0, 1, 2, 3],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![2, 3, 7, 6],
            vec![0, 3, 7, 4],
            vec![1, 2, 6, 5],
        ];

        Self { vertices, faces }
    }
}

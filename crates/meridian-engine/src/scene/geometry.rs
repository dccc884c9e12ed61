//! CPU-side vertex generation for the primitive shapes.
//!
//! Every shape is a flat, non-indexed triangle list with counter-clockwise
//! front faces (looking at the face from outside).

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

// ── vertex ────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

    pub const fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── shapes ────────────────────────────────────────────────────────────────

/// Primitive meshes the factory can produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shape {
    Triangle,
    Square,
    Cube,
    Sphere { lat: u32, lon: u32 },
}

impl Shape {
    /// Number of vertices [`GeometryFactory::build`] emits for this shape.
    pub fn vertex_count(self) -> usize {
        match self {
            Shape::Triangle => 3,
            Shape::Square => 6,
            Shape::Cube => 36,
            Shape::Sphere { lat, lon } => 6 * lat as usize * lon as usize,
        }
    }
}

pub struct GeometryFactory;

impl GeometryFactory {
    pub fn build(shape: Shape) -> Vec<Vertex> {
        match shape {
            Shape::Triangle => Self::triangle(),
            Shape::Square => Self::square(),
            Shape::Cube => Self::cube(),
            Shape::Sphere { lat, lon } => Self::sphere(lat, lon),
        }
    }

    pub fn triangle() -> Vec<Vertex> {
        const N: [f32; 3] = [0.0, 0.0, 1.0];
        vec![
            Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0], N),
            Vertex::new([0.5, -0.5, 0.0], [1.0, 0.0], N),
            Vertex::new([0.0, 0.5, 0.0], [0.5, 1.0], N),
        ]
    }

    pub fn square() -> Vec<Vertex> {
        const N: [f32; 3] = [0.0, 0.0, 1.0];
        vec![
            Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0], N),
            Vertex::new([0.5, -0.5, 0.0], [1.0, 0.0], N),
            Vertex::new([0.5, 0.5, 0.0], [1.0, 1.0], N),
            Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0], N),
            Vertex::new([0.5, 0.5, 0.0], [1.0, 1.0], N),
            Vertex::new([-0.5, 0.5, 0.0], [0.0, 1.0], N),
        ]
    }

    /// Unit cube centred at the origin with per-face normals.
    pub fn cube() -> Vec<Vertex> {
        // (normal, u axis, v axis); u x v == normal keeps every face CCW.
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ];
        const CORNERS: [(f32, f32); 6] = [
            (-1.0, -1.0),
            (1.0, -1.0),
            (1.0, 1.0),
            (-1.0, -1.0),
            (1.0, 1.0),
            (-1.0, 1.0),
        ];

        let mut out = Vec::with_capacity(36);
        for (n, u, v) in FACES {
            for (su, sv) in CORNERS {
                let position =
                    std::array::from_fn(|k| 0.5 * n[k] + 0.5 * su * u[k] + 0.5 * sv * v[k]);
                let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
                out.push(Vertex::new(position, uv, n));
            }
        }
        out
    }

    /// Unit sphere of `num_lat` x `num_lon` cells, two triangles per cell.
    ///
    /// Cells touching the poles contain one degenerate (zero-area) triangle.
    pub fn sphere(num_lat: u32, num_lon: u32) -> Vec<Vertex> {
        let mut out = Vec::with_capacity(6 * num_lat as usize * num_lon as usize);

        for lat in 0..num_lat {
            for lon in 0..num_lon {
                let corners: [Vertex; 4] = std::array::from_fn(|i| {
                    let i = i as u32;
                    Self::sphere_point(lat + i / 2, lon + i % 2, num_lat, num_lon)
                });
                for i in [0, 1, 2, 1, 3, 2] {
                    out.push(corners[i]);
                }
            }
        }
        out
    }

    fn sphere_point(lat: u32, lon: u32, num_lat: u32, num_lon: u32) -> Vertex {
        let theta = lat as f32 * PI / num_lat as f32;
        let phi = lon as f32 * 2.0 * PI / num_lon as f32;
        let position = [phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
        // u = phi / 2pi, v = theta / pi, taken from the grid index so the seam is exactly 1.0.
        let uv = [lon as f32 / num_lon as f32, lat as f32 / num_lat as f32];
        Vertex::new(position, uv, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangles(vertices: &[Vertex]) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        vertices.chunks_exact(3).map(|t| {
            [
                Vec3::from(t[0].position),
                Vec3::from(t[1].position),
                Vec3::from(t[2].position),
            ]
        })
    }

    /// Face normal by right-hand rule, `None` for zero-area triangles.
    fn face_normal([a, b, c]: [Vec3; 3]) -> Option<Vec3> {
        let n = (b - a).cross(c - a);
        (n.length() > 1e-6).then_some(n)
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn vertex_counts_match_shape() {
        for shape in [
            Shape::Triangle,
            Shape::Square,
            Shape::Cube,
            Shape::Sphere { lat: 34, lon: 34 },
            Shape::Sphere { lat: 3, lon: 5 },
            Shape::Sphere { lat: 1, lon: 1 },
        ] {
            assert_eq!(GeometryFactory::build(shape).len(), shape.vertex_count());
        }
        assert_eq!(GeometryFactory::sphere(34, 34).len(), 6936);
    }

    // ── sphere ────────────────────────────────────────────────────────────

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        for v in GeometryFactory::sphere(8, 12) {
            let p = Vec3::from(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.position, v.normal);
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn sphere_first_cell_starts_at_north_pole() {
        let verts = GeometryFactory::sphere(4, 4);
        let pole = Vec3::from(verts[0].position);
        assert!((pole - Vec3::Y).length() < 1e-6);
        assert_eq!(verts[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let verts = GeometryFactory::sphere(16, 16);
        let mut checked = 0;
        for tri in triangles(&verts) {
            let Some(n) = face_normal(tri) else { continue };
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(n.dot(centroid) > 0.0, "inward triangle at {centroid:?}");
            checked += 1;
        }
        // Only pole cells contribute a degenerate triangle each.
        assert_eq!(checked, verts.len() / 3 - 2 * 16);
    }

    // ── cube ──────────────────────────────────────────────────────────────

    #[test]
    fn cube_faces_are_ccw_and_match_normals() {
        let verts = GeometryFactory::cube();
        for (tri, v) in triangles(&verts).zip(verts.chunks_exact(3)) {
            let n = face_normal(tri).map(Vec3::normalize);
            assert_eq!(n, Some(Vec3::from(v[0].normal)));
        }
    }

    #[test]
    fn cube_is_unit_and_centred() {
        let verts = GeometryFactory::cube();
        let (mut min, mut max) = (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
        for v in &verts {
            min = min.min(Vec3::from(v.position));
            max = max.max(Vec3::from(v.position));
        }
        assert_eq!(min, Vec3::splat(-0.5));
        assert_eq!(max, Vec3::splat(0.5));
    }

    // ── flat shapes ───────────────────────────────────────────────────────

    #[test]
    fn flat_shapes_face_positive_z() {
        for verts in [GeometryFactory::triangle(), GeometryFactory::square()] {
            for tri in triangles(&verts) {
                let n = face_normal(tri).map(Vec3::normalize);
                assert_eq!(n, Some(Vec3::Z));
            }
        }
    }

    #[test]
    fn vertex_layout_matches_struct() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 20);
    }
}

//! CPU-side geometry.
//!
//! A [`Geometry`] is an indexed triangle list that stays on the CPU so it can be
//! measured (bounding boxes for text layout) and hit-tested before, or without,
//! a GPU upload.

use std::collections::HashSet;

use cgmath::{ElementWise, Vector3};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    /// Triangle list, counter-clockwise when seen from outside.
    pub indices: Vec<u32>,
}

/// Axis aligned bounding box in the geometry's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

impl Geometry {
    /// A box centred at the origin with one quad (two triangles) per face.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        let x = Vector3::unit_x();
        let y = Vector3::unit_y();
        let z = Vector3::unit_z();
        // (normal, u, v) with u x v == normal so the quads wind counter-clockwise
        let faces = [
            (x, -z, y),
            (-x, z, y),
            (y, x, -z),
            (-y, x, z),
            (z, x, y),
            (-z, -x, y),
        ];
        let mut geometry = Geometry::default();
        for (normal, u, v) in faces {
            let base = geometry.positions.len() as u32;
            let centre = normal.mul_element_wise(half);
            let u = u.mul_element_wise(half);
            let v = v.mul_element_wise(half);
            for corner in [centre - u - v, centre + u - v, centre + u + v, centre - u + v] {
                geometry.positions.push(corner.into());
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        geometry
    }

    /// Appends `other`, re-basing its indices.
    pub fn merge(&mut self, other: Geometry) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// `None` for an empty geometry.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first: Vector3<f32> = (*self.positions.first()?).into();
        let (min, max) = self
            .positions
            .iter()
            .skip(1)
            .fold((first, first), |(min, max), &p| {
                (
                    Vector3::new(min.x.min(p[0]), min.y.min(p[1]), min.z.min(p[2])),
                    Vector3::new(max.x.max(p[0]), max.y.max(p[1]), max.z.max(p[2])),
                )
            });
        Some(BoundingBox { min, max })
    }

    /**
     * Line list with every triangle edge exactly once, which is what a
     * wireframe material draws (including the quad diagonals).
     */
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                if seen.insert((a.min(b), a.max(b))) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }
        lines
    }
}

use std::f32::consts::{FRAC_PI_2, SQRT_2};

use cgmath::{InnerSpace, Vector2};

use super::{
    font::{Shape, Typeface, signed_area},
    triangulate::triangulate,
};
use crate::data_structures::geometry::Geometry;

/// Parameters for extruded text. Lengths are in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    /// Height of one em.
    pub size: f32,
    /// Extrusion depth along +z, bevel excluded.
    pub depth: f32,
    /// Points per flattened curve.
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    /// How far the bevel reaches in front of and behind the extrusion.
    pub bevel_thickness: f32,
    /// How far the bevel grows the outline.
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 100.0,
            depth: 50.0,
            curve_segments: 12,
            bevel_enabled: false,
            bevel_thickness: 10.0,
            bevel_size: 8.0,
            bevel_offset: 0.0,
            bevel_segments: 3,
        }
    }
}

impl TextOptions {
    /// `(z, outline offset)` of every vertex layer, back to front.
    fn layers(&self) -> Vec<(f32, f32)> {
        if !self.bevel_enabled {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        }
        let segments = self.bevel_segments.max(1);
        let bevel = |b: u32| {
            let t = b as f32 / segments as f32;
            (
                self.bevel_thickness * (t * FRAC_PI_2).cos(),
                self.bevel_size * (t * FRAC_PI_2).sin() + self.bevel_offset,
            )
        };
        let full = self.bevel_size + self.bevel_offset;
        let mut layers = Vec::with_capacity(2 * segments as usize + 2);
        layers.extend((0..segments).map(|b| {
            let (z, offset) = bevel(b);
            (-z, offset)
        }));
        layers.push((0.0, full));
        layers.push((self.depth, full));
        layers.extend((0..segments).rev().map(|b| {
            let (z, offset) = bevel(b);
            (self.depth + z, offset)
        }));
        layers
    }
}

/// Builds the mesh for `text` laid out from the origin, extruded towards +z.
pub fn text_geometry(typeface: &Typeface, text: &str, options: &TextOptions) -> Geometry {
    typeface
        .generate_shapes(text, options.size, options.curve_segments)
        .iter()
        .map(|shape| extrude(shape, options))
        .fold(Geometry::default(), |mut acc, g| {
            acc.merge(g);
            acc
        })
}

/**
 * Extrudes one shape: a back cap, a front cap and the side walls between
 * every pair of consecutive layers. With a bevel the outline is pushed along
 * its miter vectors, so the caps are the original outline and the widest
 * point is at `z = 0` and `z = depth`.
 */
pub fn extrude(shape: &Shape, options: &TextOptions) -> Geometry {
    let mut contour = shape.contour.clone();
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }
    let holes: Vec<Vec<Vector2<f32>>> = shape
        .holes
        .iter()
        .map(|hole| {
            let mut hole = hole.clone();
            if signed_area(&hole) > 0.0 {
                hole.reverse();
            }
            hole
        })
        .collect();

    let faces = triangulate(&contour, &holes);
    if faces.is_empty() {
        return Geometry::default();
    }

    let rings: Vec<&[Vector2<f32>]> = std::iter::once(contour.as_slice())
        .chain(holes.iter().map(Vec::as_slice))
        .collect();
    let points: Vec<Vector2<f32>> = rings.iter().flat_map(|r| r.iter().copied()).collect();
    let miters: Vec<Vector2<f32>> = rings.iter().flat_map(|r| miter_vectors(r)).collect();

    let layers = options.layers();
    let per_layer = points.len() as u32;
    let mut geometry = Geometry::default();
    for &(z, offset) in &layers {
        geometry.positions.extend(
            points
                .iter()
                .zip(&miters)
                .map(|(p, m)| {
                    let p = *p + *m * offset;
                    [p.x, p.y, z]
                }),
        );
    }

    let last = (layers.len() as u32 - 1) * per_layer;
    for [a, b, c] in &faces {
        geometry.indices.extend([*a, *c, *b]);
    }
    for [a, b, c] in &faces {
        geometry.indices.extend([last + a, last + b, last + c]);
    }

    let mut ring_start = 0u32;
    for ring in &rings {
        let len = ring.len() as u32;
        for i in 0..len {
            let j = (i + 1) % len;
            for layer in 0..layers.len() as u32 - 1 {
                let lo = layer * per_layer + ring_start;
                let hi = lo + per_layer;
                geometry
                    .indices
                    .extend([lo + i, lo + j, hi + j, lo + i, hi + j, hi + i]);
            }
        }
        ring_start += len;
    }
    geometry
}

/// Outward miter vectors of a ring whose interior is on its left, capped at a
/// length of √2 so sharp corners do not spike.
fn miter_vectors(ring: &[Vector2<f32>]) -> Vec<Vector2<f32>> {
    let n = ring.len();
    let outward = |from: Vector2<f32>, to: Vector2<f32>| {
        let d = to - from;
        let len = d.magnitude();
        if len <= f32::EPSILON {
            None
        } else {
            Some(Vector2::new(d.y, -d.x) / len)
        }
    };
    (0..n)
        .map(|i| {
            let prev = ring[(i + n - 1) % n];
            let point = ring[i];
            let next = ring[(i + 1) % n];
            match (outward(prev, point), outward(point, next)) {
                (Some(n1), Some(n2)) => {
                    let sum = n1 + n2;
                    if sum.magnitude2() <= f32::EPSILON {
                        return n1;
                    }
                    let dir = sum.normalize();
                    let cos = dir.dot(n1);
                    let length = if cos <= f32::EPSILON {
                        SQRT_2
                    } else {
                        (1.0 / cos).min(SQRT_2)
                    };
                    dir * length
                }
                (Some(normal), None) | (None, Some(normal)) => normal,
                (None, None) => Vector2::new(0.0, 0.0),
            }
        })
        .collect()
}

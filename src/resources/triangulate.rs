//! Ear clipping triangulation for polygons with holes.
//!
//! Holes are joined to the outer contour with zero-width bridges (rightmost
//! hole first) and the resulting single ring is clipped ear by ear. Output
//! indices refer to the concatenation `contour ++ holes[0] ++ holes[1] ...`.

use cgmath::Vector2;

use super::font::signed_area;

const EPSILON: f32 = 1e-9;

fn cross(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Positive when `a -> b -> c` turns left.
fn orient(a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> f32 {
    cross(b - a, c - b)
}

fn same(a: Vector2<f32>, b: Vector2<f32>) -> bool {
    (a.x - b.x).abs() <= EPSILON && (a.y - b.y).abs() <= EPSILON
}

/// Proper crossing of `p1p2` and `q1q2`. Touching at shared endpoints and
/// collinear overlap do not count.
fn segments_cross(p1: Vector2<f32>, p2: Vector2<f32>, q1: Vector2<f32>, q2: Vector2<f32>) -> bool {
    if same(p1, q1) || same(p1, q2) || same(p2, q1) || same(p2, q2) {
        return false;
    }
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn point_in_triangle(p: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> bool {
    orient(a, b, p) >= 0.0 && orient(b, c, p) >= 0.0 && orient(c, a, p) >= 0.0
}

/// Whether `target` lies inside the interior angle at `ring[at]` of a
/// counter-clockwise ring.
fn in_sector(points: &[Vector2<f32>], ring: &[usize], at: usize, target: Vector2<f32>) -> bool {
    let n = ring.len();
    let a = points[ring[(at + n - 1) % n]];
    let p = points[ring[at]];
    let b = points[ring[(at + 1) % n]];
    if orient(a, p, b) >= 0.0 {
        orient(a, p, target) >= 0.0 && orient(p, b, target) >= 0.0
    } else {
        orient(a, p, target) >= 0.0 || orient(p, b, target) >= 0.0
    }
}

fn ring_edges<'a>(
    points: &'a [Vector2<f32>],
    ring: &'a [usize],
) -> impl Iterator<Item = (Vector2<f32>, Vector2<f32>)> + 'a {
    (0..ring.len()).map(move |i| (points[ring[i]], points[ring[(i + 1) % ring.len()]]))
}

/**
 * Triangulates `contour` with `holes` cut out.
 *
 * Winding of the inputs does not matter. Returned triangles are counter
 * clockwise (y up). Degenerate input yields fewer triangles rather than an
 * error; an empty result means nothing could be filled.
 */
pub fn triangulate(contour: &[Vector2<f32>], holes: &[Vec<Vector2<f32>>]) -> Vec<[u32; 3]> {
    if contour.len() < 3 {
        return Vec::new();
    }
    let points: Vec<Vector2<f32>> = contour
        .iter()
        .chain(holes.iter().flatten())
        .copied()
        .collect();

    let mut ring: Vec<usize> = (0..contour.len()).collect();
    if signed_area(contour) < 0.0 {
        ring.reverse();
    }

    let mut hole_rings = Vec::new();
    let mut start = contour.len();
    for hole in holes {
        let mut hole_ring: Vec<usize> = (start..start + hole.len()).collect();
        start += hole.len();
        if hole.len() < 3 {
            continue;
        }
        if signed_area(hole) > 0.0 {
            hole_ring.reverse();
        }
        hole_rings.push(hole_ring);
    }
    // Rightmost holes first so later bridges never have to cross earlier ones.
    hole_rings.sort_by(|a, b| rightmost_x(&points, b).total_cmp(&rightmost_x(&points, a)));

    for (i, hole) in hole_rings.iter().enumerate() {
        let remaining = &hole_rings[i..];
        match bridge(&points, &ring, hole, remaining) {
            Some(merged) => ring = merged,
            None => log::debug!("Cannot bridge a hole, it will be filled"),
        }
    }

    clip_ears(&points, ring)
}

fn rightmost_x(points: &[Vector2<f32>], ring: &[usize]) -> f32 {
    ring.iter()
        .map(|&i| points[i].x)
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Splices `hole` into `ring` through a bridge that crosses no edge.
fn bridge(
    points: &[Vector2<f32>],
    ring: &[usize],
    hole: &[usize],
    remaining: &[Vec<usize>],
) -> Option<Vec<usize>> {
    let (m_at, _) = hole
        .iter()
        .enumerate()
        .max_by(|a, b| points[*a.1].x.total_cmp(&points[*b.1].x))?;
    let m = points[hole[m_at]];

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        let da = (points[ring[a]] - m).x.powi(2) + (points[ring[a]] - m).y.powi(2);
        let db = (points[ring[b]] - m).x.powi(2) + (points[ring[b]] - m).y.powi(2);
        da.total_cmp(&db)
    });

    let at = candidates.into_iter().find(|&at| {
        let p = points[ring[at]];
        if !in_sector(points, ring, at, m) {
            return false;
        }
        let crosses_ring = ring_edges(points, ring).any(|(a, b)| segments_cross(p, m, a, b));
        let crosses_hole = remaining
            .iter()
            .any(|h| ring_edges(points, h).any(|(a, b)| segments_cross(p, m, a, b)));
        !crosses_ring && !crosses_hole
    })?;

    let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
    merged.extend_from_slice(&ring[..=at]);
    merged.extend((0..=hole.len()).map(|k| hole[(m_at + k) % hole.len()]));
    merged.extend_from_slice(&ring[at..]);
    Some(merged)
}

fn is_ear(points: &[Vector2<f32>], ring: &[usize], at: usize) -> bool {
    let n = ring.len();
    let a = points[ring[(at + n - 1) % n]];
    let b = points[ring[at]];
    let c = points[ring[(at + 1) % n]];
    if orient(a, b, c) <= 0.0 {
        return false;
    }
    ring.iter().map(|&i| points[i]).all(|p| {
        same(p, a) || same(p, b) || same(p, c) || !point_in_triangle(p, a, b, c)
    })
}

fn clip_ears(points: &[Vector2<f32>], mut ring: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut at = 0;
    let mut misses = 0;
    while ring.len() > 3 {
        let n = ring.len();
        at %= n;
        let (a, b, c) = (ring[(at + n - 1) % n], ring[at], ring[(at + 1) % n]);
        let area = orient(points[a], points[b], points[c]);
        if area.abs() <= EPSILON {
            // Collinear or a bridge spike: drop the vertex, nothing to fill.
            ring.remove(at);
            at = at.saturating_sub(1);
            misses = 0;
        } else if is_ear(points, &ring, at) {
            triangles.push([a as u32, b as u32, c as u32]);
            ring.remove(at);
            at = at.saturating_sub(1);
            misses = 0;
        } else if misses + 1 >= n {
            // Self intersecting input; force progress.
            if area > 0.0 {
                triangles.push([a as u32, b as u32, c as u32]);
            }
            ring.remove(at);
            misses = 0;
        } else {
            at += 1;
            misses += 1;
        }
    }
    if let [a, b, c] = ring[..] {
        if orient(points[a], points[b], points[c]) > EPSILON {
            triangles.push([a as u32, b as u32, c as u32]);
        }
    }
    triangles
}

//! Typeface fonts: glyph outlines stored as JSON.
//!
//! The format is the one produced by the common "facetype" converters: a
//! `resolution` (units per em), font-wide metrics and a map from character to
//! glyph. A glyph has an advance `ha` and an outline string `o`:
//!
//! ```text
//! m x y                 move to
//! l x y                 line to
//! q x y cx cy           quadratic curve to (x, y) with control point (cx, cy)
//! b x y c1x c1y c2x c2y cubic curve to (x, y) with control points c1, c2
//! z                     close (implicit, ignored)
//! ```

use std::collections::HashMap;

use anyhow::{Context, anyhow, bail};
use cgmath::Vector2;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Typeface {
    pub glyphs: HashMap<String, Glyph>,
    #[serde(rename = "familyName", default)]
    pub family_name: String,
    pub resolution: f32,
    #[serde(rename = "boundingBox")]
    pub bounding_box: FontBounds,
    #[serde(rename = "underlineThickness", default)]
    pub underline_thickness: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FontBounds {
    #[serde(rename = "yMin")]
    pub y_min: f32,
    #[serde(rename = "yMax")]
    pub y_max: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Glyph {
    pub ha: f32,
    #[serde(default)]
    pub o: Option<String>,
}

/// One filled region of a glyph and the holes cut out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub contour: Vec<Vector2<f32>>,
    pub holes: Vec<Vec<Vector2<f32>>>,
}

impl Typeface {
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let typeface: Typeface = serde_json::from_str(json)?;
        if typeface.resolution <= 0.0 {
            bail!("resolution must be positive, got {}", typeface.resolution);
        }
        Ok(typeface)
    }

    fn glyph(&self, c: char) -> Option<&Glyph> {
        let mut buf = [0u8; 4];
        self.glyphs
            .get(c.encode_utf8(&mut buf) as &str)
            .or_else(|| self.glyphs.get("?"))
    }

    /**
     * Lays out `text` at `size` world units per em and returns the filled
     * shapes of all glyphs, with curves flattened to `curve_segments` points.
     *
     * Glyphs are placed left to right starting at the origin; `\n` starts a new
     * line below. Characters without a glyph (and without a `?` fallback) are
     * skipped.
     */
    pub fn generate_shapes(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Shape> {
        let scale = size / self.resolution;
        let line_height =
            (self.bounding_box.y_max - self.bounding_box.y_min + self.underline_thickness) * scale;
        let mut offset = Vector2::new(0.0, 0.0);
        let mut shapes = Vec::new();
        for c in text.chars() {
            if c == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }
            let Some(glyph) = self.glyph(c) else {
                log::warn!(
                    "Character {:?} is missing from typeface {}",
                    c,
                    self.family_name
                );
                continue;
            };
            if let Some(outline) = &glyph.o {
                match parse_outline(outline, scale, offset, curve_segments) {
                    Ok(paths) => shapes.append(&mut to_shapes(paths)),
                    Err(e) => log::warn!("Skipping malformed glyph {:?}: {}", c, e),
                }
            }
            offset.x += glyph.ha * scale;
        }
        shapes
    }
}

/// Flattens an outline string into closed sub-paths (first point not repeated).
pub fn parse_outline(
    outline: &str,
    scale: f32,
    offset: Vector2<f32>,
    curve_segments: u32,
) -> anyhow::Result<Vec<Vec<Vector2<f32>>>> {
    let mut tokens = outline.split_whitespace();
    let next_point = |tokens: &mut std::str::SplitWhitespace| -> anyhow::Result<Vector2<f32>> {
        let mut coord = || -> anyhow::Result<f32> {
            let token = tokens.next().context("outline ends in the middle of a command")?;
            token
                .parse::<f32>()
                .with_context(|| format!("{:?} is not a number", token))
        };
        let x = coord()?;
        let y = coord()?;
        Ok(Vector2::new(x * scale, y * scale) + offset)
    };
    let segments = curve_segments.max(1);

    let mut paths: Vec<Vec<Vector2<f32>>> = Vec::new();
    let mut current: Vec<Vector2<f32>> = Vec::new();
    while let Some(command) = tokens.next() {
        match command {
            "m" => {
                if !current.is_empty() {
                    paths.push(std::mem::take(&mut current));
                }
                current.push(next_point(&mut tokens)?);
            }
            "l" => current.push(next_point(&mut tokens)?),
            "q" => {
                let end = next_point(&mut tokens)?;
                let control = next_point(&mut tokens)?;
                let start = *current.last().context("curve without a start point")?;
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let u = 1.0 - t;
                    current.push(start * (u * u) + control * (2.0 * u * t) + end * (t * t));
                }
            }
            "b" => {
                let end = next_point(&mut tokens)?;
                let c1 = next_point(&mut tokens)?;
                let c2 = next_point(&mut tokens)?;
                let start = *current.last().context("curve without a start point")?;
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let u = 1.0 - t;
                    current.push(
                        start * (u * u * u)
                            + c1 * (3.0 * u * u * t)
                            + c2 * (3.0 * u * t * t)
                            + end * (t * t * t),
                    );
                }
            }
            "z" => (),
            other => return Err(anyhow!("unknown outline command {:?}", other)),
        }
    }
    if !current.is_empty() {
        paths.push(current);
    }
    Ok(paths.into_iter().map(clean_path).filter(|p| p.len() >= 3).collect())
}

/// Removes consecutive duplicates and the closing point.
fn clean_path(mut path: Vec<Vector2<f32>>) -> Vec<Vector2<f32>> {
    path.dedup_by(|a, b| same_point(*a, *b));
    while path.len() > 1 && same_point(path[0], path[path.len() - 1]) {
        path.pop();
    }
    path
}

fn same_point(a: Vector2<f32>, b: Vector2<f32>) -> bool {
    (a.x - b.x).abs() <= f32::EPSILON && (a.y - b.y).abs() <= f32::EPSILON
}

/// Shoelace area, positive for counter-clockwise paths (y up).
pub fn signed_area(path: &[Vector2<f32>]) -> f32 {
    let n = path.len();
    (0..n)
        .map(|i| {
            let p = path[(i + n - 1) % n];
            let q = path[i];
            p.x * q.y - q.x * p.y
        })
        .sum::<f32>()
        * 0.5
}

pub fn contains_point(path: &[Vector2<f32>], point: Vector2<f32>) -> bool {
    let n = path.len();
    let mut inside = false;
    for i in 0..n {
        let a = path[i];
        let b = path[(i + n - 1) % n];
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/**
 * Splits the sub-paths of one glyph into solids and holes.
 *
 * The winding of the largest sub-path decides which orientation is solid,
 * so fonts with either convention work. Every hole goes to the smallest
 * solid containing its first point.
 */
pub fn to_shapes(paths: Vec<Vec<Vector2<f32>>>) -> Vec<Shape> {
    let Some(solid_sign) = paths
        .iter()
        .map(|p| signed_area(p))
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .map(f32::signum)
    else {
        return Vec::new();
    };
    let (solids, holes): (Vec<_>, Vec<_>) = paths
        .into_iter()
        .partition(|p| signed_area(p).signum() == solid_sign);
    let mut shapes = solids
        .into_iter()
        .map(|contour| Shape {
            contour,
            holes: Vec::new(),
        })
        .collect::<Vec<_>>();
    for hole in holes {
        let owner = shapes
            .iter_mut()
            .filter(|shape| contains_point(&shape.contour, hole[0]))
            .min_by(|a, b| {
                signed_area(&a.contour)
                    .abs()
                    .total_cmp(&signed_area(&b.contour).abs())
            });
        match owner {
            Some(shape) => shape.holes.push(hole),
            None => log::debug!("Dropping a glyph hole outside of every contour"),
        }
    }
    shapes
}

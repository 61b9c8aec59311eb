use approx::assert_relative_eq;
use cgmath::Vector2;
use welcome_ngin::resources::font::{Typeface, parse_outline, signed_area, to_shapes};

mod common;
use common::test_utils::test_typeface;

fn min_x(points: &[Vector2<f32>]) -> f32 {
    points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min)
}

fn min_y(points: &[Vector2<f32>]) -> f32 {
    points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
}

#[test]
fn parses_fixture() {
    let font = test_typeface();
    assert_eq!(font.family_name, "Test Blocks");
    assert_relative_eq!(font.resolution, 1000.0);
    assert_relative_eq!(font.bounding_box.y_min, -200.0);
    assert_eq!(font.glyphs.len(), 5);
}

#[test]
fn rejects_broken_documents() {
    assert!(Typeface::parse("{").is_err());
    assert!(Typeface::parse(r#"{"glyphs": {}}"#).is_err());
    let zero = r#"{"glyphs": {}, "resolution": 0, "boundingBox": {"yMin": 0, "yMax": 1}}"#;
    assert!(Typeface::parse(zero).is_err());
}

#[test]
fn ring_glyph_has_one_hole() {
    let shapes = test_typeface().generate_shapes("o", 1.0, 12);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].contour.len(), 4);
    assert_eq!(shapes[0].holes.len(), 1);
    assert_eq!(shapes[0].holes[0].len(), 4);
}

#[test]
fn curves_are_flattened() {
    let shapes = test_typeface().generate_shapes("c", 1.0, 4);
    assert_eq!(shapes.len(), 1);
    // move, two lines and four curve points
    let contour = &shapes[0].contour;
    assert_eq!(contour.len(), 7);
    let end = contour[6];
    assert_relative_eq!(end.x, 0.5);
    assert_relative_eq!(end.y, 0.0);
    // The curve bulges towards its control point.
    assert!(contour.iter().any(|p| p.x > 0.55));
}

#[test]
fn glyphs_advance() {
    let font = test_typeface();
    let shapes = font.generate_shapes("E E", 1.0, 12);
    assert_eq!(shapes.len(), 2);
    assert_relative_eq!(min_x(&shapes[0].contour), 0.0);
    assert_relative_eq!(min_x(&shapes[1].contour), 0.9, epsilon = 1e-6);

    let scaled = font.generate_shapes("EE", 0.5, 12);
    assert_relative_eq!(min_x(&scaled[1].contour), 0.3, epsilon = 1e-6);
}

#[test]
fn newline_starts_a_new_line() {
    let shapes = test_typeface().generate_shapes("E\nE", 1.0, 12);
    assert_eq!(shapes.len(), 2);
    assert_relative_eq!(min_x(&shapes[1].contour), 0.0);
    assert_relative_eq!(min_y(&shapes[1].contour), -1.15, epsilon = 1e-6);
}

#[test]
fn unknown_characters_use_the_fallback() {
    let shapes = test_typeface().generate_shapes("x", 1.0, 12);
    assert_eq!(shapes.len(), 1);
}

#[test]
fn unknown_characters_without_fallback_are_skipped() {
    let json = r#"{
        "resolution": 1000,
        "boundingBox": {"yMin": 0, "yMax": 1000},
        "glyphs": {"a": {"ha": 500, "o": "m 0 0 l 0 500 l 500 500 l 500 0 z"}}
    }"#;
    let font = Typeface::parse(json).unwrap();
    let shapes = font.generate_shapes("xa", 1.0, 12);
    assert_eq!(shapes.len(), 1);
    // The skipped character does not advance.
    assert_relative_eq!(min_x(&shapes[0].contour), 0.0);
}

#[test]
fn malformed_outlines_are_errors() {
    let origin = Vector2::new(0.0, 0.0);
    assert!(parse_outline("m 0 0 l 1", 1.0, origin, 12).is_err());
    assert!(parse_outline("m 0 0 k 1 1", 1.0, origin, 12).is_err());
    assert!(parse_outline("q 1 1 2 2", 1.0, origin, 12).is_err());
    assert!(parse_outline("m a b", 1.0, origin, 12).is_err());
}

#[test]
fn closing_point_and_duplicates_are_dropped() {
    let paths = parse_outline("m 0 0 l 0 1 l 0 1 l 1 1 l 0 0 z", 1.0, Vector2::new(0.0, 0.0), 12)
        .unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), 3);
}

#[test]
fn either_winding_convention_finds_the_hole() {
    let outer = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(4.0, 0.0),
        Vector2::new(4.0, 4.0),
        Vector2::new(0.0, 4.0),
    ];
    let inner = vec![
        Vector2::new(1.0, 1.0),
        Vector2::new(1.0, 3.0),
        Vector2::new(3.0, 3.0),
        Vector2::new(3.0, 1.0),
    ];
    assert_relative_eq!(signed_area(&outer), 16.0);
    assert_relative_eq!(signed_area(&inner), -4.0);

    let shapes = to_shapes(vec![outer.clone(), inner.clone()]);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].holes.len(), 1);

    let flipped = |mut p: Vec<Vector2<f32>>| {
        p.reverse();
        p
    };
    let shapes = to_shapes(vec![flipped(inner), flipped(outer)]);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].holes.len(), 1);
    assert_relative_eq!(signed_area(&shapes[0].contour), -16.0);
}

#[test]
fn separate_solids_stay_separate() {
    let square = |x: f32| {
        vec![
            Vector2::new(x, 0.0),
            Vector2::new(x, 1.0),
            Vector2::new(x + 1.0, 1.0),
            Vector2::new(x + 1.0, 0.0),
        ]
    };
    let shapes = to_shapes(vec![square(0.0), square(2.0)]);
    assert_eq!(shapes.len(), 2);
    assert!(shapes.iter().all(|s| s.holes.is_empty()));
}

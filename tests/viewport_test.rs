use approx::assert_relative_eq;
use welcome_ngin::viewport::Viewport;

mod common;
use common::test_utils::viewport;

#[test]
fn aspect_follows_window() {
    let vp = viewport(1024.0, 768.0);
    assert_relative_eq!(vp.aspect(), 1024.0 / 768.0);
    assert_relative_eq!(vp.aspect(), 1.333_333_3, epsilon = 1e-6);
}

#[test]
fn resize_updates_projection() {
    let mut vp = viewport(800.0, 600.0);
    assert!(vp.resize(500.0, 1000.0, 1.0));
    assert_relative_eq!(vp.aspect(), 0.5);
    assert_relative_eq!(vp.projection.aspect, 0.5);
    assert_eq!(vp.surface_size(), (500, 1000));
}

#[test]
fn pixel_ratio_is_capped_at_two() {
    let mut vp = Viewport::new(100.0, 50.0, 3.0, 2.0);
    assert_relative_eq!(vp.pixel_ratio(), 2.0);
    assert_eq!(vp.surface_size(), (200, 100));

    vp.resize(100.0, 50.0, 1.5);
    assert_relative_eq!(vp.pixel_ratio(), 1.5);
    assert_eq!(vp.surface_size(), (150, 75));
}

#[test]
fn resizing_twice_is_like_resizing_once() {
    let mut once = viewport(640.0, 480.0);
    once.resize(1280.0, 720.0, 2.0);
    let mut twice = once.clone();
    twice.resize(1280.0, 720.0, 2.0);
    assert_eq!(once, twice);
}

#[test]
fn empty_sizes_are_ignored() {
    let mut vp = viewport(1024.0, 768.0);
    let before = vp.clone();
    assert!(!vp.resize(0.0, 768.0, 1.0));
    assert!(!vp.resize(1024.0, 0.0, 1.0));
    assert_eq!(vp, before);
}

use instant::Duration;
use welcome_ngin::{
    animation,
    data_structures::geometry::Geometry,
    interaction::{Pointer, hit_test},
    landing::TextTarget,
};

mod common;
use common::test_utils::{camera, landing, viewport};

// Screen position of the button centre (0, -1.2, 0) in a 1024x768 window
// seen through the default camera.
const BUTTON_X: f64 = 512.0;
const BUTTON_Y: f64 = 529.0;

#[test]
fn click_on_button_navigates_once() {
    let (mut landing, visits) = landing();
    let vp = viewport(1024.0, 768.0);

    assert!(landing.click(&camera(), &vp, BUTTON_X, BUTTON_Y));
    assert_eq!(*visits.borrow(), vec!["about.html".to_string()]);

    assert!(landing.click(&camera(), &vp, BUTTON_X, BUTTON_Y));
    assert_eq!(visits.borrow().len(), 2);
}

#[test]
fn click_outside_button_does_nothing() {
    let (mut landing, visits) = landing();
    let vp = viewport(1024.0, 768.0);

    assert!(!landing.click(&camera(), &vp, 100.0, 100.0));
    // The main cube is in the middle of the screen but is not clickable.
    assert!(!landing.click(&camera(), &vp, 512.0, 384.0));
    assert!(visits.borrow().is_empty());
}

#[test]
fn rotated_button_is_still_hit() {
    let (mut landing, visits) = landing();
    animation::advance(&mut landing, Duration::from_millis(1000));

    assert!(landing.click(&camera(), &viewport(1024.0, 768.0), BUTTON_X, BUTTON_Y));
    assert_eq!(visits.borrow().len(), 1);
}

#[test]
fn button_text_is_not_part_of_the_hit_box() {
    let (mut landing, visits) = landing();
    // A very wide "text" reaching far to the left of the button box.
    landing.attach_text(TextTarget::Enter, Geometry::cuboid(8.0, 0.2, 0.1));
    let vp = viewport(1024.0, 768.0);

    assert!(!landing.click(&camera(), &vp, 124.0, BUTTON_Y));
    assert!(visits.borrow().is_empty());
}

#[test]
fn ray_through_centre_hits_a_box_in_front() {
    let (landing, _) = landing();
    let vp = viewport(800.0, 600.0);
    let pointer = Pointer::from_screen(400.0, 300.0, 800.0, 600.0).unwrap();
    let ray = pointer.ray(&camera(), &vp.projection).unwrap();

    // Main cube front face is at z = 0.255, the camera at z = 5.
    let distance = hit_test(&ray, landing.scene.node(landing.main_cube)).unwrap();
    assert!((distance - 4.745).abs() < 1e-3, "distance was {}", distance);
}

#[test]
fn resize_keeps_click_mapping_consistent() {
    let (mut landing, visits) = landing();
    let mut vp = viewport(1024.0, 768.0);
    vp.resize(2048.0, 1536.0, 1.0);

    assert!(landing.click(&camera(), &vp, BUTTON_X * 2.0, BUTTON_Y * 2.0));
    assert_eq!(visits.borrow().len(), 1);
}

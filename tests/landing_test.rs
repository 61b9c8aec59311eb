use approx::assert_relative_eq;
use cgmath::{Matrix4, Vector4};
use instant::Duration;
use welcome_ngin::{
    animation,
    config::Config,
    data_structures::{geometry::Geometry, model::hex_to_linear},
    landing::{
        BUTTON_COLOUR, LandingEvent, MAIN_CUBE_COLOUR, SMALL_CUBE_COLOURS, TextTarget,
    },
};

mod common;
use common::test_utils::{fixture_config, landing, landing_with};

#[test]
fn scene_is_assembled_in_order() {
    let (landing, _) = landing();
    let nodes = landing.scene.nodes();
    assert_eq!(nodes.len(), 6);

    let main = landing.scene.node(landing.main_cube);
    assert!(!main.material().wireframe);
    assert_eq!(main.material().colour, hex_to_linear(MAIN_CUBE_COLOUR));
    let bounds = main.geometry().bounding_box().unwrap();
    assert_relative_eq!(bounds.size().x, 4.5);
    assert_relative_eq!(bounds.size().y, 1.0);
    assert_relative_eq!(bounds.size().z, 0.51);

    let expected = [(-2.0, -2.0), (2.0, -2.0), (-2.0, 2.0), (2.0, 2.0)];
    assert_eq!(landing.small_cubes.len(), 4);
    for (i, &cube) in landing.small_cubes.iter().enumerate() {
        let node = landing.scene.node(cube);
        assert!(node.material().wireframe);
        assert_eq!(node.material().colour, hex_to_linear(SMALL_CUBE_COLOURS[i]));
        let position = node.get_local_transform().position;
        assert_relative_eq!(position.x, expected[i].0);
        assert_relative_eq!(position.y, expected[i].1);
        assert_relative_eq!(position.z, 0.0);
    }

    let button = landing.scene.node(landing.button);
    assert!(button.material().wireframe);
    assert_eq!(button.material().colour, hex_to_linear(BUTTON_COLOUR));
    assert_relative_eq!(button.get_local_transform().position.y, -1.2);
}

#[test]
fn welcome_text_is_centred_on_main_cube() {
    let (mut landing, _) = landing();
    landing.attach_text(TextTarget::Welcome, Geometry::cuboid(2.0, 0.4, 0.1));

    let children = landing.scene.node(landing.main_cube).get_children();
    assert_eq!(children.len(), 1);
    let position = children[0].get_local_transform().position;
    assert_relative_eq!(position.x, -1.0);
    assert_relative_eq!(position.y, -0.1);
    assert_relative_eq!(position.z, 0.26);
}

#[test]
fn enter_text_is_placed_on_button() {
    let (mut landing, _) = landing();
    landing.attach_text(TextTarget::Enter, Geometry::cuboid(0.8, 0.3, 0.1));

    let children = landing.scene.node(landing.button).get_children();
    assert_eq!(children.len(), 1);
    let position = children[0].get_local_transform().position;
    assert_relative_eq!(position.x, -0.4);
    assert_relative_eq!(position.y, 0.7 / 21.5 - 0.3 / 1.9, epsilon = 1e-6);
    assert_relative_eq!(position.z, 0.0);
    assert!(landing.scene.node(landing.main_cube).get_children().is_empty());
}

#[test]
fn text_follows_its_parent() {
    let (mut landing, _) = landing();
    landing.attach_text(TextTarget::Enter, Geometry::cuboid(0.8, 0.3, 0.1));
    animation::advance(&mut landing, Duration::from_millis(700));
    landing.scene.update_world_transforms();

    let button = landing.scene.node(landing.button);
    let text = &button.get_children()[0];
    let expected: Matrix4<f32> =
        button.get_world_transform() * text.get_local_transform().to_matrix();
    let actual = text.get_world_transform();
    let probe = Vector4::new(0.3, -0.2, 0.1, 1.0);
    let (a, b) = (actual * probe, expected * probe);
    assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
    assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
    assert_relative_eq!(a.z, b.z, epsilon = 1e-6);
}

#[test]
fn empty_text_is_not_attached() {
    let (mut landing, _) = landing();
    landing.attach_text(TextTarget::Welcome, Geometry::default());
    assert!(landing.scene.node(landing.main_cube).get_children().is_empty());
}

#[test]
fn font_failure_leaves_the_cube_bare() {
    let (mut landing, _) = landing();
    landing.on_text_loaded(LandingEvent::TextLoaded {
        target: TextTarget::Welcome,
        result: Err(anyhow::anyhow!("404")),
    });
    for _ in 0..10 {
        animation::advance(&mut landing, Duration::from_millis(16));
    }
    assert!(landing.scene.node(landing.main_cube).get_children().is_empty());
    assert!(landing.scene.node(landing.button).get_children().is_empty());
}

#[tokio::test]
async fn missing_font_file_reports_an_error() {
    let config = Config {
        asset_root: "/definitely/not/here".into(),
        ..Config::default()
    };
    let (mut landing, _) = landing_with(config);
    let event = landing.load_text(TextTarget::Welcome).await;
    let LandingEvent::TextLoaded { target, result } = &event;
    assert_eq!(*target, TextTarget::Welcome);
    assert!(result.is_err());

    landing.on_text_loaded(event);
    assert!(landing.scene.node(landing.main_cube).get_children().is_empty());
}

#[tokio::test]
async fn fixture_font_builds_both_texts() {
    let (mut landing, _) = landing_with(fixture_config());
    for target in [TextTarget::Welcome, TextTarget::Enter] {
        let event = landing.load_text(target).await;
        landing.on_text_loaded(event);
    }

    let welcome = &landing.scene.node(landing.main_cube).get_children()[0];
    assert_eq!(welcome.name, "Welcome to my page");
    assert!(welcome.geometry().triangle_count() > 0);
    let enter = &landing.scene.node(landing.button).get_children()[0];
    assert_eq!(enter.name, "Enter");

    // Centred: the text's own bounding box starts at -w/2.
    let bounds = enter.geometry().bounding_box().unwrap();
    let x = enter.get_local_transform().position.x;
    assert_relative_eq!(x, -bounds.size().x / 2.0, epsilon = 1e-6);
}

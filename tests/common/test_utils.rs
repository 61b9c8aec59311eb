#![allow(dead_code)]

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use welcome_ngin::{
    camera::Camera,
    config::Config,
    interaction::Navigator,
    landing::Landing,
    resources::font::Typeface,
    viewport::Viewport,
};

pub const FIXTURE_FONT: &str = "test.typeface.json";

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn test_typeface() -> Typeface {
    let json = std::fs::read_to_string(fixtures_dir().join(FIXTURE_FONT))
        .expect("fixture font is readable");
    Typeface::parse(&json).expect("fixture font parses")
}

/// Config that reads fonts from `tests/fixtures`.
pub fn fixture_config() -> Config {
    Config {
        asset_root: fixtures_dir(),
        font_file: FIXTURE_FONT.to_string(),
        ..Config::default()
    }
}

/// Remembers every navigation so tests can count them.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    pub visits: Rc<RefCell<Vec<String>>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, target: &str) {
        self.visits.borrow_mut().push(target.to_string());
    }
}

pub fn landing_with(config: Config) -> (Landing, Rc<RefCell<Vec<String>>>) {
    let navigator = RecordingNavigator::default();
    let visits = navigator.visits.clone();
    (Landing::new(config, Box::new(navigator)), visits)
}

pub fn landing() -> (Landing, Rc<RefCell<Vec<String>>>) {
    landing_with(Config::default())
}

/// The camera every landing page starts with.
pub fn camera() -> Camera {
    Camera::new((0.0, 0.0, 5.0), cgmath::Deg(-90.0), cgmath::Deg(0.0))
}

pub fn viewport(width: f64, height: f64) -> Viewport {
    Viewport::new(width, height, 1.0, 2.0)
}

//! welcome-ngin
//!
//! A small 3D landing page for native windows and the web: a rotating cube
//! with extruded "Welcome to my page" text, four spinning wireframe cubes and
//! an "Enter" button that leaves for the next page when clicked.
//!
//! High-level modules
//! - `landing`: the scene itself and its reaction to clicks and fonts
//! - `animation`: per-frame rotation and the frame clock
//! - `interaction`: pointer conversion, ray hit tests and navigation
//! - `camera` / `viewport`: projection, resize handling and picking rays
//! - `context`: GPU and window context that owns device/queue/pipelines
//! - `data_structures`: geometry, scene graph, instances and meshes
//! - `resources`: typeface loading, triangulation and text extrusion
//! - `flow`: the event loop and the flow trait scenes implement
//! - `pipelines` / `render`: GPU pipelines and draw batching
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod interaction;
pub mod landing;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::{
    config::Config,
    flow::GraphicsFlow,
    interaction::PlatformNavigator,
    landing::{Landing, LandingEvent},
};

/// Builds the landing page from the environment's configuration and runs it
/// until the window closes.
pub fn start() -> anyhow::Result<()> {
    let config = Config::from_env();
    let landing = Landing::new(config.clone(), Box::new(PlatformNavigator::default()));
    let flows: Vec<Box<dyn GraphicsFlow<LandingEvent>>> = vec![Box::new(landing)];
    flow::run(config, flows)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    start().map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

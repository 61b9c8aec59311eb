//! Engine data structures: geometry, meshes, instances and the scene graph.
//!
//! - `geometry` holds CPU-side triangle lists, bounding boxes and wireframe edges
//! - `model` contains GPU meshes, materials and draw helpers
//! - `texture` wraps the depth buffer
//! - `instance` holds per-node transformation and the raw GPU instance data
//! - `scene_graph` enables hierarchical scene organization

pub mod geometry;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;

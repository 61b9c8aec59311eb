//! Click handling: pointer conversion, ray casting and navigation.

use crate::{
    camera::{Camera, Projection, Ray},
    data_structures::scene_graph::MeshNode,
};

/// A click position in normalized device coordinates (-1..1, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    /// Converts window coordinates (origin top left, y down) of a viewport
    /// `width` by `height` large. `None` while the viewport is empty.
    pub fn from_screen(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            x: (x / width * 2.0 - 1.0) as f32,
            y: (1.0 - y / height * 2.0) as f32,
        })
    }

    pub fn ray(&self, camera: &Camera, projection: &Projection) -> Option<Ray> {
        camera.cast_ray(self.x, self.y, projection)
    }
}

/// Distance along `ray` to the bounding box of `node`, tested in the node's
/// local space so its rotation and scale are honoured. Children are ignored.
pub fn hit_test(ray: &Ray, node: &MeshNode) -> Option<f32> {
    let bounds = node.geometry().bounding_box()?;
    let local = ray.to_local(&node.get_world_transform())?;
    local.intersect_aabb(bounds.min, bounds.max)
}

/// Leaves the page for another location.
pub trait Navigator {
    fn navigate(&mut self, target: &str);
}

/// Assigns `window.location.href`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct WebNavigator;

#[cfg(target_arch = "wasm32")]
impl Navigator for WebNavigator {
    fn navigate(&mut self, target: &str) {
        let Some(window) = web_sys::window() else {
            log::error!("Cannot navigate to {}: no window", target);
            return;
        };
        if let Err(e) = window.location().set_href(target) {
            log::error!("Cannot navigate to {}: {:?}", target, e);
        }
    }
}

/// There is no page to leave natively; the target is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, target: &str) {
        log::info!("Navigating to {}", target);
    }
}

#[cfg(target_arch = "wasm32")]
pub type PlatformNavigator = WebNavigator;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformNavigator = LogNavigator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_corners() {
        let centre = Pointer::from_screen(400.0, 300.0, 800.0, 600.0).unwrap();
        assert_eq!(centre, Pointer { x: 0.0, y: 0.0 });
        let top_left = Pointer::from_screen(0.0, 0.0, 800.0, 600.0).unwrap();
        assert_eq!(top_left, Pointer { x: -1.0, y: 1.0 });
        let bottom_right = Pointer::from_screen(800.0, 600.0, 800.0, 600.0).unwrap();
        assert_eq!(bottom_right, Pointer { x: 1.0, y: -1.0 });
    }

    #[test]
    fn pointer_on_empty_viewport() {
        assert!(Pointer::from_screen(1.0, 1.0, 0.0, 600.0).is_none());
    }

    #[test]
    fn log_navigator_keeps_no_state() {
        let mut navigator = LogNavigator;
        for _ in 0..1000 {
            navigator.navigate("about.html");
        }
        assert_eq!(std::mem::size_of::<LogNavigator>(), 0);
    }
}

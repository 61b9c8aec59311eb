//! Viewport state: window size, pixel density and the camera projection.
//!
//! The viewport is the single place that reacts to resize events. It is pure
//! (no GPU access) so the context only has to apply [`Viewport::surface_size`]
//! to the surface configuration afterwards.

use cgmath::Deg;

use crate::camera::Projection;

pub const FIELD_OF_VIEW: Deg<f32> = Deg(65.0);
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Logical (CSS) width.
    pub width: f64,
    /// Logical (CSS) height.
    pub height: f64,
    pub device_pixel_ratio: f64,
    max_pixel_ratio: f64,
    pub projection: Projection,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        let mut viewport = Self {
            width: 0.0,
            height: 0.0,
            device_pixel_ratio: 1.0,
            max_pixel_ratio,
            projection: Projection::new(1, 1, FIELD_OF_VIEW, Z_NEAR, Z_FAR),
        };
        viewport.resize(width, height, device_pixel_ratio);
        viewport
    }

    /// Resize handler: recomputes the aspect ratio and the pixel density.
    ///
    /// Returns `false` and leaves the viewport untouched for empty sizes, which
    /// happen while a window is minimized.
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> bool {
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self.projection.resize(width as f32, height as f32);
        true
    }

    /// `min(device_pixel_ratio, max_pixel_ratio)`
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(self.max_pixel_ratio)
    }

    pub fn aspect(&self) -> f32 {
        self.projection.aspect
    }

    /// Size of the render surface in physical pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            ((self.width * ratio).round() as u32).max(1),
            ((self.height * ratio).round() as u32).max(1),
        )
    }
}

//! Camera, projection and picking rays.
//!
//! The camera is a fixed viewer; only the projection changes at runtime (on
//! resize). Matrices are built in OpenGL convention (clip z in -1..1) so that
//! unprojecting a click is the textbook inverse, and converted to wgpu's clip
//! space only when uploaded to the uniform buffer.

use cgmath::{
    ElementWise, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4, perspective,
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Rotation around the y axis; `-90°` looks down `-z`.
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /**
     * Ray from the camera position through the point at normalized device
     * coordinates (`x`, `y`), both in -1..1 with y pointing up.
     *
     * `None` if the view-projection matrix cannot be inverted (degenerate
     * projection, e.g. zero aspect ratio).
     */
    pub fn cast_ray(&self, x: f32, y: f32, projection: &Projection) -> Option<Ray> {
        let inverse = (projection.calc_matrix() * self.calc_matrix()).invert()?;
        let target = inverse * Vector4::new(x, y, 0.5, 1.0);
        if target.w == 0.0 {
            return None;
        }
        let target = Point3::new(target.x / target.w, target.y / target.w, target.z / target.w);
        Some(Ray::new(self.position, target - self.position))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy: fovy.into(),
            znear,
            zfar,
        };
        projection.resize(width as f32, height as f32);
        projection
    }

    /// Zero heights keep the previous aspect ratio.
    pub fn resize(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// OpenGL style projection matrix (clip z in -1..1).
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj =
            (OPENGL_TO_WGPU_MATRIX * projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera state plus the GPU objects that expose it to shaders.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

/// A ray for intersection testing. `direction` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// The same ray expressed in the space `world_from_local` maps from.
    ///
    /// The direction is not re-normalized, so distances along the returned ray
    /// are measured in world units.
    pub fn to_local(&self, world_from_local: &Matrix4<f32>) -> Option<Ray> {
        let local_from_world = world_from_local.invert()?;
        let origin = local_from_world * self.origin.to_homogeneous();
        let direction = local_from_world * self.direction.extend(0.0);
        Some(Ray {
            origin: Point3::from_homogeneous(origin),
            direction: direction.truncate(),
        })
    }

    /// Slab test against an axis aligned box. Returns the distance to the
    /// closest intersection in front of the origin.
    pub fn intersect_aabb(&self, min: Vector3<f32>, max: Vector3<f32>) -> Option<f32> {
        let origin = Vector3::new(self.origin.x, self.origin.y, self.origin.z);
        let inv_dir = Vector3::new(
            1.0 / self.direction.x,
            1.0 / self.direction.y,
            1.0 / self.direction.z,
        );
        let t_min = (min - origin).mul_element_wise(inv_dir);
        let t_max = (max - origin).mul_element_wise(inv_dir);

        let t_near = t_min.x.min(t_max.x).max(t_min.y.min(t_max.y)).max(t_min.z.min(t_max.z));
        let t_far = t_min.x.max(t_max.x).min(t_min.y.max(t_max.y)).min(t_min.z.max(t_max.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

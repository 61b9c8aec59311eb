//! Render pipelines.
//!
//! Both pipelines share the unlit shader in `unlit.wgsl`: vertex position in
//! slot 0, world matrix and colour per instance in slot 1, camera in group 0.

pub mod basic;
pub mod wireframe;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub wireframe: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(device, config, camera_bind_group_layout),
            wireframe: wireframe::mk_wireframe_pipeline(device, config, camera_bind_group_layout),
        }
    }
}

//! GPU meshes, materials and draw helpers.

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::data_structures::geometry::Geometry;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Unlit material: every fragment of the mesh gets `colour`.
///
/// Wireframe materials are drawn as the edges of the geometry's triangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub colour: [f32; 4],
    pub wireframe: bool,
}

impl Material {
    pub fn solid(hex: u32) -> Self {
        Self {
            colour: hex_to_linear(hex),
            wireframe: false,
        }
    }

    pub fn wireframe(hex: u32) -> Self {
        Self {
            colour: hex_to_linear(hex),
            wireframe: true,
        }
    }
}

/// Converts a `0xRRGGBB` sRGB colour into linear RGBA as expected by an sRGB surface.
pub fn hex_to_linear(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0), 1.0]
}

/// Vertex and index buffers of one geometry, uploaded for either triangle or
/// line topology depending on the material.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn from_geometry(
        device: &wgpu::Device,
        name: &str,
        geometry: &Geometry,
        material: &Material,
    ) -> Self {
        let vertices = geometry
            .positions
            .iter()
            .map(|&position| ModelVertex { position })
            .collect::<Vec<_>>();
        let indices = if material.wireframe {
            geometry.wireframe_indices()
        } else {
            geometry.indices.clone()
        };
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
        }
    }
}

pub trait DrawModel<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a Mesh,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b Mesh,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, camera_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}

//! Scene graph and hierarchical scene organization.
//!
//! A [`Scene`] is an ordered list of root [`MeshNode`]s. Every node carries a
//! local transform relative to its parent and an ordered list of children, so
//! a text mesh attached to a cube turns together with the cube.
//!
//! GPU resources are created lazily in [`Scene::write_to_buffers`]. This keeps
//! scene assembly free of any device access and lets nodes that arrive later
//! (asynchronously loaded text) be uploaded on the next frame.

use cgmath::{Matrix4, SquareMatrix};
use log::warn;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        geometry::Geometry,
        instance::{Instance, InstanceRaw},
        model::{Material, Mesh},
    },
    render::{Instanced, Render},
};

/// Index of a root node inside its [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

#[derive(Debug)]
struct GpuNode {
    mesh: Mesh,
    instance_buffer: wgpu::Buffer,
}

#[derive(Debug)]
pub struct MeshNode {
    pub name: String,
    geometry: Geometry,
    material: Material,
    local: Instance,
    world: Matrix4<f32>,
    children: Vec<MeshNode>,
    gpu: Option<GpuNode>,
}

impl MeshNode {
    pub fn new(name: &str, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
            local: Instance::default(),
            world: Matrix4::identity(),
            children: Vec::new(),
            gpu: None,
        }
    }

    pub fn with_local_transform(mut self, instance: Instance) -> Self {
        self.local = instance;
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    pub fn local_transform_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    /// World matrix as of the last [`Scene::update_world_transforms`].
    pub fn get_world_transform(&self) -> Matrix4<f32> {
        self.world
    }

    pub fn add_child(&mut self, child: MeshNode) {
        self.children.push(child);
    }

    pub fn get_children(&self) -> &Vec<MeshNode> {
        &self.children
    }

    pub fn update_world_transforms(&mut self, parent: &Matrix4<f32>) {
        self.world = *parent * self.local.to_matrix();
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    pub fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        let raw = [InstanceRaw::new(self.world, self.material.colour)];
        if let Some(gpu) = &self.gpu {
            queue.write_buffer(&gpu.instance_buffer, 0, bytemuck::cast_slice(&raw));
        } else if self.geometry.indices.is_empty() {
            warn!("Node {} has no geometry and will not be uploaded.", self.name);
        } else {
            let mesh = Mesh::from_geometry(device, &self.name, &self.geometry, &self.material);
            let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Instance Buffer"),
                contents: bytemuck::cast_slice(&raw),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            self.gpu = Some(GpuNode {
                mesh,
                instance_buffer,
            });
        }
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue, device));
    }

    pub fn get_render(&self) -> Render<'_> {
        let own = match &self.gpu {
            None => Render::None,
            Some(gpu) => {
                let instanced = Instanced {
                    instance: &gpu.instance_buffer,
                    mesh: &gpu.mesh,
                    amount: 1,
                };
                if self.material.wireframe {
                    Render::Wireframe(instanced)
                } else {
                    Render::Solid(instanced)
                }
            }
        };
        if self.children.is_empty() {
            return own;
        }
        Render::Composed(
            std::iter::once(own)
                .chain(self.children.iter().map(MeshNode::get_render))
                .collect(),
        )
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<MeshNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: MeshNode) -> NodeHandle {
        self.nodes.push(node);
        NodeHandle(self.nodes.len() - 1)
    }

    pub fn node(&self, handle: NodeHandle) -> &MeshNode {
        &self.nodes[handle.0]
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> &mut MeshNode {
        &mut self.nodes[handle.0]
    }

    pub fn nodes(&self) -> &[MeshNode] {
        &self.nodes
    }

    pub fn update_world_transforms(&mut self) {
        let root = Matrix4::identity();
        self.nodes
            .iter_mut()
            .for_each(|node| node.update_world_transforms(&root));
    }

    pub fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        self.nodes
            .iter_mut()
            .for_each(|node| node.write_to_buffers(queue, device));
    }
}

impl<'a> From<&'a Scene> for Render<'a> {
    fn from(scene: &'a Scene) -> Self {
        Render::Composed(scene.nodes.iter().map(MeshNode::get_render).collect())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector3, Vector4};

    use super::*;

    fn cube(name: &str) -> MeshNode {
        MeshNode::new(name, Geometry::cuboid(1.0, 1.0, 1.0), Material::wireframe(0xffffff))
    }

    #[test]
    fn nothing_is_drawn_before_upload() {
        let mut scene = Scene::new();
        let parent = scene.add(cube("parent"));
        scene.node_mut(parent).add_child(cube("child"));
        scene.add(cube("other"));

        let (mut solids, mut wireframes) = (Vec::new(), Vec::new());
        Render::from(&scene).set_pipelines(&mut solids, &mut wireframes);
        assert!(solids.is_empty());
        assert!(wireframes.is_empty());
    }

    #[test]
    fn children_inherit_the_parent_transform() {
        let mut scene = Scene::new();
        let parent = scene.add(
            cube("parent").with_local_transform(Instance::from(Vector3::new(1.0, 2.0, 3.0))),
        );
        scene
            .node_mut(parent)
            .add_child(cube("child").with_local_transform(Instance::from(Vector3::new(0.5, 0.0, 0.0))));
        scene.update_world_transforms();

        let child = &scene.node(parent).get_children()[0];
        let origin = child.get_world_transform() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, Vector4::new(1.5, 2.0, 3.0, 1.0));
    }
}

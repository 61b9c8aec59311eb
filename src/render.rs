//! Render composition and pipeline batching.
//!
//! Scene nodes describe how they want to be drawn with a [`Render`] value. The
//! frame loop walks the render tree once, sorts the leaves into one batch per
//! pipeline (filled triangles or wireframe lines) and then issues the draw
//! calls pipeline by pipeline.

/// Data for instanced rendering: a mesh and its instance buffer.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a crate::data_structures::model::Mesh,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// - `None` renders nothing (e.g. a node whose buffers are not uploaded yet)
/// - `Solid(Instanced)` renders filled triangles
/// - `Wireframe(Instanced)` renders the triangle edges as lines
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
pub enum Render<'a> {
    None,
    Solid(Instanced<'a>),
    Wireframe(Instanced<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(
        self,
        solids: &mut Vec<Instanced<'a>>,
        wireframes: &mut Vec<Instanced<'a>>,
    ) {
        match self {
            Render::Solid(instanced) => solids.push(instanced),
            Render::Wireframe(instanced) => wireframes.push(instanced),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(solids, wireframes)),
            Render::None => (),
        }
    }
}

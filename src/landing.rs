//! The landing page scene.
//!
//! [`Landing`] owns the scene graph (a rotating main cube, four small wireframe
//! cubes and the "Enter" button) and wires it to the engine through
//! [`GraphicsFlow`]: fonts are requested on init, rotations advance on every
//! update and a left click on the button leaves the page.

use std::path::PathBuf;

use cgmath::Vector3;
use instant::Duration;
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::{
    animation,
    camera::Camera,
    config::Config,
    context::Context,
    data_structures::{
        geometry::Geometry,
        instance::Instance,
        model::Material,
        scene_graph::{MeshNode, NodeHandle, Scene},
    },
    flow::{GraphicsFlow, Out},
    interaction::{self, Navigator, Pointer},
    render::Render,
    resources::{self, text::TextOptions},
    viewport::Viewport,
};

pub const MAIN_CUBE_SIZE: [f32; 3] = [4.5, 1.0, 0.51];
pub const MAIN_CUBE_COLOUR: u32 = 0x36454f;

pub const SMALL_CUBE_POSITIONS: [[f32; 2]; 4] = [[-2.0, -2.0], [2.0, -2.0], [-2.0, 2.0], [2.0, 2.0]];
pub const SMALL_CUBE_COLOURS: [u32; 4] = [0x008000, 0xffa500, 0x00ffff, 0xff00ff];

pub const BUTTON_SIZE: [f32; 3] = [1.5, 0.7, 0.8];
pub const BUTTON_COLOUR: u32 = 0x333336;
pub const BUTTON_POSITION: [f32; 3] = [0.0, -1.2, 0.0];

pub const WELCOME_TEXT: &str = "Welcome to my page";
pub const WELCOME_COLOUR: u32 = 0xf5f5f5;
pub const ENTER_TEXT: &str = "Enter";
pub const ENTER_COLOUR: u32 = 0xff00ff;

/// Which of the two text meshes a font load belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Welcome,
    Enter,
}

impl TextTarget {
    pub fn text(&self) -> &'static str {
        match self {
            TextTarget::Welcome => WELCOME_TEXT,
            TextTarget::Enter => ENTER_TEXT,
        }
    }

    pub fn options(&self) -> TextOptions {
        match self {
            TextTarget::Welcome => TextOptions {
                size: 0.3,
                depth: 0.08,
                curve_segments: 12,
                bevel_enabled: true,
                bevel_thickness: 0.03,
                bevel_size: 0.015,
                bevel_offset: 0.0,
                bevel_segments: 5,
            },
            TextTarget::Enter => TextOptions {
                size: 0.3,
                depth: 0.1,
                curve_segments: 12,
                bevel_enabled: true,
                bevel_thickness: 0.0,
                bevel_size: 0.015,
                bevel_offset: 0.0,
                bevel_segments: 5,
            },
        }
    }

    /// Where the text sits relative to its parent, given its bounding box size.
    pub fn placement(&self, width: f32, height: f32) -> Vector3<f32> {
        match self {
            TextTarget::Welcome => Vector3::new(-width / 2.0, -height / 4.0, 0.26),
            TextTarget::Enter => Vector3::new(
                -width / 2.0,
                BUTTON_SIZE[1] / 21.5 - height / 1.9,
                0.0,
            ),
        }
    }

    fn material(&self) -> Material {
        match self {
            TextTarget::Welcome => Material::solid(WELCOME_COLOUR),
            TextTarget::Enter => Material::solid(ENTER_COLOUR),
        }
    }
}

#[derive(Debug)]
pub enum LandingEvent {
    TextLoaded {
        target: TextTarget,
        result: anyhow::Result<Geometry>,
    },
}

pub struct Landing {
    pub scene: Scene,
    pub main_cube: NodeHandle,
    pub small_cubes: Vec<NodeHandle>,
    pub button: NodeHandle,
    navigator: Box<dyn Navigator>,
    config: Config,
}

impl Landing {
    /// Builds the static part of the scene. Text arrives later through
    /// [`Landing::attach_text`].
    pub fn new(config: Config, navigator: Box<dyn Navigator>) -> Self {
        let mut scene = Scene::new();

        let [w, h, d] = MAIN_CUBE_SIZE;
        let main_cube = scene.add(MeshNode::new(
            "main cube",
            Geometry::cuboid(w, h, d),
            Material::solid(MAIN_CUBE_COLOUR),
        ));

        let small_cubes = SMALL_CUBE_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, [x, y])| {
                let colour = SMALL_CUBE_COLOURS[i % SMALL_CUBE_COLOURS.len()];
                let node = MeshNode::new(
                    &format!("small cube {}", i),
                    Geometry::cuboid(1.0, 1.0, 1.0),
                    Material::wireframe(colour),
                )
                .with_local_transform(Instance::from(Vector3::new(*x, *y, 0.0)));
                scene.add(node)
            })
            .collect();

        let [w, h, d] = BUTTON_SIZE;
        let button = scene.add(
            MeshNode::new(
                "button",
                Geometry::cuboid(w, h, d),
                Material::wireframe(BUTTON_COLOUR),
            )
            .with_local_transform(Instance::from(Vector3::from(BUTTON_POSITION))),
        );

        scene.update_world_transforms();
        log::debug!("Landing scene assembled with {} roots", scene.nodes().len());

        Self {
            scene,
            main_cube,
            small_cubes,
            button,
            navigator,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads the font and builds the mesh for `target`.
    pub fn load_text(&self, target: TextTarget) -> impl Future<Output = LandingEvent> + 'static {
        let asset_root: PathBuf = self.config.asset_root.clone();
        let font_file = self.config.font_file.clone();
        async move {
            let result = resources::load_text_geometry(
                &asset_root,
                &font_file,
                target.text(),
                target.options(),
            )
            .await;
            LandingEvent::TextLoaded { target, result }
        }
    }

    /**
     * Positions `geometry` by its bounding box and adds it as a child of the
     * main cube (welcome text) or the button (enter text). Empty geometry is
     * not attached.
     */
    pub fn attach_text(&mut self, target: TextTarget, geometry: Geometry) {
        let Some(bounds) = geometry.bounding_box() else {
            log::warn!("Text {:?} produced no geometry", target.text());
            return;
        };
        let size = bounds.size();
        let placement = target.placement(size.x, size.y);
        let node = MeshNode::new(target.text(), geometry, target.material())
            .with_local_transform(Instance::from(placement));
        let parent = match target {
            TextTarget::Welcome => self.main_cube,
            TextTarget::Enter => self.button,
        };
        self.scene.node_mut(parent).add_child(node);
        self.scene.update_world_transforms();
    }

    pub fn on_text_loaded(&mut self, event: LandingEvent) {
        match event {
            LandingEvent::TextLoaded {
                target,
                result: Ok(geometry),
            } => self.attach_text(target, geometry),
            LandingEvent::TextLoaded {
                target,
                result: Err(e),
            } => log::error!("Cannot load text {:?}: {:#}", target.text(), e),
        }
    }

    /**
     * Handles a click at logical window coordinates (`x`, `y`). Only the
     * button box is tested, never its text. Returns whether the button was
     * hit, in which case navigation has been triggered.
     */
    pub fn click(&mut self, camera: &Camera, viewport: &Viewport, x: f64, y: f64) -> bool {
        let Some(pointer) = Pointer::from_screen(x, y, viewport.width, viewport.height) else {
            return false;
        };
        let Some(ray) = pointer.ray(camera, &viewport.projection) else {
            return false;
        };
        self.scene.update_world_transforms();
        if interaction::hit_test(&ray, self.scene.node(self.button)).is_none() {
            return false;
        }
        log::info!("Button clicked!");
        self.navigator.navigate(&self.config.navigation_target);
        true
    }
}

impl GraphicsFlow<LandingEvent> for Landing {
    fn on_init(&mut self, _ctx: &mut Context) -> Out<LandingEvent> {
        let futures: Vec<Box<dyn Future<Output = LandingEvent>>> = vec![
            Box::new(self.load_text(TextTarget::Welcome)),
            Box::new(self.load_text(TextTarget::Enter)),
        ];
        Out::FutEvent(futures)
    }

    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out<LandingEvent> {
        animation::advance(self, dt);
        self.scene.update_world_transforms();
        self.scene.write_to_buffers(&ctx.queue, &ctx.device);
        Out::Empty
    }

    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out<LandingEvent> {
        if let WindowEvent::MouseInput {
            state: ElementState::Released,
            button: MouseButton::Left,
            ..
        } = event
        {
            let position = ctx
                .mouse
                .coords
                .to_logical::<f64>(ctx.viewport.device_pixel_ratio);
            self.click(&ctx.camera.camera, &ctx.viewport, position.x, position.y);
        }
        Out::Empty
    }

    fn on_custom_events(&mut self, _ctx: &Context, event: LandingEvent) -> Option<LandingEvent> {
        self.on_text_loaded(event);
        None
    }

    fn on_render(&self) -> Render<'_> {
        Render::from(&self.scene)
    }
}

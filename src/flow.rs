//! Flow control and application event loop.
//!
//! A "flow" is a self-contained scene: it reacts to window events, updates its
//! state every frame and describes what to draw. The [`App`] owns the window,
//! the GPU [`Context`] and the flows, and drives them from winit's redraw
//! cycle (`requestAnimationFrame` on the web).
//!
//! # Lifecycle Flow
//!
//! 1. `on_init` once the context exists; async work is returned as [`Out`]
//! 2. `on_window_events` for every winit window event
//! 3. `on_update` every frame with the time since the previous frame
//! 4. `on_render` to collect the renderable objects
//! 5. batched draw calls per pipeline, present, request the next frame
//!
//! Resolved futures come back as `on_custom_events`.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::Duration;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

#[cfg(not(target_arch = "wasm32"))]
use futures::{StreamExt, stream::FuturesUnordered};

use crate::{
    animation::FrameClock,
    config::Config,
    context::Context,
    data_structures::model::DrawModel,
    render::{Instanced, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

///
/// Output type of the lifecycle hooks.
///
/// `Out::FutEvent` hands futures to the engine. Each resolved value is put in
/// the event queue and delivered to `on_custom_events`; the futures have no
/// effect unless the flow handles the events.
///
/// `Empty` is the default output used when there is nothing to wait for.
///
pub enum Out<E> {
    FutEvent(Vec<Box<dyn Future<Output = E>>>),
    Empty,
}

impl<E> Default for Out<E> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the GPU context is ready
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_update()` is called every frame
/// 4. `on_custom_events()` is called for resolved [`Out::FutEvent`] futures
/// 5. `on_render()` is called each frame and specifies how to render `self`
pub trait GraphicsFlow<E> {
    /// Initialize the flow. This is the only hook with mutable access to the
    /// context.
    fn on_init(&mut self, ctx: &mut Context) -> Out<E>;

    /// Called every frame with the elapsed time `dt`. GPU buffers of the flow
    /// should be written here.
    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out<E>;

    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out<E>;

    /// Handle custom application events.
    ///
    /// Returns the event if it was not consumed, allowing it to be passed to
    /// the next flow. Returning `None` means the event was consumed.
    fn on_custom_events(&mut self, ctx: &Context, event: E) -> Option<E>;

    /// Return renderable objects for this flow.
    fn on_render(&self) -> Render<'_>;
}

impl<Event> Debug for dyn GraphicsFlow<Event> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// GPU context plus surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &Config) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        Ok(Self {
            ctx,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        if self.ctx.resize(width, height, scale_factor) {
            self.is_surface_configured = true;
        }
    }

    fn resize_to_window(&mut self) {
        let size = self.ctx.window.inner_size();
        let scale_factor = self.ctx.window.scale_factor();
        self.resize(size.width, size.height, scale_factor);
    }

    fn render<Event>(
        &mut self,
        graphics_flows: &[Box<dyn GraphicsFlow<Event>>],
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

            let mut solids: Vec<Instanced> = Vec::new();
            let mut wireframes: Vec<Instanced> = Vec::new();
            graphics_flows.iter().for_each(|flow| {
                flow.on_render().set_pipelines(&mut solids, &mut wireframes);
            });

            for (pipeline, batch) in [
                (&self.ctx.pipelines.basic, solids),
                (&self.ctx.pipelines.wireframe, wireframes),
            ] {
                render_pass.set_pipeline(pipeline);
                for instanced in batch {
                    if instanced.amount == 0 || instanced.instance.size() == 0 {
                        log::warn!("you attemted to render something with zero instances");
                        continue;
                    }
                    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                    render_pass.draw_mesh_instanced(
                        instanced.mesh,
                        0..instanced.amount as u32,
                        &self.ctx.camera.bind_group,
                    );
                }
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<Event: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(not(target_arch = "wasm32"))]
    pending: FuturesUnordered<Pin<Box<dyn Future<Output = Event>>>>,
    proxy: EventLoopProxy<FlowEvent<Event>>,
    config: Config,
    state: Option<AppState>,
    started: bool,
    graphics_flows: Vec<Box<dyn GraphicsFlow<Event>>>,
    clock: FrameClock,
}

impl<Event: 'static> App<Event> {
    fn new(
        event_loop: &EventLoop<FlowEvent<Event>>,
        config: Config,
        graphics_flows: Vec<Box<dyn GraphicsFlow<Event>>>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            #[cfg(not(target_arch = "wasm32"))]
            pending: FuturesUnordered::new(),
            proxy,
            config,
            state: None,
            started: false,
            graphics_flows,
            clock: FrameClock::new(),
        })
    }

    /// Runs `on_init` of every flow against a freshly created state.
    fn initialize(&mut self, mut state: AppState) {
        state.resize_to_window();
        let outputs: Vec<_> = self
            .graphics_flows
            .iter_mut()
            .map(|flow| flow.on_init(&mut state.ctx))
            .collect();
        outputs.into_iter().for_each(|out| self.handle_flow_output(out));
        state.ctx.window.request_redraw();
        self.clock = FrameClock::new();
        self.state = Some(state);
    }

    fn handle_flow_output(&mut self, out: Out<Event>) {
        match out {
            Out::FutEvent(futures) => {
                #[cfg(not(target_arch = "wasm32"))]
                futures
                    .into_iter()
                    .for_each(|fut| self.pending.push(Pin::from(fut)));

                #[cfg(target_arch = "wasm32")]
                for fut in futures {
                    let proxy = self.proxy.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        let event = Pin::from(fut).await;
                        if proxy.send_event(FlowEvent::Custom(event)).is_err() {
                            log::error!("Event loop was closed before an event could be delivered");
                        }
                    });
                }
            }
            Out::Empty => (),
        }
    }

    /// Polls outstanding futures once without blocking and queues whatever
    /// has resolved.
    #[cfg(not(target_arch = "wasm32"))]
    fn poll_pending(&mut self) {
        let waker = futures::task::noop_waker_ref();
        let mut cx = std::task::Context::from_waker(waker);
        let _guard = self.async_runtime.enter();
        while let std::task::Poll::Ready(Some(event)) = self.pending.poll_next_unpin(&mut cx) {
            if self.proxy.send_event(FlowEvent::Custom(event)).is_err() {
                log::error!("Event loop was closed before an event could be delivered");
            }
        }
    }

    fn dispatch<F>(&mut self, mut hook: F)
    where
        F: FnMut(&mut Box<dyn GraphicsFlow<Event>>, &Context) -> Out<Event>,
    {
        let Some(state) = &self.state else {
            return;
        };
        let outputs: Vec<_> = self
            .graphics_flows
            .iter_mut()
            .map(|flow| hook(flow, &state.ctx))
            .collect();
        outputs.into_iter().for_each(|out| self.handle_flow_output(out));
    }
}

pub(crate) enum FlowEvent<Event: 'static> {
    #[allow(dead_code)]
    Initialized(AppState),
    Custom(Event),
}

impl<Event> Debug for FlowEvent<Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Custom(_) => f.write_str("Custom(E)"),
        }
    }
}

impl<Event: 'static> ApplicationHandler<FlowEvent<Event>> for App<Event> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Welcome");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| {
                    document
                        .query_selector(&self.config.canvas_selector)
                        .ok()
                        .flatten()
                });
            window_attributes = match canvas {
                Some(canvas) => window_attributes.with_canvas(Some(canvas.unchecked_into())),
                None => {
                    log::error!(
                        "No element matches {}, appending a new canvas",
                        self.config.canvas_selector
                    );
                    window_attributes.with_append(true)
                }
            };
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let config = self.config.clone();
        let init_future = async move { AppState::new(window, &config).await };

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok(state) => self.initialize(state),
            Err(e) => {
                log::error!("App initialization failed. Cannot create the main context: {:#}", e);
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok(state) => {
                        if proxy.send_event(FlowEvent::Initialized(state)).is_err() {
                            log::error!("Event loop was closed during initialization");
                        }
                    }
                    Err(e) => log::error!(
                        "App initialization failed. Cannot create the main context: {:#}",
                        e
                    ),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent<Event>) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(state) => self.initialize(state),
            FlowEvent::Custom(custom_event) => {
                if let Some(state) = &self.state {
                    let result = self
                        .graphics_flows
                        .iter_mut()
                        .fold(Some(custom_event), |event, flow| {
                            flow.on_custom_events(&state.ctx, event?)
                        });
                    if result.is_some() {
                        log::warn!("Warning! Custom event was not consumed this cycle");
                    }
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if let WindowEvent::CursorMoved { position, .. } = event {
            state.ctx.mouse.coords = position;
        };

        self.dispatch(|flow, ctx| flow.on_window_events(ctx, &event));

        let Some(state) = &mut self.state else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let scale_factor = state.ctx.window.scale_factor();
                state.resize(size.width, size.height, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height, scale_factor);
            }
            WindowEvent::RedrawRequested => {
                #[cfg(not(target_arch = "wasm32"))]
                self.poll_pending();

                let dt = self.clock.tick();
                self.dispatch(|flow, ctx| flow.on_update(ctx, dt));

                let Some(state) = &mut self.state else {
                    return;
                };
                state.ctx.write_camera();
                match state.render(&self.graphics_flows) {
                    Ok(_) => (),
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.resize_to_window();
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Opens the window and runs `graphics_flows` until it is closed.
///
/// Initializes logging first: `env_logger` natively (configure with
/// `RUST_LOG`), the browser console on the web.
pub fn run<Event: 'static>(
    config: Config,
    graphics_flows: Vec<Box<dyn GraphicsFlow<Event>>>,
) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent<Event>> = EventLoop::with_user_event().build()?;

    let mut app: App<Event> = App::new(&event_loop, config, graphics_flows)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

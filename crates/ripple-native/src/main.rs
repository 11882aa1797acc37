use std::time::Instant;
use winit::keyboard::{Key, NamedKey};
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

use ripple_core::gpu::RippleRenderer;
use ripple_core::{BackgroundImage, Disturbance, RippleParams};

mod cli;

// Checkerboard fallback cell size, in physical pixels
const CHECKER_CELL_PX: u32 = 32;

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    ripple: RippleRenderer,
}

impl<'w> GpuState<'w> {
    async fn new(
        window: &'w winit::window::Window,
        params: RippleParams,
        background: &BackgroundImage,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let ripple = RippleRenderer::new(&device, &queue, format, width, height, params, background);
        log::info!("{:?} adapter, {}x{} {:?}", adapter.get_info().backend, width, height, format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            ripple,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.ripple
            .resize(&self.device, new_size.width, new_size.height);
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn render(
        &mut self,
        time: f32,
        disturbance: Option<Disturbance>,
        step: bool,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        if step {
            self.ripple
                .encode_frame(&self.queue, &mut encoder, &view, time, disturbance);
        } else {
            self.ripple.encode_still(&mut encoder, &view);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let opts = cli::parse_args(std::env::args().skip(1))?;
    if opts.help {
        println!("{}", cli::USAGE);
        return Ok(());
    }
    let params = match &opts.config {
        Some(path) => cli::load_params(path)?,
        None => RippleParams::default(),
    };

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Water ripple (native)")
        .build(&event_loop)?;

    let background = match &opts.background {
        Some(path) => cli::load_background(path)?,
        None => {
            let size = window.inner_size();
            BackgroundImage::checkerboard(size.width, size.height, CHECKER_CELL_PX)
        }
    };
    let mut state = pollster::block_on(GpuState::new(&window, params, &background))?;
    let start = Instant::now();
    let mut cursor: Option<Disturbance> = None;
    let mut paused = false;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                cursor = Some(Disturbance::at(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => cursor = None,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key,
                        ..
                    },
                ..
            } => match logical_key.as_ref() {
                Key::Character("r") | Key::Character("R") => state.ripple.reset(),
                Key::Named(NamedKey::Space) => {
                    paused = !paused;
                    log::info!("[keys] paused={}", paused);
                }
                Key::Named(NamedKey::Escape) => elwt.exit(),
                _ => {}
            },
            _ => {}
        },
        Event::AboutToWait => {
            match state.render(start.elapsed().as_secs_f32(), cursor, !paused) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("surface lost; reconfiguring");
                    state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("frame skipped: {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}

use crate::constants::CHECKER_CELL_PX;
use ripple_core::gpu::{BackgroundTexture, RippleRenderer};
use ripple_core::{BackgroundImage, Disturbance, RippleParams};
use web_sys as web;

// ===================== WebGPU state =====================

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    ripple: RippleRenderer,
    width: u32,
    height: u32,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, params: RippleParams) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        // Background texels are shaded unconverted, so present without an sRGB encode
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let checker = BackgroundImage::checkerboard(width, height, CHECKER_CELL_PX);
        let ripple = RippleRenderer::new(&device, &queue, format, width, height, params, &checker);
        log::info!("WebGPU ready: {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            ripple,
            width,
            height,
        })
    }

    /// Copy a loaded `<img>` into a fresh background texture.
    pub fn set_background_image(&mut self, img: &web::HtmlImageElement) {
        let (w, h) = (img.natural_width(), img.natural_height());
        let background = BackgroundTexture::empty(&self.device, w, h);
        self.queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::HTMLImageElement(img.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &background.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
        self.ripple.set_background_texture(&self.device, background);
        log::info!("background image {}x{}", w, h);
    }

    pub fn reset(&mut self) {
        self.ripple.reset();
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.reconfigure();
            self.ripple.resize(&self.device, width, height);
        }
    }

    /// Reapply the surface configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame. With `step` false the current state is composited
    /// again without advancing the simulation.
    pub fn render(
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

use super::helpers;
use crate::shading::BackgroundImage;

/// Background colour format. Texel values reach the shader unconverted,
/// the same as [`BackgroundImage::texel`].
pub const BACKGROUND_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// The background texture sampled by the composite pass.
pub struct BackgroundTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl BackgroundTexture {
    /// Blank texture that can receive uploads or external image copies
    /// (`RENDER_ATTACHMENT | COPY_DST`).
    pub fn empty(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (texture, view) = helpers::create_color_texture(
            device,
            "background_tex",
            width,
            height,
            BACKGROUND_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        Self { texture, view }
    }

    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, image: &BackgroundImage) -> Self {
        let bg = Self::empty(device, image.width(), image.height());
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &bg.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width()),
                rows_per_image: Some(image.height()),
            },
            bg.texture.size(),
        );
        bg
    }

    pub fn size(&self) -> (u32, u32) {
        let s = self.texture.size();
        (s.width, s.height)
    }
}

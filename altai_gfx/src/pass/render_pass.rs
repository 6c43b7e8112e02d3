/// Render pass - framebuffer lifecycle, pass-begin clears and MSAA resolve
///
/// A pass whose first color attachment has no texture is a *default pass*:
/// it renders to the presentation surface and allocates nothing. Any other
/// pass owns a framebuffer wrapping its attachment textures and, when those
/// are multisampled, one single-sample resolve framebuffer per MSAA color
/// attachment.

use crate::error::{Error, Result};
use crate::render::{
    Attachment, Backend, ClearFlags, Driver, FramebufferId, LoadAction,
    ResolveTarget, TextureTarget, TextureType,
};
use crate::resource::{ResourceRegistry, Texture, TextureKey};
use crate::state::{RenderState, RenderStateCache};
use crate::{gfx_debug, gfx_warn};

// ===== DESCRIPTORS =====

/// Color attachment of a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachmentDesc {
    /// Render target texture (None on the first attachment = default pass)
    pub texture: Option<TextureKey>,
    /// Mip level rendered to
    pub mip_level: u32,
    /// Cube face, 3D slice or array layer rendered to
    pub slice: u32,
    /// What happens to the content at pass-begin
    pub load_action: LoadAction,
    /// Clear value used with `LoadAction::Clear`
    pub clear_color: [f32; 4],
}

impl Default for ColorAttachmentDesc {
    fn default() -> Self {
        Self {
            texture: None,
            mip_level: 0,
            slice: 0,
            load_action: LoadAction::Clear,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl ColorAttachmentDesc {
    /// Attachment rendering into `texture`, cleared to opaque black
    pub fn new(texture: TextureKey) -> Self {
        Self { texture: Some(texture), ..Self::default() }
    }

    pub fn with_clear_color(mut self, clear_color: [f32; 4]) -> Self {
        self.clear_color = clear_color;
        self.load_action = LoadAction::Clear;
        self
    }

    pub fn with_load_action(mut self, load_action: LoadAction) -> Self {
        self.load_action = load_action;
        self
    }

    pub fn with_slice(mut self, mip_level: u32, slice: u32) -> Self {
        self.mip_level = mip_level;
        self.slice = slice;
        self
    }
}

/// Depth/stencil attachment of a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthAttachmentDesc {
    /// Texture whose depth renderbuffer is attached
    pub texture: Option<TextureKey>,
    /// What happens to the content at pass-begin
    pub load_action: LoadAction,
    /// Depth clear value
    pub clear_depth: f32,
    /// Stencil clear value
    pub clear_stencil: u32,
}

impl Default for DepthAttachmentDesc {
    fn default() -> Self {
        Self {
            texture: None,
            load_action: LoadAction::Clear,
            clear_depth: 1.0,
            clear_stencil: 0,
        }
    }
}

/// Descriptor for creating a pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassDesc {
    pub color_attachments: Vec<ColorAttachmentDesc>,
    pub depth_attachment: DepthAttachmentDesc,
}

impl Default for PassDesc {
    fn default() -> Self {
        Self::default_pass()
    }
}

impl PassDesc {
    /// Pass rendering to the presentation surface
    pub fn default_pass() -> Self {
        Self {
            color_attachments: vec![ColorAttachmentDesc::default()],
            depth_attachment: DepthAttachmentDesc::default(),
        }
    }

    /// Offscreen pass with one color attachment per texture
    pub fn offscreen(color_textures: &[TextureKey]) -> Self {
        Self {
            color_attachments: color_textures.iter().map(|&t| ColorAttachmentDesc::new(t)).collect(),
            depth_attachment: DepthAttachmentDesc::default(),
        }
    }

    /// Use the depth renderbuffer of `texture`
    pub fn with_depth(mut self, texture: TextureKey) -> Self {
        self.depth_attachment.texture = Some(texture);
        self
    }

    pub fn with_clear_color(mut self, clear_color: [f32; 4]) -> Self {
        for attachment in &mut self.color_attachments {
            attachment.clear_color = clear_color;
            attachment.load_action = LoadAction::Clear;
        }
        self
    }

    pub fn with_depth_action(mut self, load_action: LoadAction) -> Self {
        self.depth_attachment.load_action = load_action;
        self
    }

    pub fn is_default(&self) -> bool {
        self.color_attachments.first().map_or(true, |c| c.texture.is_none())
    }
}

// ===== PASS =====

/// Pass-begin behaviour of one color attachment
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColorLoad {
    load_action: LoadAction,
    clear_color: [f32; 4],
}

/// Render pass
#[derive(Debug)]
pub struct Pass {
    colors: Vec<ColorLoad>,
    depth: DepthAttachmentDesc,
    framebuffer: Option<FramebufferId>,
    resolve_targets: Vec<ResolveTarget>,
    width: u32,
    height: u32,
    complete: bool,
}

fn attach_image(driver: &mut dyn Driver, attachment: Attachment, texture: &Texture, mip_level: u32, slice: u32) {
    match texture.info().texture_type {
        TextureType::Texture2D => {
            driver.framebuffer_texture_2d(attachment, TextureTarget::Texture2D, texture.image(), mip_level)
        }
        TextureType::TextureCube => {
            driver.framebuffer_texture_2d(attachment, TextureTarget::CubeFace(slice), texture.image(), mip_level)
        }
        TextureType::Texture3D | TextureType::TextureArray => {
            driver.framebuffer_texture_layer(attachment, texture.image(), mip_level, slice)
        }
    }
}

impl Pass {
    pub(crate) fn create(
        driver: &mut dyn Driver,
        backend: &dyn Backend,
        registry: &ResourceRegistry,
        desc: &PassDesc,
    ) -> Result<Self> {
        let first = desc.color_attachments.first().copied().unwrap_or_default();
        if first.texture.is_none() {
            if desc.color_attachments.iter().skip(1).any(|c| c.texture.is_some())
                || desc.depth_attachment.texture.is_some()
            {
                gfx_warn!("altai::pass", "default pass ignores the textures of its other attachments");
            }
            return Ok(Self {
                colors: vec![ColorLoad { load_action: first.load_action, clear_color: first.clear_color }],
                depth: desc.depth_attachment,
                framebuffer: None,
                resolve_targets: Vec::new(),
                width: 0,
                height: 0,
                complete: true,
            });
        }

        // Contiguous textured attachments, capped by the backend
        let mut attachments: Vec<(ColorAttachmentDesc, &Texture)> = Vec::new();
        for (index, attachment) in desc.color_attachments.iter().enumerate() {
            let Some(key) = attachment.texture else {
                if desc.color_attachments[index..].iter().any(|c| c.texture.is_some()) {
                    gfx_warn!("altai::pass",
                        "color attachment {} has no texture, later attachments are ignored", index);
                }
                break;
            };
            if attachments.len() == backend.max_color_attachments() {
                gfx_warn!("altai::pass",
                    "{} color attachments requested, the {:?} backend supports {}",
                    desc.color_attachments.len(), backend.kind(), backend.max_color_attachments());
                break;
            }
            let texture = registry.texture(key).ok_or_else(|| {
                Error::InvalidResource(format!("color attachment {} references an unknown texture", index))
            })?;
            attachments.push((*attachment, texture));
        }

        let depth_texture = match desc.depth_attachment.texture {
            Some(key) => Some(registry.texture(key).ok_or_else(|| {
                Error::InvalidResource("depth attachment references an unknown texture".to_string())
            })?),
            None => None,
        };

        let (first_desc, first_texture) = attachments[0];
        let (width, height) = first_texture.info().mip_size(first_desc.mip_level);

        // (1) framebuffer
        let framebuffer = driver.create_framebuffer()?;
        backend.bind_framebuffer(driver, Some(framebuffer));

        // (2) color attachments
        let mut any_msaa = false;
        for (index, (attachment, texture)) in attachments.iter().enumerate() {
            let slot = Attachment::Color(index as u32);
            match texture.msaa_renderbuffer() {
                Some(renderbuffer) => {
                    any_msaa = true;
                    driver.framebuffer_renderbuffer(slot, renderbuffer);
                }
                None => attach_image(driver, slot, texture, attachment.mip_level, attachment.slice),
            }
        }

        // (3) depth/stencil
        if let Some(texture) = depth_texture {
            match (texture.depth_renderbuffer(), texture.info().depth_format) {
                (Some(renderbuffer), Some(format)) => {
                    let slot = if format.has_stencil() { Attachment::DepthStencil } else { Attachment::Depth };
                    driver.framebuffer_renderbuffer(slot, renderbuffer);
                }
                _ => gfx_warn!("altai::pass", "depth attachment texture has no depth format, ignored"),
            }
        }

        // (4) completeness
        let complete = driver.framebuffer_complete();
        if !complete {
            gfx_warn!("altai::pass", "framebuffer incomplete ({} color attachments, {}x{})",
                attachments.len(), width, height);
        }

        // (5) resolve framebuffers
        let mut resolve_targets: Vec<ResolveTarget> = Vec::new();
        if any_msaa {
            for (index, (attachment, texture)) in attachments.iter().enumerate() {
                if !texture.is_msaa() {
                    continue;
                }
                let resolve = match driver.create_framebuffer() {
                    Ok(resolve) => resolve,
                    Err(err) => {
                        for target in &resolve_targets {
                            driver.delete_framebuffer(target.framebuffer);
                        }
                        driver.delete_framebuffer(framebuffer);
                        backend.bind_framebuffer(driver, None);
                        return Err(err);
                    }
                };
                backend.bind_framebuffer(driver, Some(resolve));
                attach_image(driver, Attachment::Color(0), texture, attachment.mip_level, attachment.slice);
                if !driver.framebuffer_complete() {
                    gfx_warn!("altai::pass", "resolve framebuffer of color attachment {} incomplete", index);
                }
                resolve_targets.push(ResolveTarget { attachment: index as u32, framebuffer: resolve });
            }
        }

        backend.bind_framebuffer(driver, None);
        gfx_debug!("altai::pass", "created offscreen pass {}x{} ({} color, {} resolve)",
            width, height, attachments.len(), resolve_targets.len());

        Ok(Self {
            colors: attachments
                .iter()
                .map(|(a, _)| ColorLoad { load_action: a.load_action, clear_color: a.clear_color })
                .collect(),
            depth: desc.depth_attachment,
            framebuffer: Some(framebuffer),
            resolve_targets,
            width,
            height,
            complete,
        })
    }

    pub(crate) fn release(&self, driver: &mut dyn Driver) {
        for target in &self.resolve_targets {
            driver.delete_framebuffer(target.framebuffer);
        }
        if let Some(framebuffer) = self.framebuffer {
            driver.delete_framebuffer(framebuffer);
        }
    }

    /// Bind the pass target, reset state and issue the pass-begin clears
    ///
    /// Returns the number of render-state groups sent to the driver.
    pub(crate) fn begin(
        &self,
        driver: &mut dyn Driver,
        backend: &dyn Backend,
        state_cache: &mut RenderStateCache,
        surface_size: (u32, u32),
    ) -> usize {
        backend.bind_framebuffer(driver, self.framebuffer);
        let (width, height) = self.target_size(surface_size);
        driver.viewport(0, 0, width, height);

        // Scissor off, every write mask open
        let changes = state_cache.apply(driver, &RenderState::for_clear(), true);

        if self.colors.len() > 1 {
            backend.set_draw_targets(driver, self.colors.len());
        }

        let clear_depth = self.depth.load_action == LoadAction::Clear;
        if self.colors.len() == 1 {
            let color = self.colors[0];
            let mut flags = ClearFlags::empty();
            if color.load_action == LoadAction::Clear {
                flags |= ClearFlags::COLOR;
            }
            if clear_depth {
                flags |= ClearFlags::DEPTH | ClearFlags::STENCIL;
            }
            if !flags.is_empty() {
                driver.clear(flags, color.clear_color, self.depth.clear_depth, self.depth.clear_stencil);
            }
        } else {
            for (index, color) in self.colors.iter().enumerate() {
                if color.load_action == LoadAction::Clear {
                    backend.clear_color_attachment(driver, index as u32, color.clear_color);
                }
            }
            if clear_depth {
                driver.clear(
                    ClearFlags::DEPTH | ClearFlags::STENCIL,
                    [0.0; 4],
                    self.depth.clear_depth,
                    self.depth.clear_stencil,
                );
            }
        }

        changes
    }

    /// End-of-pass work, kept by the layer until `end_pass`
    pub(crate) fn pending_resolve(&self) -> PendingResolve {
        PendingResolve {
            framebuffer: self.framebuffer,
            targets: self.resolve_targets.clone(),
            width: self.width,
            height: self.height,
        }
    }

    /// Whether the pass renders to the presentation surface
    pub fn is_default(&self) -> bool {
        self.framebuffer.is_none()
    }

    /// Render area: surface size for default passes, else the first color texture's size
    pub fn target_size(&self, surface_size: (u32, u32)) -> (u32, u32) {
        if self.is_default() {
            surface_size
        } else {
            (self.width, self.height)
        }
    }

    /// Number of color attachments written by the pass
    pub fn color_attachment_count(&self) -> usize {
        self.colors.len()
    }

    pub fn framebuffer(&self) -> Option<FramebufferId> {
        self.framebuffer
    }

    /// Single-sample framebuffers receiving the MSAA resolve
    ///
    /// Only multisampled color attachments get one. A single-sample
    /// attachment renders straight into its texture, so a pass without MSAA
    /// attachments has no resolve targets at all.
    pub fn resolve_targets(&self) -> &[ResolveTarget] {
        &self.resolve_targets
    }

    /// `Ok` when the framebuffer passed its completeness check
    pub fn status(&self) -> Result<()> {
        if self.complete {
            Ok(())
        } else {
            Err(Error::FramebufferIncomplete(format!(
                "offscreen pass {}x{} with {} color attachments",
                self.width, self.height, self.colors.len()
            )))
        }
    }
}

/// MSAA resolve owed by the pass in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingResolve {
    framebuffer: Option<FramebufferId>,
    targets: Vec<ResolveTarget>,
    width: u32,
    height: u32,
}

impl PendingResolve {
    /// Blit every multisampled attachment into its resolve framebuffer
    ///
    /// No work for default passes and passes without MSAA attachments.
    pub(crate) fn run(&self, driver: &mut dyn Driver, backend: &dyn Backend) {
        if let Some(framebuffer) = self.framebuffer {
            if !self.targets.is_empty() {
                backend.resolve(driver, framebuffer, &self.targets, self.width, self.height);
            }
        }
    }
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;

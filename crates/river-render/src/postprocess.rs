//! Post-processing chain: cycling full-screen effects over an offscreen HDR target
//!
//! While an effect is active the scene is rendered into an Rgba16Float
//! texture, the default target is restored, and the effect's full-screen
//! pass reads that texture plus its secondary attachment (if it has one).
//! The chain itself only decides which effect runs and with what timing.

use crate::layer::{PostProcessPass, RenderLayer, RenderTarget};
use bytemuck::{Pod, Zeroable};
use river_core::{PostProcessSettings, Result, RiverError};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

/// HDR texture format used for the offscreen scene target.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// A full-screen effect the chain can cycle to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Bloom,
    Blur,
    /// Animated distortion driven by time and frequency
    Ripple,
    Grayscale,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Bloom,
        EffectKind::Blur,
        EffectKind::Ripple,
        EffectKind::Grayscale,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Bloom => "bloom",
            EffectKind::Blur => "blur",
            EffectKind::Ripple => "ripple",
            EffectKind::Grayscale => "grayscale",
        }
    }

    /// Shader-side effect selector
    pub fn index(&self) -> usize {
        match self {
            EffectKind::Bloom => 0,
            EffectKind::Blur => 1,
            EffectKind::Ripple => 2,
            EffectKind::Grayscale => 3,
        }
    }

    /// The extra texture this effect samples alongside the scene
    pub fn secondary_attachment(&self) -> Option<&'static str> {
        match self {
            EffectKind::Bloom => Some("luminance"),
            EffectKind::Blur => Some("blur"),
            EffectKind::Ripple | EffectKind::Grayscale => None,
        }
    }

    pub fn is_time_driven(&self) -> bool {
        matches!(self, EffectKind::Ripple)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = RiverError;

    fn from_str(s: &str) -> Result<Self> {
        EffectKind::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| RiverError::UnknownEffect {
                value: s.to_string(),
                allowed: EffectKind::ALL.iter().map(|e| e.name().to_string()).collect(),
            })
    }
}

/// Uniform data for the effect pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PostProcessUniforms {
    pub time: f32,
    pub frequency: f32,
    pub intensity: f32,
    pub effect: u32,
    pub texel_size: [f32; 2],
    pub _padding: [f32; 2],
}

/// Texture description for an offscreen target of the given size
pub fn offscreen_texture_descriptor(
    label: &'static str,
    width: u32,
    height: u32,
) -> wgpu::TextureDescriptor<'static> {
    wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    }
}

/// Ordered effects toggled by a single key: Disabled -> first -> ... -> last -> Disabled
#[derive(Debug, Clone)]
pub struct PostProcessChain {
    effects: Vec<EffectKind>,
    enabled: bool,
    index: usize,
    pub frequency: f32,
    pub intensity: f32,
}

impl PostProcessChain {
    pub fn new(effects: Vec<EffectKind>) -> Self {
        Self {
            effects,
            enabled: false,
            index: 0,
            frequency: 2.0,
            intensity: 1.0,
        }
    }

    /// Build from config; unknown effect names are an error
    pub fn from_settings(settings: &PostProcessSettings) -> Result<Self> {
        let effects = settings
            .effects
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<EffectKind>>>()?;
        let mut chain = Self::new(effects);
        chain.frequency = settings.frequency;
        chain.intensity = settings.intensity;
        Ok(chain)
    }

    /// Step the chain. Returns the effect now active, if any.
    pub fn toggle_or_advance(&mut self) -> Option<EffectKind> {
        if self.effects.is_empty() {
            return None;
        }

        if !self.enabled {
            self.enabled = true;
            self.index = 0;
        } else if self.index + 1 >= self.effects.len() {
            self.enabled = false;
            self.index = 0;
        } else {
            self.index += 1;
        }

        match self.active() {
            Some(effect) => log::info!("[postprocess] Effect: {effect}"),
            None => log::info!("[postprocess] Disabled"),
        }
        self.active()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn active(&self) -> Option<EffectKind> {
        if self.enabled {
            self.effects.get(self.index).copied()
        } else {
            None
        }
    }

    pub fn effects(&self) -> &[EffectKind] {
        &self.effects
    }

    /// The pass to run this frame, or `None` to present the scene directly
    pub fn pass(&self, time: f32) -> Option<PostProcessPass> {
        self.active().map(|effect| PostProcessPass {
            effect,
            time,
            frequency: self.frequency,
            intensity: self.intensity,
        })
    }
}

/// Binds the offscreen target for the scene; rebinds the default target
/// when finished or dropped.
pub struct OffscreenTarget<'a, L: RenderLayer + ?Sized> {
    layer: &'a mut L,
    finished: bool,
}

impl<'a, L: RenderLayer + ?Sized> OffscreenTarget<'a, L> {
    pub fn bind(layer: &'a mut L) -> Self {
        layer.bind_target(RenderTarget::Offscreen);
        Self {
            layer,
            finished: false,
        }
    }

    /// Restore the default target now
    pub fn finish(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if !self.finished {
            self.finished = true;
            self.layer.bind_target(RenderTarget::Default);
        }
    }
}

impl<L: RenderLayer + ?Sized> Deref for OffscreenTarget<'_, L> {
    type Target = L;

    fn deref(&self) -> &L {
        self.layer
    }
}

impl<L: RenderLayer + ?Sized> DerefMut for OffscreenTarget<'_, L> {
    fn deref_mut(&mut self) -> &mut L {
        self.layer
    }
}

impl<L: RenderLayer + ?Sized> Drop for OffscreenTarget<'_, L> {
    fn drop(&mut self) {
        self.restore();
    }
}

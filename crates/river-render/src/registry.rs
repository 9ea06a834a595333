//! Named GPU resource handles, passed explicitly to whoever draws

use std::collections::HashMap;

/// Resource names the editor draws with
pub mod names {
    /// Flat textured shader for control-point gizmos
    pub const GIZMO_SHADER: &str = "simple";
    /// Geometry-expanded ribbon shader
    pub const SURFACE_SHADER: &str = "bezier_curve";
    pub const PARTICLE_SHADER: &str = "particle";

    pub const GIZMO_MESH: &str = "quad";
    /// Two-vertex line between the first and last control point
    pub const SURFACE_MESH: &str = "river";

    pub const WATER_TEXTURE: &str = "water";
    pub const SPLASH_TEXTURE: &str = "water_splash";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Name -> handle maps for shaders, meshes and textures.
///
/// Built by the host after it has uploaded the resources. Unknown names
/// resolve to `None` and the caller skips the draw.
#[derive(Debug, Default, Clone)]
pub struct ResourceRegistry {
    shaders: HashMap<String, ShaderHandle>,
    meshes: HashMap<String, MeshHandle>,
    textures: HashMap<String, TextureHandle>,
    next_id: u32,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every resource the editor draws with
    pub fn with_river_defaults() -> Self {
        let mut registry = Self::new();
        for shader in [names::GIZMO_SHADER, names::SURFACE_SHADER, names::PARTICLE_SHADER] {
            registry.register_shader(shader);
        }
        for mesh in [names::GIZMO_MESH, names::SURFACE_MESH] {
            registry.register_mesh(mesh);
        }
        for texture in [names::WATER_TEXTURE, names::SPLASH_TEXTURE] {
            registry.register_texture(texture);
        }
        registry
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Register a shader, replacing any previous handle under the same name
    pub fn register_shader(&mut self, name: impl Into<String>) -> ShaderHandle {
        let handle = ShaderHandle(self.allocate());
        self.shaders.insert(name.into(), handle);
        handle
    }

    pub fn register_mesh(&mut self, name: impl Into<String>) -> MeshHandle {
        let handle = MeshHandle(self.allocate());
        self.meshes.insert(name.into(), handle);
        handle
    }

    pub fn register_texture(&mut self, name: impl Into<String>) -> TextureHandle {
        let handle = TextureHandle(self.allocate());
        self.textures.insert(name.into(), handle);
        handle
    }

    pub fn shader(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }

    pub fn mesh(&self, name: &str) -> Option<MeshHandle> {
        self.meshes.get(name).copied()
    }

    pub fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.shaders.len() + self.meshes.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

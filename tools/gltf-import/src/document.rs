//! glTF JSON document model
//!
//! Only the parts of glTF 2.0 that mesh import reads are modeled. Unknown
//! properties (materials, animations, extensions, ...) are ignored by serde.
//! Component types stay raw integer codes here; they are checked when an
//! accessor is decoded, see [`crate::component::ComponentType`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Primitive topology code for triangle lists
pub const MODE_TRIANGLES: u32 = 4;

/// Root of a parsed `.gltf` file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Default scene index
    pub scene: Option<usize>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub buffers: Vec<Buffer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scene {
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    pub name: Option<String>,
    pub mesh: Option<usize>,
    #[serde(default)]
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mesh {
    pub name: Option<String>,
    #[serde(default)]
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Primitive {
    #[serde(default)]
    pub attributes: Attributes,
    pub indices: Option<usize>,
    pub mode: Option<u32>,
}

impl Primitive {
    /// Topology mode, defaulting to triangles as glTF does
    pub fn mode(&self) -> u32 {
        self.mode.unwrap_or(MODE_TRIANGLES)
    }
}

/// Vertex attribute semantics the importer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Tangent,
    TexCoord0,
}

impl Semantic {
    pub const ALL: [Semantic; 4] = [
        Semantic::Position,
        Semantic::Normal,
        Semantic::Tangent,
        Semantic::TexCoord0,
    ];

    /// Attribute name as written in glTF
    pub fn name(self) -> &'static str {
        match self {
            Semantic::Position => "POSITION",
            Semantic::Normal => "NORMAL",
            Semantic::Tangent => "TANGENT",
            Semantic::TexCoord0 => "TEXCOORD_0",
        }
    }

    /// Accessor element type the semantic is stored as
    pub fn element_type(self) -> &'static str {
        match self {
            Semantic::Position | Semantic::Normal => "VEC3",
            Semantic::Tangent => "VEC4",
            Semantic::TexCoord0 => "VEC2",
        }
    }
}

/// Accessor indices of the known semantics; other attributes are dropped at parse time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Attributes {
    #[serde(rename = "POSITION")]
    pub position: Option<usize>,
    #[serde(rename = "NORMAL")]
    pub normal: Option<usize>,
    #[serde(rename = "TANGENT")]
    pub tangent: Option<usize>,
    #[serde(rename = "TEXCOORD_0")]
    pub tex_coord_0: Option<usize>,
}

impl Attributes {
    pub fn get(&self, semantic: Semantic) -> Option<usize> {
        match semantic {
            Semantic::Position => self.position,
            Semantic::Normal => self.normal,
            Semantic::Tangent => self.tangent,
            Semantic::TexCoord0 => self.tex_coord_0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: u32,
    pub count: usize,
    /// Element type ("SCALAR", "VEC3", ...)
    #[serde(rename = "type")]
    pub element_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
}

impl BufferView {
    /// Byte stride, where 0 means tightly packed
    pub fn stride(&self) -> usize {
        self.byte_stride.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub uri: Option<String>,
    #[serde(default)]
    pub byte_length: usize,
}

impl Document {
    /// Load a `.gltf` file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read glTF: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse glTF: {}", path.display()))
    }

    /// Parse glTF JSON text
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid glTF JSON")
    }

    /// Scene to import: the declared default, else the first scene
    pub fn default_scene(&self) -> Option<&Scene> {
        match self.scene {
            Some(index) => self.scenes.get(index),
            None => self.scenes.first(),
        }
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    pub fn accessor(&self, index: usize) -> Option<&Accessor> {
        self.accessors.get(index)
    }

    pub fn buffer_view(&self, index: usize) -> Option<&BufferView> {
        self.buffer_views.get(index)
    }

    /// Display name of a mesh, falling back to `mesh_<index>`
    pub fn mesh_name(&self, index: usize) -> String {
        self.mesh(index)
            .and_then(|m| m.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("mesh_{}", index))
    }
}

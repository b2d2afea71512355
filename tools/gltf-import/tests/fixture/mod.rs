//! Programmatic `.gltf` + `.bin` fixtures for the integration tests.
//!
//! Every accessor gets its own 4-byte aligned buffer view unless it is
//! written through [`GltfFixture::interleaved_positions_uvs`]. Float accessors
//! carry min/max so the files also pass the `gltf` crate's validation.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;
const FLOAT: u32 = 5126;

#[derive(Default)]
pub struct GltfFixture {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
}

impl GltfFixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn align(&mut self) {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
    }

    fn push_view(&mut self, bytes: &[u8], stride: Option<usize>) -> usize {
        self.align();
        let mut view = json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        });
        if let Some(stride) = stride {
            view["byteStride"] = json!(stride);
        }
        self.bin.extend_from_slice(bytes);
        self.views.push(view);
        self.views.len() - 1
    }

    fn push_accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    pub fn indices_u16(&mut self, indices: &[u16]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, None);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": UNSIGNED_SHORT,
            "count": indices.len(),
            "type": "SCALAR",
        }))
    }

    pub fn indices_u32(&mut self, indices: &[u32]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, None);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": UNSIGNED_INT,
            "count": indices.len(),
            "type": "SCALAR",
        }))
    }

    fn floats<const N: usize>(&mut self, values: &[[f32; N]], element_type: &str) -> usize {
        let bytes: Vec<u8> = values
            .iter()
            .flatten()
            .flat_map(|f| f.to_le_bytes())
            .collect();
        let view = self.push_view(&bytes, None);
        let (min, max) = bounds(values);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": values.len(),
            "type": element_type,
            "min": min,
            "max": max,
        }))
    }

    pub fn vec2(&mut self, values: &[[f32; 2]]) -> usize {
        self.floats(values, "VEC2")
    }

    pub fn vec3(&mut self, values: &[[f32; 3]]) -> usize {
        self.floats(values, "VEC3")
    }

    pub fn vec4(&mut self, values: &[[f32; 4]]) -> usize {
        self.floats(values, "VEC4")
    }

    /// Positions and UVs interleaved in one view with a 20-byte stride.
    /// Returns the (position, uv) accessor indices.
    pub fn interleaved_positions_uvs(
        &mut self,
        positions: &[[f32; 3]],
        uvs: &[[f32; 2]],
    ) -> (usize, usize) {
        assert_eq!(positions.len(), uvs.len());
        let mut bytes = Vec::new();
        for (position, uv) in positions.iter().zip(uvs) {
            for f in position.iter().chain(uv) {
                bytes.extend_from_slice(&f.to_le_bytes());
            }
        }
        let view = self.push_view(&bytes, Some(20));
        let (min, max) = bounds(positions);
        let position = self.push_accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": positions.len(),
            "type": "VEC3",
            "min": min,
            "max": max,
        }));
        let uv = self.push_accessor(json!({
            "bufferView": view,
            "byteOffset": 12,
            "componentType": FLOAT,
            "count": uvs.len(),
            "type": "VEC2",
        }));
        (position, uv)
    }

    /// Raw accessor JSON for cases the helpers do not cover
    pub fn raw_accessor(&mut self, accessor: Value) -> usize {
        self.push_accessor(accessor)
    }

    /// Add a mesh and a root node instancing it
    pub fn mesh(&mut self, name: &str, primitives: Vec<Value>) -> usize {
        self.meshes.push(json!({ "name": name, "primitives": primitives }));
        let mesh = self.meshes.len() - 1;
        self.nodes.push(json!({ "name": name, "mesh": mesh }));
        mesh
    }

    /// Write `<stem>.gltf` and `<stem>.bin` into `dir`, returning the `.gltf` path
    pub fn write(mut self, dir: &Path, stem: &str) -> PathBuf {
        self.align();
        let bin_name = format!("{}.bin", stem);
        let roots: Vec<usize> = (0..self.nodes.len()).collect();
        let root = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": roots }],
            "nodes": self.nodes,
            "meshes": self.meshes,
            "accessors": self.accessors,
            "bufferViews": self.views,
            "buffers": [{ "uri": bin_name, "byteLength": self.bin.len() }],
        });

        fs::write(dir.join(&bin_name), &self.bin).unwrap();
        let path = dir.join(format!("{}.gltf", stem));
        fs::write(&path, serde_json::to_string_pretty(&root).unwrap()).unwrap();
        path
    }
}

/// Primitive JSON with the given attribute accessors
pub fn primitive(indices: Option<usize>, attributes: &[(&str, usize)]) -> Value {
    let attributes: serde_json::Map<String, Value> = attributes
        .iter()
        .map(|(name, accessor)| (name.to_string(), json!(accessor)))
        .collect();
    let mut primitive = json!({ "attributes": attributes });
    if let Some(indices) = indices {
        primitive["indices"] = json!(indices);
    }
    primitive
}

fn bounds<const N: usize>(values: &[[f32; N]]) -> (Vec<f32>, Vec<f32>) {
    let mut min = vec![f32::MAX; N];
    let mut max = vec![f32::MIN; N];
    for value in values {
        for (i, &component) in value.iter().enumerate() {
            min[i] = min[i].min(component);
            max[i] = max[i].max(component);
        }
    }
    (min, max)
}

pub const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
];
pub const QUAD_NORMALS: [[f32; 3]; 4] = [[0.0, 0.0, 1.0]; 4];
pub const QUAD_TANGENTS: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0, -1.0],
];
pub const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Quad with every supported attribute, as mesh `name`
pub fn add_quad(fixture: &mut GltfFixture, name: &str) -> usize {
    let indices = fixture.indices_u16(&QUAD_INDICES);
    let position = fixture.vec3(&QUAD_POSITIONS);
    let normal = fixture.vec3(&QUAD_NORMALS);
    let tangent = fixture.vec4(&QUAD_TANGENTS);
    let uv = fixture.vec2(&QUAD_UVS);
    fixture.mesh(
        name,
        vec![primitive(
            Some(indices),
            &[
                ("POSITION", position),
                ("NORMAL", normal),
                ("TANGENT", tangent),
                ("TEXCOORD_0", uv),
            ],
        )],
    )
}

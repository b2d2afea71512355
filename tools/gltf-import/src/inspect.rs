//! Document summary for the `inspect` command

use anyhow::Result;
use std::path::Path;

use crate::buffer_store::BufferStore;
use crate::component::ComponentType;
use crate::document::{Document, Semantic};

/// Log the scenes, meshes and buffers of a `.gltf` file
pub fn inspect_file(input: &Path) -> Result<()> {
    let document = Document::load(input)?;
    let folder = input.parent().unwrap_or_else(|| Path::new("."));
    let store = BufferStore::load(folder, &document.buffers);

    for line in describe(&document, &store) {
        tracing::info!("{}", line);
    }
    Ok(())
}

/// Human-readable summary lines for `document`
pub fn describe(document: &Document, store: &BufferStore) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Scenes: {}", document.scenes.len()));
    for (i, scene) in document.scenes.iter().enumerate() {
        let marker = if document.scene == Some(i) { " (default)" } else { "" };
        lines.push(format!(
            "  [{}] '{}': {} root nodes{}",
            i,
            scene.name.as_deref().unwrap_or("unnamed"),
            scene.nodes.len(),
            marker
        ));
    }

    lines.push(format!("Meshes: {}", document.meshes.len()));
    for (i, mesh) in document.meshes.iter().enumerate() {
        lines.push(format!(
            "  [{}] '{}': {} primitives",
            i,
            document.mesh_name(i),
            mesh.primitives.len()
        ));
        for (p, primitive) in mesh.primitives.iter().enumerate() {
            let indices = primitive
                .indices
                .map(|index| accessor_summary(document, index))
                .unwrap_or_else(|| "none".to_string());
            lines.push(format!(
                "    primitive {}: mode {}, indices {}",
                p,
                primitive.mode(),
                indices
            ));
            for semantic in Semantic::ALL {
                if let Some(index) = primitive.attributes.get(semantic) {
                    lines.push(format!(
                        "      {}: {}",
                        semantic.name(),
                        accessor_summary(document, index)
                    ));
                }
            }
        }
    }

    lines.push(format!("Buffers: {}", document.buffers.len()));
    for (i, buffer) in document.buffers.iter().enumerate() {
        let status = if store.contains(i) { "loaded" } else { "missing" };
        lines.push(format!(
            "  [{}] {}: {} bytes, {}",
            i,
            buffer.uri.as_deref().unwrap_or("<embedded>"),
            buffer.byte_length,
            status
        ));
    }

    lines
}

fn accessor_summary(document: &Document, index: usize) -> String {
    let Some(accessor) = document.accessor(index) else {
        return format!("accessor {} (missing)", index);
    };
    let component = match ComponentType::from_code(accessor.component_type) {
        Some(component) => format!("{:?}", component),
        None => format!("unknown({})", accessor.component_type),
    };
    format!(
        "accessor {} ({} x {} {})",
        index,
        accessor.count,
        accessor.element_type.as_deref().unwrap_or("?"),
        component
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_meshes_and_buffers() {
        let document = Document::parse(
            r#"{
                "scene": 0,
                "scenes": [{ "name": "Main", "nodes": [0] }],
                "nodes": [{ "mesh": 0 }],
                "meshes": [{ "primitives": [{
                    "attributes": { "POSITION": 0 },
                    "indices": 1
                }] }],
                "accessors": [
                    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
                    { "bufferView": 1, "componentType": 5124, "count": 3, "type": "SCALAR" }
                ],
                "buffers": [{ "uri": "mesh.bin", "byteLength": 48 }]
            }"#,
        )
        .unwrap();
        let store = BufferStore::new();

        let lines = describe(&document, &store);

        assert!(lines.contains(&"  [0] 'Main': 1 root nodes (default)".to_string()));
        assert!(lines.contains(&"  [0] 'mesh_0': 1 primitives".to_string()));
        let primitive = "    primitive 0: mode 4, indices accessor 1 (3 x SCALAR unknown(5124))";
        assert!(lines.contains(&primitive.to_string()));
        assert!(lines.contains(&"      POSITION: accessor 0 (3 x VEC3 F32)".to_string()));
        assert!(lines.contains(&"  [0] mesh.bin: 48 bytes, missing".to_string()));
    }
}

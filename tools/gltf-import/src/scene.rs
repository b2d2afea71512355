//! Scene graph traversal

use hashbrown::HashSet;

use crate::document::Document;

/// A mesh reference found while walking the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshInstance {
    pub node: usize,
    pub mesh: usize,
}

/// Meshes referenced by the default scene, in depth-first node order.
///
/// Each mesh is listed once, at its first reference; node transforms are
/// not applied, so later references would build identical meshes. Dangling
/// indices and cycles are logged and skipped.
pub fn mesh_instances(document: &Document) -> Vec<MeshInstance> {
    let Some(scene) = document.default_scene() else {
        tracing::warn!("Document has no scene to import");
        return Vec::new();
    };

    let mut instances = Vec::new();
    let mut visited_nodes = HashSet::new();
    let mut seen_meshes = HashSet::new();
    let mut stack: Vec<usize> = scene.nodes.iter().rev().copied().collect();

    while let Some(node_index) = stack.pop() {
        let Some(node) = document.node(node_index) else {
            tracing::warn!("Node {} does not exist, skipping", node_index);
            continue;
        };
        if !visited_nodes.insert(node_index) {
            tracing::warn!("Node {} is reachable more than once, skipping", node_index);
            continue;
        }

        if let Some(mesh) = node.mesh {
            if document.mesh(mesh).is_none() {
                tracing::warn!("Node {} references missing mesh {}", node_index, mesh);
            } else if seen_meshes.insert(mesh) {
                instances.push(MeshInstance {
                    node: node_index,
                    mesh,
                });
            } else {
                tracing::debug!("Mesh {} already imported, node {} reuses it", mesh, node_index);
            }
        }

        stack.extend(node.children.iter().rev().copied());
    }

    instances
}

//! Combining decoded primitives into one raw mesh
//!
//! The raw mesh follows the wedge layout mesh builders expect: vertex
//! positions are shared, while every other attribute is stored per wedge
//! (triangle corner). Axis conventions differ from glTF, so normals and
//! tangents are negated on the way in.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::options::BuildSettings;
use crate::primitive::DecodedPrimitive;

/// Smoothing group assigned to every triangle when none is given
pub const DEFAULT_SMOOTHING_MASK: u32 = 1;

/// Combined mesh buffers handed to the mesh builder
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawMesh {
    pub vertex_positions: Vec<Vec3>,
    /// Three entries per triangle, indexing `vertex_positions`
    pub wedge_indices: Vec<u32>,
    /// Tangents
    pub wedge_tangent_x: Vec<Vec3>,
    /// Bitangents
    pub wedge_tangent_y: Vec<Vec3>,
    /// Normals
    pub wedge_tangent_z: Vec<Vec3>,
    pub wedge_tex_coords: Vec<Vec2>,
    pub face_material_indices: Vec<u32>,
    pub face_smoothing_masks: Vec<u32>,
}

impl RawMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertex_positions.len()
    }

    pub fn wedge_count(&self) -> usize {
        self.wedge_indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.wedge_indices.len() / 3
    }
}

/// What happened to a pushed primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pushed {
    Appended,
    /// Had positions but no triangle indices; nothing was added
    Skipped,
    /// Had no positions; assembly of this mesh stopped
    Halted,
}

/// Accumulates primitives of one mesh in declaration order
#[derive(Debug)]
pub struct MeshAssembler {
    label: String,
    raw: RawMesh,
    settings: BuildSettings,
    halted: bool,
}

impl MeshAssembler {
    pub fn new(label: impl Into<String>, settings: BuildSettings) -> Self {
        Self {
            label: label.into(),
            raw: RawMesh::default(),
            settings,
            halted: false,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Buffers assembled so far
    pub fn raw(&self) -> &RawMesh {
        &self.raw
    }

    /// Append one primitive.
    ///
    /// A primitive without positions stops assembly: it and every later
    /// primitive are ignored. Out-of-range indices wrap modulo the
    /// primitive's vertex count before being offset into the combined mesh.
    /// Normals and tangents are per vertex in glTF and are written once per
    /// wedge through the primitive's own indices.
    pub fn push(&mut self, primitive: DecodedPrimitive) -> Pushed {
        if self.halted {
            return Pushed::Halted;
        }
        if primitive.positions.is_empty() {
            tracing::error!(
                "{}: primitive has no position data, ignoring the remaining primitives",
                self.label
            );
            self.halted = true;
            return Pushed::Halted;
        }
        if primitive.indices.is_empty() {
            tracing::warn!("{}: primitive has no triangle indices, skipping", self.label);
            return Pushed::Skipped;
        }

        let Some((offset, vertex_count)) =
            index_range(self.raw.vertex_positions.len(), primitive.positions.len())
        else {
            tracing::error!(
                "{}: {} vertices overflow 32-bit indices, ignoring the remaining primitives",
                self.label,
                primitive.positions.len()
            );
            self.halted = true;
            return Pushed::Halted;
        };

        let DecodedPrimitive {
            indices,
            positions,
            normals,
            tangents,
            tex_coords,
        } = primitive;

        let local: Vec<usize> = indices
            .into_iter()
            .map(|index| (index % vertex_count) as usize)
            .collect();
        self.raw
            .wedge_indices
            .extend(local.iter().map(|&index| index as u32 + offset));
        self.raw.vertex_positions.extend(positions);

        let has_normals = normals.len() == vertex_count as usize;
        if normals.is_empty() {
            self.settings.recompute_normals = true;
        } else if !has_normals {
            tracing::warn!(
                "{}: {} normals for {} vertices, recomputing normals",
                self.label,
                normals.len(),
                vertex_count
            );
            self.settings.recompute_normals = true;
        } else {
            self.raw
                .wedge_tangent_z
                .extend(local.iter().map(|&index| -normals[index]));
        }

        if tangents.is_empty() {
            self.settings.recompute_tangents = true;
        } else if tangents.len() == normals.len() && has_normals {
            for &index in &local {
                let tangent = tangents[index];
                let tangent_x = -tangent.truncate();
                self.raw.wedge_tangent_x.push(tangent_x);
                self.raw
                    .wedge_tangent_y
                    .push(normals[index].cross(tangent_x * -tangent.w));
            }
        } else {
            tracing::error!(
                "{}: {} tangents but {} normals, dropping tangents",
                self.label,
                tangents.len(),
                normals.len()
            );
        }

        self.raw.wedge_tex_coords.extend(tex_coords);
        Pushed::Appended
    }

    /// Fill per-face defaults and repair per-wedge attribute counts.
    pub fn finish(self) -> (RawMesh, BuildSettings) {
        let MeshAssembler {
            label,
            mut raw,
            settings,
            ..
        } = self;

        let wedge_count = raw.wedge_count();
        if wedge_count > 0 && wedge_count % 3 == 0 {
            let triangle_count = raw.triangle_count();
            if raw.face_material_indices.is_empty() {
                raw.face_material_indices = vec![0; triangle_count];
            }
            if raw.face_smoothing_masks.is_empty() {
                raw.face_smoothing_masks = vec![DEFAULT_SMOOTHING_MASK; triangle_count];
            }

            if raw.wedge_tex_coords.len() != wedge_count {
                if !raw.wedge_tex_coords.is_empty()
                    && raw.wedge_tex_coords.len() == raw.vertex_count()
                {
                    raw.wedge_tex_coords =
                        expand_per_wedge(&raw.wedge_tex_coords, &raw.wedge_indices);
                } else {
                    if !raw.wedge_tex_coords.is_empty() {
                        tracing::warn!(
                            "{}: {} texture coordinates for {} wedges, zero-filling",
                            label,
                            raw.wedge_tex_coords.len(),
                            wedge_count
                        );
                    }
                    raw.wedge_tex_coords = vec![Vec2::ZERO; wedge_count];
                }
            }

        }

        (raw, settings)
    }
}

/// Index offset and vertex count for appending `added` vertices after
/// `existing` ones, or `None` when the total no longer fits in `u32`
fn index_range(existing: usize, added: usize) -> Option<(u32, u32)> {
    let total = existing.checked_add(added)?;
    u32::try_from(total)
        .ok()
        .map(|_| (existing as u32, added as u32))
}

/// Turn per-vertex values into per-wedge values
fn expand_per_wedge<T: Copy>(per_vertex: &[T], wedge_indices: &[u32]) -> Vec<T> {
    wedge_indices
        .iter()
        .map(|&index| per_vertex[index as usize % per_vertex.len()])
        .collect()
}

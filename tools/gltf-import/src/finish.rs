//! Final validation and global fix-ups of an assembled mesh

use crate::assemble::RawMesh;
use crate::error::InvalidMesh;
use crate::options::{BuildSettings, ImportOptions};

/// Check that `raw` can be built.
///
/// Positions, complete triangles, in-range indices, one material and
/// smoothing entry per triangle and one texture coordinate per wedge are
/// required. Tangent-frame arrays are checked separately by
/// [`drop_partial_tangent_frames`] since the builder can recompute them.
pub fn validate(raw: &RawMesh) -> Result<(), InvalidMesh> {
    if raw.vertex_positions.is_empty() {
        return Err(InvalidMesh::NoPositions);
    }
    if raw.wedge_indices.is_empty() {
        return Err(InvalidMesh::NoTriangles);
    }
    if raw.wedge_count() % 3 != 0 {
        return Err(InvalidMesh::IncompleteTriangles(raw.wedge_count()));
    }
    if let Some(&index) = raw
        .wedge_indices
        .iter()
        .find(|&&index| index as usize >= raw.vertex_count())
    {
        return Err(InvalidMesh::IndexOutOfRange {
            index,
            vertex_count: raw.vertex_count(),
        });
    }

    let triangles = raw.triangle_count();
    expect_count("face material indices", raw.face_material_indices.len(), triangles)?;
    expect_count("face smoothing masks", raw.face_smoothing_masks.len(), triangles)?;
    expect_count("texture coordinates", raw.wedge_tex_coords.len(), raw.wedge_count())?;
    Ok(())
}

fn expect_count(
    attribute: &'static str,
    found: usize,
    expected: usize,
) -> Result<(), InvalidMesh> {
    if found == expected {
        Ok(())
    } else {
        Err(InvalidMesh::AttributeCount {
            attribute,
            found,
            expected,
        })
    }
}

/// Discard normal or tangent arrays that do not cover every wedge and ask
/// the builder to recompute them instead.
pub fn drop_partial_tangent_frames(
    label: &str,
    raw: &mut RawMesh,
    settings: &mut BuildSettings,
) {
    let wedges = raw.wedge_count();

    if !raw.wedge_tangent_z.is_empty() && raw.wedge_tangent_z.len() != wedges {
        tracing::warn!(
            "{}: {} normals for {} wedges, recomputing normals",
            label,
            raw.wedge_tangent_z.len(),
            wedges
        );
        raw.wedge_tangent_z.clear();
        settings.recompute_normals = true;
    }

    let tangents_complete =
        raw.wedge_tangent_x.len() == wedges && raw.wedge_tangent_y.len() == wedges;
    let has_tangents = !raw.wedge_tangent_x.is_empty() || !raw.wedge_tangent_y.is_empty();
    if has_tangents && !tangents_complete {
        tracing::warn!(
            "{}: {} tangents for {} wedges, recomputing tangents",
            label,
            raw.wedge_tangent_x.len(),
            wedges
        );
        raw.wedge_tangent_x.clear();
        raw.wedge_tangent_y.clear();
        settings.recompute_tangents = true;
    }
}

/// Flip the winding of every triangle and negate every normal.
///
/// Per-wedge attributes swap the same corners as the indices so each wedge
/// keeps the attributes of the vertex it points at.
pub fn invert_normals(raw: &mut RawMesh) {
    let wedges = raw.wedge_count();
    swap_corners(&mut raw.wedge_indices);
    for attribute in [
        &mut raw.wedge_tangent_x,
        &mut raw.wedge_tangent_y,
        &mut raw.wedge_tangent_z,
    ] {
        if attribute.len() == wedges {
            swap_corners(attribute);
        }
    }
    if raw.wedge_tex_coords.len() == wedges {
        swap_corners(&mut raw.wedge_tex_coords);
    }
    for normal in &mut raw.wedge_tangent_z {
        *normal = -*normal;
    }
}

fn swap_corners<T>(per_wedge: &mut [T]) {
    for triangle in per_wedge.chunks_exact_mut(3) {
        triangle.swap(1, 2);
    }
}

/// Scale positions by `ratio` and convert them to the builder's axes
pub fn scale_positions(raw: &mut RawMesh, ratio: f32) {
    for position in &mut raw.vertex_positions {
        *position *= -ratio;
    }
}

/// Validate `raw` and apply the option-driven fix-ups.
pub fn finish_mesh(
    label: &str,
    mut raw: RawMesh,
    mut settings: BuildSettings,
    options: &ImportOptions,
) -> Result<(RawMesh, BuildSettings), InvalidMesh> {
    validate(&raw)?;
    drop_partial_tangent_frames(label, &mut raw, &mut settings);

    if options.invert_normal {
        invert_normals(&mut raw);
    }
    scale_positions(&mut raw, options.mesh_scale_ratio);

    Ok((raw, settings))
}

//! Per-primitive attribute decoding

use glam::{Vec2, Vec3, Vec4};

use crate::accessor::AccessorReader;
use crate::document::{Primitive, Semantic, MODE_TRIANGLES};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::options::BuildSettings;

/// Attribute arrays decoded from one primitive.
///
/// Optional attributes are empty when absent or undecodable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPrimitive {
    pub indices: Vec<u32>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec4>,
    pub tex_coords: Vec<Vec2>,
}

impl DecodedPrimitive {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Decode the indices and known attributes of `primitive`.
///
/// Failures are logged and leave the affected array empty. Positions gate
/// every other vertex attribute; normals and tangents are not read when
/// `settings` already asks for them to be recomputed.
pub fn decode_primitive(
    reader: &AccessorReader,
    label: &str,
    primitive: &Primitive,
    settings: &BuildSettings,
) -> DecodedPrimitive {
    let mut decoded = DecodedPrimitive::default();

    if primitive.mode() != MODE_TRIANGLES {
        tracing::warn!(
            "{}: primitive mode {} is not a triangle list, skipping geometry",
            label,
            primitive.mode()
        );
        return decoded;
    }

    match primitive.indices {
        Some(index) => {
            decoded.indices =
                report(label, "indices", reader.read_indices(index)).unwrap_or_default();
        }
        None => tracing::warn!("{}: primitive has no indices", label),
    }

    decoded.positions = read_vectors(
        reader,
        label,
        primitive,
        Semantic::Position,
        Vec3::from_array,
    );
    if decoded.positions.is_empty() {
        return decoded;
    }

    if !settings.recompute_normals {
        decoded.normals =
            read_vectors(reader, label, primitive, Semantic::Normal, Vec3::from_array);
    }
    if !settings.recompute_tangents {
        decoded.tangents =
            read_vectors(reader, label, primitive, Semantic::Tangent, Vec4::from_array);
    }
    decoded.tex_coords = read_vectors(
        reader,
        label,
        primitive,
        Semantic::TexCoord0,
        Vec2::from_array,
    );

    decoded
}

fn read_vectors<T: bytemuck::Pod, V>(
    reader: &AccessorReader,
    label: &str,
    primitive: &Primitive,
    semantic: Semantic,
    convert: impl Fn(T) -> V,
) -> Vec<V> {
    let Some(index) = primitive.attributes.get(semantic) else {
        return Vec::new();
    };
    report(label, semantic.name(), reader.read_attribute::<T>(index, semantic))
        .map(|values| values.into_iter().map(convert).collect())
        .unwrap_or_default()
}

/// Log a decode failure at the level its kind calls for
fn report<T>(label: &str, what: &str, result: Result<T, DecodeError>) -> Option<T> {
    match result {
        Ok(values) => Some(values),
        Err(err) => {
            match err.kind() {
                DecodeErrorKind::MalformedData => {
                    tracing::warn!("{}: malformed {} data, ignoring it: {}", label, what, err)
                }
                DecodeErrorKind::UnsupportedFormat => {
                    tracing::error!("{}: cannot decode {}: {}", label, what, err)
                }
            }
            None
        }
    }
}

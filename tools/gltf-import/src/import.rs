//! Import pipeline: decode, assemble, finish and hand off each mesh

use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

use crate::accessor::AccessorReader;
use crate::assemble::{MeshAssembler, Pushed, RawMesh};
use crate::buffer_store::BufferStore;
use crate::document::Document;
use crate::error::ImportError;
use crate::finish::finish_mesh;
use crate::options::{BuildSettings, ImportOptions};
use crate::primitive::{decode_primitive, DecodedPrimitive};
use crate::scene::mesh_instances;

/// A finished mesh ready for the mesh builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticMesh {
    pub name: String,
    /// Index of the source mesh in the glTF document
    pub mesh_index: usize,
    pub build_settings: BuildSettings,
    pub raw: RawMesh,
}

/// Receives finished meshes and turns them into assets.
///
/// Returning errors rejects the mesh; nothing of it should be kept.
pub trait MeshSink {
    fn build(&mut self, mesh: StaticMesh) -> Result<(), Vec<String>>;
}

/// Outcome of importing a scene
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Names of meshes accepted by the sink
    pub imported: Vec<String>,
    pub failed: Vec<ImportError>,
}

impl ImportReport {
    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }
}

/// Runs the mesh pipeline over one loaded document
pub struct Importer<'a> {
    document: &'a Document,
    store: &'a BufferStore,
    options: &'a ImportOptions,
}

impl<'a> Importer<'a> {
    pub fn new(
        document: &'a Document,
        store: &'a BufferStore,
        options: &'a ImportOptions,
    ) -> Self {
        Self {
            document,
            store,
            options,
        }
    }

    /// Build the combined raw mesh of `mesh_index`.
    ///
    /// Primitives are decoded in parallel and assembled in declaration order.
    pub fn import_mesh(&self, mesh_index: usize) -> Result<StaticMesh, ImportError> {
        let mesh = self
            .document
            .mesh(mesh_index)
            .ok_or(ImportError::MissingMesh(mesh_index))?;
        let name = self.document.mesh_name(mesh_index);
        let settings = self.options.build_settings();
        let reader = AccessorReader::new(self.document, self.store);

        let decoded: Vec<DecodedPrimitive> = mesh
            .primitives
            .par_iter()
            .enumerate()
            .map(|(index, primitive)| {
                let label = format!("{}/{}", name, index);
                decode_primitive(&reader, &label, primitive, &settings)
            })
            .collect();

        let mut assembler = MeshAssembler::new(name.clone(), settings);
        for primitive in decoded {
            if assembler.push(primitive) == Pushed::Halted {
                break;
            }
        }
        let (raw, settings) = assembler.finish();

        let (raw, build_settings) =
            finish_mesh(&name, raw, settings, self.options).map_err(|reason| {
                ImportError::Invalid {
                    name: name.clone(),
                    reason,
                }
            })?;

        tracing::debug!(
            "{}: {} vertices, {} triangles",
            name,
            raw.vertex_count(),
            raw.triangle_count()
        );

        Ok(StaticMesh {
            name,
            mesh_index,
            build_settings,
            raw,
        })
    }

    /// Import every mesh of the default scene into `sink`.
    ///
    /// A mesh that fails is recorded in the report; the others still import.
    pub fn import_scene(&self, sink: &mut dyn MeshSink) -> ImportReport {
        let mut report = ImportReport::default();

        for instance in mesh_instances(self.document) {
            let result = self.import_mesh(instance.mesh).and_then(|mesh| {
                let name = mesh.name.clone();
                sink.build(mesh)
                    .map(|()| name.clone())
                    .map_err(|errors| ImportError::Build { name, errors })
            });

            match result {
                Ok(name) => {
                    tracing::info!("Imported mesh '{}'", name);
                    report.imported.push(name);
                }
                Err(err) => {
                    tracing::error!("{}", err);
                    report.failed.push(err);
                }
            }
        }

        report
    }
}

/// Import the default scene of a `.gltf` file, resolving buffers next to it
pub fn import_file(
    path: &Path,
    options: &ImportOptions,
    sink: &mut dyn MeshSink,
) -> anyhow::Result<ImportReport> {
    options.validate()?;
    let document = Document::load(path)?;
    let folder = path.parent().unwrap_or_else(|| Path::new("."));
    let store = BufferStore::load(folder, &document.buffers);

    tracing::info!(
        "Loaded {:?}: {} meshes, {}/{} buffers available",
        path,
        document.meshes.len(),
        (0..document.buffers.len())
            .filter(|&i| store.contains(i))
            .count(),
        document.buffers.len()
    );

    Ok(Importer::new(&document, &store, options).import_scene(sink))
}

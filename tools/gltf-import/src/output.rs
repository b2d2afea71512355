//! Mesh sinks: JSON files on disk, or an in-memory list

use hashbrown::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::import::{MeshSink, StaticMesh};

/// Writes each mesh to `<out_dir>/<name>.json`
#[derive(Debug)]
pub struct JsonMeshWriter {
    out_dir: PathBuf,
    used_names: HashSet<String>,
    written: Vec<PathBuf>,
}

impl JsonMeshWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            used_names: HashSet::new(),
            written: Vec::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Files written so far, in import order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Pick a file stem for `name` that no earlier mesh has used
    fn unique_stem(&mut self, name: &str) -> String {
        let base = sanitize_name(name);
        let mut stem = base.clone();
        let mut suffix = 1;
        while !self.used_names.insert(stem.clone()) {
            stem = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        stem
    }
}

impl MeshSink for JsonMeshWriter {
    fn build(&mut self, mesh: StaticMesh) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if mesh.raw.wedge_indices.is_empty() {
            errors.push("mesh has no triangles".to_string());
        }
        if mesh.raw.vertex_positions.iter().any(|p| !p.is_finite()) {
            errors.push("mesh has non-finite vertex positions".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        fs::create_dir_all(&self.out_dir).map_err(|e| {
            vec![format!(
                "failed to create {}: {}",
                self.out_dir.display(),
                e
            )]
        })?;

        let stem = self.unique_stem(&mesh.name);
        let path = self.out_dir.join(format!("{}.json", stem));
        let json = serde_json::to_string_pretty(&mesh)
            .map_err(|e| vec![format!("failed to serialize mesh: {}", e)])?;
        fs::write(&path, json)
            .map_err(|e| vec![format!("failed to write {}: {}", path.display(), e)])?;

        tracing::debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Keeps every mesh in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub meshes: Vec<StaticMesh>,
}

impl MeshSink for CollectingSink {
    fn build(&mut self, mesh: StaticMesh) -> Result<(), Vec<String>> {
        self.meshes.push(mesh);
        Ok(())
    }
}

/// Replace characters that are unsafe in file names
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "mesh".to_string()
    } else {
        sanitized
    }
}

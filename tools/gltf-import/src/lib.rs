//! gltf-import library
//!
//! Decodes the static meshes of a `.gltf` scene into combined raw meshes:
//! buffer files are loaded into a [`BufferStore`], accessors are read through
//! [`AccessorReader`], primitives are decoded and merged by [`MeshAssembler`],
//! and [`finish_mesh`] validates and fixes up the result before it is handed
//! to a [`MeshSink`].

pub mod accessor;
pub mod assemble;
pub mod buffer_store;
pub mod component;
pub mod document;
pub mod error;
pub mod finish;
pub mod import;
pub mod inspect;
pub mod options;
pub mod output;
pub mod primitive;
pub mod scene;

pub use accessor::AccessorReader;
pub use assemble::{MeshAssembler, Pushed, RawMesh};
pub use buffer_store::BufferStore;
pub use component::ComponentType;
pub use document::{Document, Semantic};
pub use error::{DecodeError, DecodeErrorKind, ImportError, InvalidMesh};
pub use finish::finish_mesh;
pub use import::{import_file, ImportReport, Importer, MeshSink, StaticMesh};
pub use options::{BuildSettings, ImportOptions, OptionsError};
pub use output::{CollectingSink, JsonMeshWriter};
pub use primitive::{decode_primitive, DecodedPrimitive};

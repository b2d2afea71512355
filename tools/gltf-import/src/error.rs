//! Error types for the import pipeline
//!
//! Attribute-level failures ([`DecodeError`]) are absorbed by the primitive
//! decoder and only degrade the output. Mesh-level failures ([`ImportError`])
//! abort the mesh being built but never the rest of the scene.

/// Severity class of a decode failure, used to pick the log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Byte ranges or counts that do not fit the file (logged as a warning)
    MalformedData,
    /// Component or element types the importer cannot decode (logged as an error)
    UnsupportedFormat,
}

/// Failure to decode a single accessor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("accessor {0} does not exist")]
    MissingAccessor(usize),

    #[error("accessor {accessor} has no buffer view")]
    NoBufferView { accessor: usize },

    #[error("buffer view {view} referenced by accessor {accessor} does not exist")]
    MissingBufferView { accessor: usize, view: usize },

    #[error("unsupported component type {code} for {usage}")]
    UnsupportedComponentType { code: u32, usage: &'static str },

    #[error("accessor {accessor} has element type {found}, expected {expected}")]
    ElementTypeMismatch {
        accessor: usize,
        found: String,
        expected: &'static str,
    },

    #[error(
        "accessor {accessor} needs {required} bytes but its buffer view holds {available}"
    )]
    AccessorOverflow {
        accessor: usize,
        required: usize,
        available: usize,
    },

    #[error("buffer {buffer} too short for {count} x {size} bytes at {offset} (stride {stride})")]
    BufferRead {
        buffer: usize,
        offset: usize,
        count: usize,
        size: usize,
        stride: usize,
    },

    #[error("index accessor {accessor} holds negative value {value} at position {position}")]
    NegativeIndex {
        accessor: usize,
        value: i32,
        position: usize,
    },
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::UnsupportedComponentType { .. } | Self::ElementTypeMismatch { .. } => {
                DecodeErrorKind::UnsupportedFormat
            }
            _ => DecodeErrorKind::MalformedData,
        }
    }
}

/// Reason a finished mesh was rejected before it reached the builder
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMesh {
    #[error("no vertex positions")]
    NoPositions,

    #[error("no triangle indices")]
    NoTriangles,

    #[error("{0} wedge indices do not form complete triangles")]
    IncompleteTriangles(usize),

    #[error("wedge index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{attribute} has {found} entries, expected {expected}")]
    AttributeCount {
        attribute: &'static str,
        found: usize,
        expected: usize,
    },
}

/// Failure to produce one mesh
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    #[error("mesh {0} does not exist")]
    MissingMesh(usize),

    #[error("mesh '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: InvalidMesh },

    #[error("mesh '{name}' failed to build: {}", .errors.join("; "))]
    Build { name: String, errors: Vec<String> },
}

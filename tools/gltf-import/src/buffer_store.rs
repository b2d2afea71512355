//! Raw buffer storage and strided reads
//!
//! The store owns every loaded buffer file, keyed by URI, and maps buffer
//! indices onto those URIs. Buffers that fail to load are simply absent and
//! any read against them returns `None`.

use bytemuck::Pod;
use hashbrown::HashMap;
use std::mem::size_of;
use std::path::Path;

use crate::document::Buffer;

/// Loaded buffer contents for one glTF document
#[derive(Debug, Default)]
pub struct BufferStore {
    blobs: HashMap<String, Vec<u8>>,
    index_to_uri: HashMap<usize, String>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every declared buffer from `folder/uri`.
    ///
    /// Entries sharing a URI share one blob. Missing files, embedded
    /// `data:` URIs and URI-less (GLB chunk) buffers are left absent.
    pub fn load(folder: &Path, buffers: &[Buffer]) -> Self {
        let mut store = Self::new();

        for (index, buffer) in buffers.iter().enumerate() {
            let Some(uri) = buffer.uri.as_deref() else {
                tracing::debug!("Buffer {} has no URI, skipping", index);
                continue;
            };
            if uri.starts_with("data:") {
                tracing::debug!("Buffer {} uses an embedded data URI, skipping", index);
                continue;
            }
            if store.blobs.contains_key(uri) {
                store.index_to_uri.insert(index, uri.to_string());
                continue;
            }

            let path = folder.join(uri);
            match std::fs::read(&path) {
                Ok(bytes) => {
                    tracing::debug!(
                        "Loaded buffer {} ({} bytes) from {:?}",
                        index,
                        bytes.len(),
                        path
                    );
                    store.insert(index, uri, bytes);
                }
                Err(err) => {
                    tracing::debug!("Buffer {} unavailable at {:?}: {}", index, path, err);
                }
            }
        }

        store
    }

    /// Register bytes for `index` under `uri`.
    ///
    /// If the URI is already loaded the existing blob is kept and `bytes` dropped.
    pub fn insert(&mut self, index: usize, uri: impl Into<String>, bytes: Vec<u8>) {
        let uri = uri.into();
        self.blobs.entry(uri.clone()).or_insert(bytes);
        self.index_to_uri.insert(index, uri);
    }

    /// Whether buffer `index` has data
    pub fn contains(&self, index: usize) -> bool {
        self.blob(index).is_some()
    }

    /// Number of distinct loaded blobs
    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    pub fn blob(&self, index: usize) -> Option<&[u8]> {
        self.index_to_uri
            .get(&index)
            .and_then(|uri| self.blob_by_uri(uri))
    }

    pub fn blob_by_uri(&self, uri: &str) -> Option<&[u8]> {
        self.blobs.get(uri).map(Vec::as_slice)
    }

    /// Read `count` elements of type `T` starting at `byte_start`, one every
    /// `byte_stride` bytes (0 = `size_of::<T>()`).
    ///
    /// Fails when the stride is smaller than the element, when `count` is 0,
    /// or when the buffer is shorter than `byte_start + count * byte_stride`.
    /// Elements are read unaligned in host byte order; glTF data is
    /// little-endian, matching every supported target.
    pub fn read<T: Pod>(
        &self,
        index: usize,
        byte_start: usize,
        count: usize,
        byte_stride: usize,
    ) -> Option<Vec<T>> {
        let size = size_of::<T>();
        let stride = if byte_stride == 0 { size } else { byte_stride };
        if size > stride || count == 0 {
            return None;
        }

        let bytes = self.blob(index)?;
        let end = count.checked_mul(stride)?.checked_add(byte_start)?;
        if bytes.len() < end {
            return None;
        }
        let window = &bytes[byte_start..end];

        let elements: Vec<T> = if stride == size {
            window
                .chunks_exact(size)
                .map(bytemuck::pod_read_unaligned)
                .collect()
        } else {
            window
                .chunks_exact(stride)
                .map(|chunk| bytemuck::pod_read_unaligned(&chunk[..size]))
                .collect()
        };
        Some(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_with(bytes: Vec<u8>) -> BufferStore {
        let mut store = BufferStore::new();
        store.insert(0, "data.bin", bytes);
        store
    }

    fn u16_bytes(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_zero_stride_matches_element_size() {
        let store = store_with(u16_bytes(&[10, 20, 30, 40]));

        let tight: Vec<u16> = store.read(0, 2, 3, 0).unwrap();
        let explicit: Vec<u16> = store.read(0, 2, 3, 2).unwrap();
        assert_eq!(tight, vec![20, 30, 40]);
        assert_eq!(tight, explicit);
    }

    #[test]
    fn test_strided_read_skips_padding() {
        // Interleaved [u16 value, u16 padding]
        let store = store_with(u16_bytes(&[1, 0xFFFF, 2, 0xFFFF, 3, 0xFFFF]));

        let values: Vec<u16> = store.read(0, 0, 3, 4).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_strided_float_vectors() {
        let mut bytes = Vec::new();
        for v in [[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]] {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
            bytes.extend_from_slice(&[0u8; 4]);
        }
        let store = store_with(bytes);

        let values: Vec<[f32; 3]> = store.read(0, 0, 2, 16).unwrap();
        assert_eq!(values, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_unaligned_start() {
        let mut bytes = vec![0xAAu8];
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&9u32.to_le_bytes());
        let store = store_with(bytes);

        let values: Vec<u32> = store.read(0, 1, 2, 0).unwrap();
        assert_eq!(values, vec![7, 9]);
    }

    #[test]
    fn test_stride_smaller_than_element_fails() {
        let store = store_with(vec![0u8; 64]);
        assert!(store.read::<u32>(0, 0, 4, 2).is_none());
        assert!(store.read::<[f32; 3]>(0, 0, 2, 8).is_none());
    }

    #[test]
    fn test_zero_count_fails() {
        let store = store_with(vec![0u8; 8]);
        assert!(store.read::<u16>(0, 0, 0, 0).is_none());
    }

    #[test]
    fn test_short_buffer_fails() {
        let store = store_with(u16_bytes(&[1, 2, 3]));
        assert!(store.read::<u16>(0, 0, 4, 0).is_none());
        assert!(store.read::<u16>(0, 2, 3, 0).is_none());
        // The bound uses the full stride for the last element too
        assert!(store.read::<u16>(0, 0, 2, 4).is_none());
        assert!(store.read::<u16>(0, usize::MAX, 1, 0).is_none());
    }

    #[test]
    fn test_missing_buffer_fails() {
        let store = store_with(vec![0u8; 8]);
        assert!(store.read::<u8>(1, 0, 1, 0).is_none());
    }

    #[test]
    fn test_load_dedups_by_uri() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("shared.bin"), u16_bytes(&[5, 6])).unwrap();

        let buffers = vec![
            Buffer {
                uri: Some("shared.bin".to_string()),
                byte_length: 4,
            },
            Buffer {
                uri: Some("missing.bin".to_string()),
                byte_length: 4,
            },
            Buffer {
                uri: Some("shared.bin".to_string()),
                byte_length: 4,
            },
            Buffer {
                uri: None,
                byte_length: 4,
            },
        ];
        let store = BufferStore::load(dir.path(), &buffers);

        assert_eq!(store.blob_count(), 1);
        assert!(store.contains(0));
        assert!(!store.contains(1));
        assert!(store.contains(2));
        assert!(!store.contains(3));
        assert_eq!(store.read::<u16>(2, 0, 2, 0), Some(vec![5, 6]));
        assert!(store.read::<u16>(1, 0, 1, 0).is_none());
        assert_eq!(store.blob_by_uri("shared.bin"), store.blob(0));
        assert!(store.blob_by_uri("missing.bin").is_none());
    }
}

//! Typed accessor decoding over the buffer store

use bytemuck::Pod;
use std::mem::size_of;

use crate::buffer_store::BufferStore;
use crate::component::ComponentType;
use crate::document::{Accessor, BufferView, Document, Semantic};
use crate::error::DecodeError;

/// Decodes accessors of one document against its loaded buffers
#[derive(Clone, Copy)]
pub struct AccessorReader<'a> {
    document: &'a Document,
    store: &'a BufferStore,
}

impl<'a> AccessorReader<'a> {
    pub fn new(document: &'a Document, store: &'a BufferStore) -> Self {
        Self { document, store }
    }

    /// Decode a triangle index accessor, widening every value to `u32`.
    ///
    /// Signed component types are accepted for compatibility but any
    /// negative value rejects the whole accessor.
    pub fn read_indices(&self, index: usize) -> Result<Vec<u32>, DecodeError> {
        let (accessor, view) = self.locate(index)?;
        let unsupported = || DecodeError::UnsupportedComponentType {
            code: accessor.component_type,
            usage: "indices",
        };
        let component = ComponentType::from_code(accessor.component_type).ok_or_else(unsupported)?;

        match component {
            ComponentType::I8 => {
                let raw: Vec<i8> = self.read(index, accessor, view)?;
                widen_signed(index, raw.into_iter().map(i32::from))
            }
            ComponentType::U8 => {
                let raw: Vec<u8> = self.read(index, accessor, view)?;
                Ok(raw.into_iter().map(u32::from).collect())
            }
            ComponentType::I16 => {
                let raw: Vec<i16> = self.read(index, accessor, view)?;
                widen_signed(index, raw.into_iter().map(i32::from))
            }
            ComponentType::U16 => {
                let raw: Vec<u16> = self.read(index, accessor, view)?;
                Ok(raw.into_iter().map(u32::from).collect())
            }
            ComponentType::U32 => self.read(index, accessor, view),
            ComponentType::F32 => Err(unsupported()),
        }
    }

    /// Decode a float vertex attribute as elements of `T` (`[f32; N]`).
    ///
    /// Only `F32` components are supported. When the accessor declares an
    /// element type it must match the one the semantic is stored as.
    pub fn read_attribute<T: Pod>(
        &self,
        index: usize,
        semantic: Semantic,
    ) -> Result<Vec<T>, DecodeError> {
        let (accessor, view) = self.locate(index)?;
        if ComponentType::from_code(accessor.component_type) != Some(ComponentType::F32) {
            return Err(DecodeError::UnsupportedComponentType {
                code: accessor.component_type,
                usage: semantic.name(),
            });
        }
        if let Some(found) = accessor.element_type.as_deref() {
            if found != semantic.element_type() {
                return Err(DecodeError::ElementTypeMismatch {
                    accessor: index,
                    found: found.to_string(),
                    expected: semantic.element_type(),
                });
            }
        }
        self.read(index, accessor, view)
    }

    fn locate(&self, index: usize) -> Result<(&'a Accessor, &'a BufferView), DecodeError> {
        let accessor = self
            .document
            .accessor(index)
            .ok_or(DecodeError::MissingAccessor(index))?;
        let view_index = accessor
            .buffer_view
            .ok_or(DecodeError::NoBufferView { accessor: index })?;
        let view = self
            .document
            .buffer_view(view_index)
            .ok_or(DecodeError::MissingBufferView {
                accessor: index,
                view: view_index,
            })?;
        Ok((accessor, view))
    }

    fn read<T: Pod>(
        &self,
        index: usize,
        accessor: &Accessor,
        view: &BufferView,
    ) -> Result<Vec<T>, DecodeError> {
        let size = size_of::<T>();
        let required = accessor.count.saturating_mul(size);
        if required > view.byte_length {
            return Err(DecodeError::AccessorOverflow {
                accessor: index,
                required,
                available: view.byte_length,
            });
        }

        let start = view.byte_offset.saturating_add(accessor.byte_offset);
        self.store
            .read(view.buffer, start, accessor.count, view.stride())
            .ok_or(DecodeError::BufferRead {
                buffer: view.buffer,
                offset: start,
                count: accessor.count,
                size,
                stride: view.stride(),
            })
    }
}

fn widen_signed(
    accessor: usize,
    values: impl Iterator<Item = i32>,
) -> Result<Vec<u32>, DecodeError> {
    values
        .enumerate()
        .map(|(position, value)| {
            u32::try_from(value).map_err(|_| DecodeError::NegativeIndex {
                accessor,
                value,
                position,
            })
        })
        .collect()
}

//! Runtime dispatch over the three concrete buffer kinds.
//!
//! Host bindings see arrays whose scalar type is only known at runtime.
//! [`AnyArrayView`] carries such an array into the crate and
//! [`AnyRaggedBuffer`] is the closed tagged union over the `f32`, `i64` and
//! `bool` buffers built from it. Shape queries and formatting go through
//! the union directly, while arithmetic stays on the typed buffers reached
//! via `as_*`.
//!
//! # Examples
//!
//! ```
//! use ragged_core::{AnyRaggedBuffer, DType, RaggedBuffer, RaggedShape};
//!
//! let floats: AnyRaggedBuffer = RaggedBuffer::from_parts(vec![1.0f32, 2.0], 1, vec![2]).unwrap().into();
//! let ints: AnyRaggedBuffer = RaggedBuffer::from_parts(vec![3i64], 1, vec![1]).unwrap().into();
//!
//! assert_eq!(floats.dtype(), DType::F32);
//! assert_eq!(floats.lengths(), vec![2]);
//! assert!(AnyRaggedBuffer::cat(&[floats.clone(), floats.clone()], 0).is_ok());
//! assert!(AnyRaggedBuffer::cat(&[floats, ints], 0).is_err());
//! ```
//!
//! Construction from host arrays picks the buffer kind from the array:
//!
//! ```
//! use ragged_core::{AnyRaggedBuffer, DType, RaggedShape};
//! use scirs2_core::ndarray_ext::{array, Array3};
//!
//! let flat = array![[true], [false], [true]];
//! let flags = AnyRaggedBuffer::from_flattened(flat.view().into(), &[2, 1]).unwrap();
//! assert_eq!(flags.dtype(), DType::Bool);
//! assert_eq!(flags.lengths(), vec![2, 1]);
//!
//! let dense = Array3::<i64>::zeros((2, 3, 1));
//! let ids = AnyRaggedBuffer::from_array(dense.view().into()).unwrap();
//! assert_eq!(ids.dtype(), DType::I64);
//! assert_eq!(ids.lengths(), vec![3, 3]);
//! ```

use std::fmt;

use scirs2_core::ndarray_ext::{ArrayView, Dimension, Ix2, IxDyn};

use crate::buffer::RaggedBuffer;
use crate::error::{ArgumentError, RaggedError, RaggedResult, ShapeMismatchError};
use crate::scalar::{DType, Element};
use crate::shape::RaggedShape;

/// A ragged buffer of any supported scalar kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnyRaggedBuffer {
    F32(RaggedBuffer<f32>),
    I64(RaggedBuffer<i64>),
    Bool(RaggedBuffer<bool>),
}

/// A borrowed host array whose scalar kind is only known at runtime.
#[derive(Debug, Clone)]
pub enum AnyArrayView<'a> {
    F32(ArrayView<'a, f32, IxDyn>),
    I64(ArrayView<'a, i64, IxDyn>),
    Bool(ArrayView<'a, bool, IxDyn>),
}

impl AnyArrayView<'_> {
    /// Scalar kind of the array.
    pub fn dtype(&self) -> DType {
        match self {
            AnyArrayView::F32(_) => DType::F32,
            AnyArrayView::I64(_) => DType::I64,
            AnyArrayView::Bool(_) => DType::Bool,
        }
    }

    /// Number of dimensions of the array.
    pub fn ndim(&self) -> usize {
        match self {
            AnyArrayView::F32(view) => view.ndim(),
            AnyArrayView::I64(view) => view.ndim(),
            AnyArrayView::Bool(view) => view.ndim(),
        }
    }
}

macro_rules! impl_from_view {
    ($scalar:ty, $variant:ident) => {
        impl<'a, D: Dimension> From<ArrayView<'a, $scalar, D>> for AnyArrayView<'a> {
            fn from(view: ArrayView<'a, $scalar, D>) -> Self {
                AnyArrayView::$variant(view.into_dyn())
            }
        }
    };
}

impl_from_view!(f32, F32);
impl_from_view!(i64, I64);
impl_from_view!(bool, Bool);

macro_rules! dispatch {
    ($value:expr, $buffer:ident => $body:expr) => {
        match $value {
            AnyRaggedBuffer::F32($buffer) => $body,
            AnyRaggedBuffer::I64($buffer) => $body,
            AnyRaggedBuffer::Bool($buffer) => $body,
        }
    };
}

impl AnyRaggedBuffer {
    /// Empty buffer of the given kind and feature width.
    pub fn new(dtype: DType, features: usize) -> Self {
        match dtype {
            DType::F32 => AnyRaggedBuffer::F32(RaggedBuffer::new(features)),
            DType::I64 => AnyRaggedBuffer::I64(RaggedBuffer::new(features)),
            DType::Bool => AnyRaggedBuffer::Bool(RaggedBuffer::new(features)),
        }
    }

    /// Build a buffer of the array's kind from a dense
    /// `[batch, items, features]` array.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch error if the array is not three-dimensional.
    pub fn from_array(array: AnyArrayView<'_>) -> RaggedResult<Self> {
        Ok(match array {
            AnyArrayView::F32(view) => AnyRaggedBuffer::F32(RaggedBuffer::from_array(view)?),
            AnyArrayView::I64(view) => AnyRaggedBuffer::I64(RaggedBuffer::from_array(view)?),
            AnyArrayView::Bool(view) => AnyRaggedBuffer::Bool(RaggedBuffer::from_array(view)?),
        })
    }

    /// Build a buffer of the array's kind from a flat `[items, features]`
    /// array and per-sequence lengths.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch error if the array is not two-dimensional,
    /// otherwise as [`RaggedBuffer::from_flattened`].
    pub fn from_flattened(flattened: AnyArrayView<'_>, lengths: &[i64]) -> RaggedResult<Self> {
        Ok(match flattened {
            AnyArrayView::F32(view) => AnyRaggedBuffer::F32(flattened_kind(view, lengths)?),
            AnyArrayView::I64(view) => AnyRaggedBuffer::I64(flattened_kind(view, lengths)?),
            AnyArrayView::Bool(view) => AnyRaggedBuffer::Bool(flattened_kind(view, lengths)?),
        })
    }

    /// Scalar kind of the wrapped buffer.
    pub fn dtype(&self) -> DType {
        match self {
            AnyRaggedBuffer::F32(_) => DType::F32,
            AnyRaggedBuffer::I64(_) => DType::I64,
            AnyRaggedBuffer::Bool(_) => DType::Bool,
        }
    }

    pub fn as_f32(&self) -> Option<&RaggedBuffer<f32>> {
        match self {
            AnyRaggedBuffer::F32(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&RaggedBuffer<i64>> {
        match self {
            AnyRaggedBuffer::I64(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&RaggedBuffer<bool>> {
        match self {
            AnyRaggedBuffer::Bool(buffer) => Some(buffer),
            _ => None,
        }
    }

    /// Concatenate buffers of a single kind along `axis`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid argument error on an empty list or a list
    /// mixing scalar kinds, before any data is touched; otherwise as
    /// [`RaggedBuffer::cat`].
    pub fn cat(buffers: &[AnyRaggedBuffer], axis: usize) -> RaggedResult<Self> {
        let first = buffers
            .first()
            .ok_or(ArgumentError::EmptyInput { operation: "cat" })?;
        Ok(match first {
            AnyRaggedBuffer::F32(_) => AnyRaggedBuffer::F32(cat_kind(buffers, axis, Self::as_f32)?),
            AnyRaggedBuffer::I64(_) => AnyRaggedBuffer::I64(cat_kind(buffers, axis, Self::as_i64)?),
            AnyRaggedBuffer::Bool(_) => {
                AnyRaggedBuffer::Bool(cat_kind(buffers, axis, Self::as_bool)?)
            }
        })
    }
}

fn flattened_kind<T: Element>(
    view: ArrayView<'_, T, IxDyn>,
    lengths: &[i64],
) -> RaggedResult<RaggedBuffer<T>> {
    let ndim = view.ndim();
    let flat = view
        .into_dimensionality::<Ix2>()
        .map_err(|_| ShapeMismatchError::Dimensionality { expected: 2, got: ndim })?;
    RaggedBuffer::from_flattened(flat, lengths)
}

fn cat_kind<T: Element>(
    buffers: &[AnyRaggedBuffer],
    axis: usize,
    project: fn(&AnyRaggedBuffer) -> Option<&RaggedBuffer<T>>,
) -> RaggedResult<RaggedBuffer<T>> {
    let typed = buffers
        .iter()
        .map(|buffer| {
            project(buffer).ok_or_else(|| {
                RaggedError::from(ArgumentError::DTypeMismatch {
                    expected: T::DTYPE,
                    got: buffer.dtype(),
                })
            })
        })
        .collect::<RaggedResult<Vec<_>>>()?;
    RaggedBuffer::cat(&typed, axis)
}

impl RaggedShape for AnyRaggedBuffer {
    fn size0(&self) -> usize {
        dispatch!(self, buffer => buffer.size0())
    }

    fn lengths(&self) -> Vec<usize> {
        dispatch!(self, buffer => buffer.lengths())
    }

    fn size2(&self) -> usize {
        dispatch!(self, buffer => buffer.size2())
    }

    fn items(&self) -> usize {
        dispatch!(self, buffer => buffer.items())
    }
}

impl fmt::Display for AnyRaggedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, buffer => fmt::Display::fmt(buffer, f))
    }
}

impl From<RaggedBuffer<f32>> for AnyRaggedBuffer {
    fn from(buffer: RaggedBuffer<f32>) -> Self {
        AnyRaggedBuffer::F32(buffer)
    }
}

impl From<RaggedBuffer<i64>> for AnyRaggedBuffer {
    fn from(buffer: RaggedBuffer<i64>) -> Self {
        AnyRaggedBuffer::I64(buffer)
    }
}

impl From<RaggedBuffer<bool>> for AnyRaggedBuffer {
    fn from(buffer: RaggedBuffer<bool>) -> Self {
        AnyRaggedBuffer::Bool(buffer)
    }
}

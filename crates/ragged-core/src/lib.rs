//! # ragged-core
//!
//! Ragged tensor buffers: batches of variable-length sequences of
//! fixed-width feature rows, stored contiguously.
//!
//! This crate provides:
//!
//! - **Storage** ([`RaggedBuffer`]) with construction from flat arrays,
//!   appending, and borrowed `[items, features]` access
//! - **Indexing** ([`Index`], [`Selection`]) on all three axes, with gather,
//!   stepped ranges and deferred item-axis selections
//! - **Aliasing views** ([`RaggedView`], [`RaggedViewMut`]) that write
//!   through to the selected columns of their source
//! - **Arithmetic** with ragged broadcasting, in place or out of place
//! - **Concatenation** along the batch, item and feature axes
//! - **Pad/pack** ([`PadPack`]) of bucketed items into a dense grid
//! - **Geometry** ([`translate_rotate`]) for per-sequence 2D frames
//! - **Dtype dispatch** ([`AnyRaggedBuffer`]) over `f32`, `i64` and `bool`
//!
//! ## Shape Model
//!
//! A buffer has three logical axes:
//!
//! | axis | name    | size                             |
//! |------|---------|----------------------------------|
//! | 0    | batch   | `size0()` sequences              |
//! | 1    | item    | `size1(i)`, different per sequence |
//! | 2    | feature | `size2()`, the same for every item |
//!
//! Items are stored back to back in row-major order, so the whole buffer
//! is always available as one `[items, features]` array.
//!
//! ## Quick Start
//!
//! ```
//! use ragged_core::{Index, RaggedBuffer};
//! use scirs2_core::ndarray_ext::array;
//!
//! let mut entities = RaggedBuffer::<f32>::new(3);
//! entities.push(array![[1.0, 2.0, 0.0], [3.0, 4.0, 1.0]].view()).unwrap();
//! entities.push_empty();
//! entities.push(array![[5.0, 6.0, 0.0]].view()).unwrap();
//!
//! assert_eq!(entities.size0(), 3);
//! assert_eq!(entities.lengths(), vec![2, 0, 1]);
//! assert_eq!(entities.as_array().dim(), (3, 3));
//!
//! // Shift every x coordinate by the sequence's own offset.
//! let offsets = RaggedBuffer::from_parts(vec![10.0f32, 20.0, 30.0], 1, vec![1, 1, 1]).unwrap();
//! entities
//!     .view_mut(Index::All, vec![0])
//!     .unwrap()
//!     .try_add_assign(&offsets)
//!     .unwrap();
//! assert_eq!(entities.as_array().column(0).to_vec(), vec![11.0, 13.0, 35.0]);
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`RaggedResult`]. Failed operations
//! leave their receiver unchanged. Selecting item positions past the end
//! of a sequence is not an error; it selects nothing.
//!
//! ```
//! use ragged_core::{ErrorKind, RaggedBuffer};
//!
//! let err = RaggedBuffer::from_parts(vec![1i64, 2, 3], 1, vec![1, 1]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidArgument);
//! ```
//!
//! ## Features
//!
//! - `serde`: serialization for buffers, pad/pack results and dtype tags
//! - `tracing`: [`tracing_support::init_tracing`] installs a
//!   `tracing-subscriber` registry

pub mod buffer;
mod concat;
pub mod dynamic;
pub mod error;
mod format;
pub mod index;
pub mod ops;
pub mod padpack;
pub mod scalar;
pub mod selection;
pub mod shape;
pub mod tracing_support;
pub mod transform;
pub mod view;

#[cfg(test)]
mod property_tests;

pub use buffer::RaggedBuffer;
pub use dynamic::{AnyArrayView, AnyRaggedBuffer};
pub use error::{
    ArgumentError, ErrorKind, IndexError, RaggedError, RaggedResult, ShapeMismatchError,
};
pub use index::{Columns, Index, ItemPositions};
pub use ops::{broadcast_lengths, BinOp, OpAdd, OpMul, OpSub};
pub use padpack::PadPack;
pub use scalar::{DType, Element, Numeric};
pub use selection::{ItemSelection, Selection};
pub use shape::RaggedShape;
pub use transform::translate_rotate;
pub use view::{AsView, RaggedView, RaggedViewMut};

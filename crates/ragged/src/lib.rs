//! # ragged
//!
//! Ragged tensor buffers for batching variable-length entity observations.
//!
//! This is the **meta crate**: it re-exports [`ragged_core`] as [`core`]
//! and collects the commonly used names in [`prelude`].
//!
//! ## Quick Start
//!
//! ```
//! use ragged::prelude::*;
//!
//! // Two environments observing 2 and 1 entities with (x, y, hp) features.
//! let entities = RaggedBuffer::from_parts(
//!     vec![1.0f32, 2.0, 10.0, 4.0, 6.0, 7.0, 0.0, 0.0, 3.0],
//!     3,
//!     vec![2, 1],
//! )?;
//! assert_eq!(entities.lengths(), vec![2, 1]);
//!
//! // Per-environment global features, broadcast onto every entity.
//! let global = RaggedBuffer::from_parts(vec![0.5f32, 0.25], 1, vec![1, 1])?;
//! let joined = RaggedBuffer::cat(&[&entities, &global], 2)?;
//! assert_eq!(joined.size2(), 4);
//! assert_eq!(joined.as_array().column(3).to_vec(), vec![0.5, 0.5, 0.25]);
//! # Ok::<(), ragged::core::RaggedError>(())
//! ```
//!
//! ## Components
//!
//! ### Storage and indexing
//!
//! ```
//! use ragged::core::{Index, RaggedBuffer};
//!
//! let buffer = RaggedBuffer::from_parts((0..12).collect::<Vec<i64>>(), 2, vec![3, 0, 2, 1]).unwrap();
//! let picked = buffer.gather(&[3, 0]).unwrap();
//! assert_eq!(picked.lengths(), vec![1, 3]);
//!
//! let firsts = buffer.select(Index::All, Index::At(0), Index::All).unwrap().materialize();
//! assert_eq!(firsts.lengths(), vec![1, 0, 1, 1]);
//! ```
//!
//! ### Pad/pack
//!
//! ```
//! use ragged::core::RaggedBuffer;
//!
//! let ids = RaggedBuffer::from_parts(vec![0i64, 0, 1], 1, vec![2, 1]).unwrap();
//! let packed = ids.padpack().unwrap().expect("packable");
//! assert_eq!(packed.shape, (2, 2));
//! ```
//!
//! ## Features
//!
//! - `serde`: serialization support
//! - `tracing`: subscriber installation via
//!   [`core::tracing_support::init_tracing`]

pub use ragged_core as core;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use ragged::prelude::*;
    //!
    //! let buffer = RaggedBuffer::<f32>::new(4);
    //! assert_eq!(buffer.size2(), 4);
    //! ```

    // Buffers
    pub use crate::core::{AnyArrayView, AnyRaggedBuffer, DType, RaggedBuffer, RaggedShape};

    // Indexing and views
    pub use crate::core::{AsView, Index, RaggedView, RaggedViewMut, Selection};

    // Transforms
    pub use crate::core::{translate_rotate, PadPack};

    // Errors
    pub use crate::core::{ErrorKind, RaggedError, RaggedResult};
}

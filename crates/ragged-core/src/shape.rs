//! Dtype-independent shape interface.
//!
//! Every ragged container, whatever its scalar kind and whether it owns or
//! borrows its storage, has the same three logical axes: batch (axis 0),
//! variable-length item (axis 1) and feature (axis 2). [`RaggedShape`]
//! exposes them without naming the element type, so dispatch code can
//! inspect shapes of heterogeneous buffers uniformly.

use crate::error::{RaggedError, RaggedResult};

/// Shape queries shared by buffers, views, selections and dynamic buffers.
pub trait RaggedShape {
    /// Number of sequences (axis 0).
    fn size0(&self) -> usize;

    /// Length of every sequence (axis 1).
    fn lengths(&self) -> Vec<usize>;

    /// Feature width (axis 2).
    fn size2(&self) -> usize;

    /// Length of sequence `i`.
    fn size1(&self, i: usize) -> RaggedResult<usize> {
        self.lengths()
            .get(i)
            .copied()
            .ok_or_else(|| RaggedError::out_of_bounds(0, i, self.size0()))
    }

    /// Total number of items across all sequences.
    fn items(&self) -> usize {
        self.lengths().iter().sum()
    }

    /// Total number of scalars (`items * features`).
    fn len(&self) -> usize {
        self.items() * self.size2()
    }

    /// Whether the container holds no scalars.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

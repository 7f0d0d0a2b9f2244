//! Deferred multi-axis selections.
//!
//! [`RaggedBuffer::select`] accepts one [`Index`] per axis and returns a
//! [`Selection`] without copying anything. When the item axis is left
//! whole the selection is *canonical*: it is a plain [`RaggedView`] and its
//! lengths are those of the selected source sequences. Any other item-axis
//! selection is *pending*: the raw requested positions are kept and may
//! name items a sequence does not have. [`Selection::materialize`] is the
//! single conversion to an owned buffer; it drops such gaps and recomputes
//! canonical lengths.
//!
//! # Examples
//!
//! ```
//! use ragged_core::{Index, RaggedBuffer};
//!
//! let feats = RaggedBuffer::from_parts((0..24).map(|x| x as f32).collect(), 4, vec![3, 2, 1]).unwrap();
//!
//! let selection = feats.select(1.., 1..10, 0).unwrap();
//! assert!(selection.is_pending());
//! assert_eq!(selection.lengths(), vec![1, 0]);
//!
//! let owned = selection.materialize();
//! assert_eq!(owned.lengths(), vec![1, 0]);
//! assert_eq!(owned.as_slice(), &[16.0]);
//! ```

use scirs2_core::ndarray_ext::Array2;

use crate::buffer::RaggedBuffer;
use crate::error::RaggedResult;
use crate::index::{Index, ItemPositions};
use crate::scalar::Element;
use crate::shape::RaggedShape;
use crate::view::RaggedView;

/// State of the item axis of a [`Selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSelection {
    /// Every item of each selected sequence; lengths are canonical.
    Canonical,
    /// Requested positions not yet resolved against sequence lengths.
    Pending(ItemPositions),
}

/// Result of indexing all three axes of a buffer.
#[derive(Debug, Clone)]
pub struct Selection<'a, T> {
    view: RaggedView<'a, T>,
    items: ItemSelection,
}

impl<T: Element> RaggedBuffer<T> {
    /// Select along the batch, item and feature axes at once.
    ///
    /// Each axis is independent, so evaluation order does not matter.
    /// Item-axis positions past a sequence's end select nothing from that
    /// sequence instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an index error for out-of-range batch or feature positions
    /// and an invalid argument error for a zero step.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::{Index, RaggedBuffer};
    ///
    /// let entities = RaggedBuffer::from_parts(
    ///     vec![
    ///         10.0f32, 3.0, 10.0, 1.0, 11.0, 4.0, 11.0, 2.0, 12.0, 5.0, 12.0, 3.0,
    ///         13.0, 4.0, 13.0, 6.0, 14.0, 5.0, 14.0, 7.0, 15.0, 18.0, 15.0, 16.0,
    ///     ],
    ///     4,
    ///     vec![3, 0, 2, 1],
    /// )
    /// .unwrap();
    ///
    /// let sliced = entities.select(vec![1, 0], Index::stepped(0, 3, 2), vec![0, 3, 2]).unwrap();
    /// let owned = sliced.materialize();
    /// assert_eq!(owned.lengths(), vec![0, 2]);
    /// assert_eq!(owned.as_slice(), &[10.0, 1.0, 10.0, 12.0, 3.0, 12.0]);
    /// ```
    pub fn select(
        &self,
        batch: impl Into<Index>,
        items: impl Into<Index>,
        features: impl Into<Index>,
    ) -> RaggedResult<Selection<'_, T>> {
        let items = items.into();
        let view = self.view(batch, features)?;
        let items = if items.is_full() {
            ItemSelection::Canonical
        } else {
            ItemSelection::Pending(items.item_positions()?)
        };
        Ok(Selection { view, items })
    }
}

impl<'a, T: Element> Selection<'a, T> {
    /// Whether item-axis positions are still unresolved.
    pub fn is_pending(&self) -> bool {
        matches!(self.items, ItemSelection::Pending(_))
    }

    /// Item-axis state.
    pub fn item_selection(&self) -> &ItemSelection {
        &self.items
    }

    /// The underlying batch/feature view when the item axis is whole.
    pub fn as_view(&self) -> Option<&RaggedView<'a, T>> {
        match self.items {
            ItemSelection::Canonical => Some(&self.view),
            ItemSelection::Pending(_) => None,
        }
    }

    /// Number of selected sequences.
    pub fn size0(&self) -> usize {
        self.view.size0()
    }

    /// Number of selected feature columns.
    pub fn size2(&self) -> usize {
        self.view.size2()
    }

    /// Lengths the selection has once materialised.
    pub fn lengths(&self) -> Vec<usize> {
        let lengths = self.view.lengths();
        match &self.items {
            ItemSelection::Canonical => lengths,
            ItemSelection::Pending(positions) => lengths
                .into_iter()
                .map(|length| positions.count_within(length))
                .collect(),
        }
    }

    /// Copy the selection into an owned buffer with canonical lengths.
    pub fn materialize(&self) -> RaggedBuffer<T> {
        let positions = match &self.items {
            ItemSelection::Canonical => return self.view.materialize(),
            ItemSelection::Pending(positions) => positions,
        };
        let width = self.view.size2();
        let mut data = Vec::new();
        let mut sequences = Vec::with_capacity(self.view.size0());
        let mut start = 0;
        for sequence in 0..self.view.size0() {
            let range = self
                .view
                .item_range(sequence)
                .expect("view batch positions are in range");
            let selected = positions.within(range.len());
            for &position in &selected {
                data.extend((0..width).map(|c| self.view.value(range.start + position, c)));
            }
            sequences.push(start..start + selected.len());
            start += selected.len();
        }
        tracing::debug!(
            sequences = sequences.len(),
            items = start,
            features = width,
            "materialized selection"
        );
        RaggedBuffer::from_raw(data, sequences, width)
    }

    /// Flat `[items, features]` copy of the selection.
    pub fn to_array(&self) -> Array2<T> {
        self.materialize().as_array().to_owned()
    }
}

impl<T: Element> RaggedShape for Selection<'_, T> {
    fn size0(&self) -> usize {
        Selection::size0(self)
    }

    fn lengths(&self) -> Vec<usize> {
        Selection::lengths(self)
    }

    fn size2(&self) -> usize {
        Selection::size2(self)
    }
}

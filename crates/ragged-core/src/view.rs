//! Aliasing views over a ragged buffer.
//!
//! A view selects sequences along the batch axis and columns along the
//! feature axis without copying. Items within each selected sequence are
//! always kept whole, so a view's lengths are those of its source
//! sequences.
//!
//! - [`RaggedView`] borrows its source immutably and is read-only.
//! - [`RaggedViewMut`] borrows its source mutably; in-place operations on it
//!   write straight into the selected columns of the source buffer.
//!
//! Write-through is only reachable through [`RaggedViewMut`], and the
//! borrow checker rules out a mutable view coexisting with any other access
//! to the same buffer.
//!
//! # Examples
//!
//! ```
//! use ragged_core::{Index, RaggedBuffer};
//!
//! let mut entities = RaggedBuffer::from_parts(
//!     vec![10.0f32, 3.0, 10.0, 1.0, 11.0, 4.0, 11.0, 2.0],
//!     4,
//!     vec![2],
//! )
//! .unwrap();
//!
//! let mut xy = entities.view_mut(Index::All, [1, 3]).unwrap();
//! xy.sub_scalar(1.0);
//!
//! assert_eq!(entities.as_slice(), &[10.0, 2.0, 10.0, 0.0, 11.0, 3.0, 11.0, 1.0]);
//! ```

use std::ops::Range;

use crate::buffer::RaggedBuffer;
use crate::error::RaggedResult;
use crate::index::{Columns, Index};
use crate::scalar::Element;
use crate::shape::RaggedShape;

/// Read-only view over selected sequences and columns of a buffer.
#[derive(Debug, Clone)]
pub struct RaggedView<'a, T> {
    source: &'a RaggedBuffer<T>,
    batch: Vec<usize>,
    columns: Columns,
}

/// Mutable view writing through to selected sequences and columns of a
/// buffer.
#[derive(Debug)]
pub struct RaggedViewMut<'a, T> {
    source: &'a mut RaggedBuffer<T>,
    batch: Vec<usize>,
    columns: Columns,
}

/// Anything that can be read through a [`RaggedView`].
pub trait AsView<T> {
    fn as_view(&self) -> RaggedView<'_, T>;
}

impl<T: Element> RaggedBuffer<T> {
    /// Read-only view over the given batch and feature selections.
    ///
    /// # Errors
    ///
    /// Returns an index error if a batch or feature position is out of range.
    pub fn view(
        &self,
        batch: impl Into<Index>,
        features: impl Into<Index>,
    ) -> RaggedResult<RaggedView<'_, T>> {
        let batch = batch.into().resolve(0, self.size0())?;
        let columns = features.into().resolve_columns(self.features)?;
        Ok(RaggedView {
            source: self,
            batch,
            columns,
        })
    }

    /// Mutable view over the given batch and feature selections.
    ///
    /// # Errors
    ///
    /// Returns an index error if a batch or feature position is out of range.
    pub fn view_mut(
        &mut self,
        batch: impl Into<Index>,
        features: impl Into<Index>,
    ) -> RaggedResult<RaggedViewMut<'_, T>> {
        let batch = batch.into().resolve(0, self.size0())?;
        let columns = features.into().resolve_columns(self.features)?;
        Ok(RaggedViewMut {
            source: self,
            batch,
            columns,
        })
    }

    /// Mutable view over the whole buffer.
    pub(crate) fn full_view_mut(&mut self) -> RaggedViewMut<'_, T> {
        let batch = (0..self.size0()).collect();
        let columns = (0..self.features).collect();
        RaggedViewMut {
            source: self,
            batch,
            columns,
        }
    }
}

impl<'a, T: Element> RaggedView<'a, T> {
    /// The buffer this view reads from.
    pub fn source(&self) -> &'a RaggedBuffer<T> {
        self.source
    }

    /// Source sequence index of every view sequence.
    pub fn batch(&self) -> &[usize] {
        &self.batch
    }

    /// Source column of every view column.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Number of sequences in the view.
    pub fn size0(&self) -> usize {
        self.batch.len()
    }

    /// Length of every sequence in the view.
    pub fn lengths(&self) -> Vec<usize> {
        self.batch
            .iter()
            .map(|&b| self.source.ranges()[b].len())
            .collect()
    }

    /// Number of columns in the view.
    pub fn size2(&self) -> usize {
        self.columns.len()
    }

    /// Value at `(sequence, item, column)` in view coordinates.
    pub fn get(&self, sequence: usize, item: usize, column: usize) -> Option<T> {
        let range = self.item_range(sequence)?;
        let &source_column = self.columns.get(column)?;
        if item >= range.len() {
            return None;
        }
        Some(self.source.item(range.start + item)[source_column])
    }

    /// Copy the viewed sequences and columns into an owned buffer.
    pub fn materialize(&self) -> RaggedBuffer<T> {
        let mut data = Vec::with_capacity(self.items() * self.columns.len());
        let mut sequences = Vec::with_capacity(self.batch.len());
        let mut start = 0;
        for &b in &self.batch {
            let range = self.source.ranges()[b].clone();
            for item in range.clone() {
                let row = self.source.item(item);
                data.extend(self.columns.iter().map(|&c| row[c]));
            }
            sequences.push(start..start + range.len());
            start += range.len();
        }
        RaggedBuffer::from_raw(data, sequences, self.columns.len())
    }

    /// Source item range of view sequence `sequence`.
    #[inline]
    pub(crate) fn item_range(&self, sequence: usize) -> Option<Range<usize>> {
        let &b = self.batch.get(sequence)?;
        self.source.ranges().get(b).cloned()
    }

    /// Value of view column `column` for source item `item`.
    #[inline]
    pub(crate) fn value(&self, item: usize, column: usize) -> T {
        self.source.item(item)[self.columns[column]]
    }
}

impl<'a, T: Element> RaggedViewMut<'a, T> {
    /// Source sequence index of every view sequence.
    pub fn batch(&self) -> &[usize] {
        &self.batch
    }

    /// Source column of every view column.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Number of sequences in the view.
    pub fn size0(&self) -> usize {
        self.batch.len()
    }

    /// Length of every sequence in the view.
    pub fn lengths(&self) -> Vec<usize> {
        self.as_view().lengths()
    }

    /// Number of columns in the view.
    pub fn size2(&self) -> usize {
        self.columns.len()
    }

    /// Value at `(sequence, item, column)` in view coordinates.
    pub fn get(&self, sequence: usize, item: usize, column: usize) -> Option<T> {
        self.as_view().get(sequence, item, column)
    }

    /// Overwrite the value at `(sequence, item, column)` in view coordinates,
    /// writing through to the source. Returns `false` if out of range.
    pub fn set(&mut self, sequence: usize, item: usize, column: usize, value: T) -> bool {
        let Some(range) = self.item_range(sequence) else {
            return false;
        };
        if item >= range.len() || column >= self.columns.len() {
            return false;
        }
        self.write(range.start + item, column, value);
        true
    }

    /// Copy the viewed sequences and columns into an owned buffer.
    pub fn materialize(&self) -> RaggedBuffer<T> {
        self.as_view().materialize()
    }

    #[inline]
    pub(crate) fn item_range(&self, sequence: usize) -> Option<Range<usize>> {
        let &b = self.batch.get(sequence)?;
        self.source.ranges().get(b).cloned()
    }

    #[inline]
    pub(crate) fn value(&self, item: usize, column: usize) -> T {
        self.source.item(item)[self.columns[column]]
    }

    /// Write view column `column` of source item `item`.
    #[inline]
    pub(crate) fn write(&mut self, item: usize, column: usize, value: T) {
        let features = self.source.features;
        self.source.data[item * features + self.columns[column]] = value;
    }
}

impl<T: Element> AsView<T> for RaggedBuffer<T> {
    fn as_view(&self) -> RaggedView<'_, T> {
        RaggedView {
            source: self,
            batch: (0..self.size0()).collect(),
            columns: (0..self.features).collect(),
        }
    }
}

impl<T: Element> AsView<T> for RaggedView<'_, T> {
    fn as_view(&self) -> RaggedView<'_, T> {
        self.clone()
    }
}

impl<T: Element> AsView<T> for RaggedViewMut<'_, T> {
    fn as_view(&self) -> RaggedView<'_, T> {
        RaggedView {
            source: &*self.source,
            batch: self.batch.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<T: Element> RaggedShape for RaggedView<'_, T> {
    fn size0(&self) -> usize {
        RaggedView::size0(self)
    }

    fn lengths(&self) -> Vec<usize> {
        RaggedView::lengths(self)
    }

    fn size2(&self) -> usize {
        RaggedView::size2(self)
    }
}

impl<T: Element> RaggedShape for RaggedViewMut<'_, T> {
    fn size0(&self) -> usize {
        RaggedViewMut::size0(self)
    }

    fn lengths(&self) -> Vec<usize> {
        RaggedViewMut::lengths(self)
    }

    fn size2(&self) -> usize {
        RaggedViewMut::size2(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> RaggedBuffer<f32> {
        RaggedBuffer::from_parts(
            vec![
                10.0, 3.0, 10.0, 1.0, //
                11.0, 4.0, 11.0, 2.0, //
                12.0, 5.0, 12.0, 3.0, //
                13.0, 6.0, 13.0, 4.0, //
                14.0, 7.0, 14.0, 5.0, //
                15.0, 8.0, 15.0, 6.0,
            ],
            4,
            vec![3, 0, 2, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_view_shape_and_values() {
        let buffer = entities();
        let view = buffer.view(Index::All, [1, 3]).unwrap();
        assert_eq!(view.size0(), 4);
        assert_eq!(view.lengths(), vec![3, 0, 2, 1]);
        assert_eq!(view.size2(), 2);
        assert_eq!(view.get(2, 1, 1), Some(5.0));
        assert_eq!(view.get(1, 0, 0), None);
        assert_eq!(view.get(0, 0, 2), None);
    }

    #[test]
    fn test_view_materialize() {
        let buffer = entities();
        let view = buffer.view(vec![3, 0], 1..3).unwrap();
        let owned = view.materialize();
        assert_eq!(owned.lengths(), vec![1, 3]);
        assert_eq!(
            owned.as_slice(),
            &[8.0, 15.0, 3.0, 10.0, 4.0, 11.0, 5.0, 12.0]
        );
    }

    #[test]
    fn test_view_out_of_range() {
        let buffer = entities();
        assert!(buffer.view(4, Index::All).is_err());
        assert!(buffer.view(Index::All, [0, 4]).is_err());
    }

    #[test]
    fn test_view_mut_writes_through() {
        let mut buffer = entities();
        let mut view = buffer.view_mut(2, [3]).unwrap();
        assert!(view.set(0, 1, 0, -1.0));
        assert!(!view.set(0, 2, 0, -1.0));
        assert_eq!(buffer.sequence(2).unwrap()[[1, 3]], -1.0);
        assert_eq!(buffer.sequence(2).unwrap()[[1, 1]], 7.0);
    }

    #[test]
    fn test_as_view_of_buffer() {
        let buffer = entities();
        let view = buffer.as_view();
        assert_eq!(view.materialize(), buffer);
    }
}

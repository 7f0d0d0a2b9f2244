//! Ragged buffer storage.
//!
//! A [`RaggedBuffer`] holds a batch of variable-length sequences whose items
//! are fixed-width feature rows. All items live in one flat row-major
//! buffer; each sequence is a contiguous range of item positions into it.
//!
//! # Layout
//!
//! For a buffer with `F` features and sequence lengths `[l0, l1, ...]`:
//! - `data`: `Vec<T>` of length `sum(l) * F`, items in sequence order
//! - `sequences`: `Vec<Range<usize>>`, item range of each sequence
//! - `features`: `F`, fixed for the lifetime of the buffer
//!
//! Item counts are read from the ranges rather than `data.len() / F`, so a
//! zero-feature buffer still knows how many (empty) items it holds.
//!
//! # Examples
//!
//! ```
//! use ragged_core::RaggedBuffer;
//! use scirs2_core::ndarray_ext::array;
//!
//! let mut buffer = RaggedBuffer::<f32>::new(3);
//! buffer.push(array![[2.0, 3.0, 1.0], [1.0, 2.0, 3.0]].view()).unwrap();
//! buffer.push_empty();
//!
//! assert_eq!(buffer.size0(), 2);
//! assert_eq!(buffer.lengths(), vec![2, 0]);
//! assert_eq!(buffer.items(), 2);
//! assert_eq!(buffer.len(), 6);
//! ```

use std::ops::Range;

use scirs2_core::ndarray_ext::{ArrayView, ArrayView2, IxDyn};

use crate::error::{ArgumentError, RaggedError, RaggedResult, ShapeMismatchError};
use crate::scalar::Element;
use crate::shape::RaggedShape;

/// Batch of variable-length sequences of fixed-width feature rows.
///
/// With the `serde` feature the buffer is serialized as
/// `{ data, features, lengths }` and deserialized through
/// [`RaggedBuffer::from_parts`], so malformed payloads are rejected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "RawRaggedBuffer<T>",
        into = "RawRaggedBuffer<T>",
        bound(
            serialize = "T: Element + serde::Serialize",
            deserialize = "T: Element + serde::Deserialize<'de>"
        )
    )
)]
pub struct RaggedBuffer<T> {
    /// Flat item storage, `features` scalars per item
    pub(crate) data: Vec<T>,

    /// Item range of each sequence, contiguous and in order
    pub(crate) sequences: Vec<Range<usize>>,

    /// Feature width of every item
    pub(crate) features: usize,
}

impl<T: Element> RaggedBuffer<T> {
    /// Create an empty buffer with the given feature width.
    pub fn new(features: usize) -> Self {
        Self {
            data: Vec::new(),
            sequences: Vec::new(),
            features,
        }
    }

    /// Assemble a buffer from already-validated parts.
    pub(crate) fn from_raw(data: Vec<T>, sequences: Vec<Range<usize>>, features: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            sequences.last().map_or(0, |r| r.end) * features
        );
        Self {
            data,
            sequences,
            features,
        }
    }

    /// Build a buffer from flat item data and per-sequence lengths.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if `data` is not a whole number of
    /// items, if the total of `lengths` overflows, or if `lengths` does not
    /// sum to the number of items.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::RaggedBuffer;
    ///
    /// let buffer = RaggedBuffer::from_parts(vec![0i64, 0, 1, 2, 0, 5], 1, vec![1, 3, 2]).unwrap();
    /// assert_eq!(buffer.lengths(), vec![1, 3, 2]);
    ///
    /// assert!(RaggedBuffer::from_parts(vec![0i64, 1], 1, vec![3]).is_err());
    /// ```
    pub fn from_parts(data: Vec<T>, features: usize, lengths: Vec<usize>) -> RaggedResult<Self> {
        let sum = total_length(&lengths)?;
        if features == 0 {
            if !data.is_empty() {
                return Err(ArgumentError::FlatLength {
                    len: data.len(),
                    features,
                }
                .into());
            }
        } else {
            if data.len() % features != 0 {
                return Err(ArgumentError::FlatLength {
                    len: data.len(),
                    features,
                }
                .into());
            }
            let total = data.len() / features;
            if sum != total {
                return Err(ArgumentError::LengthSum { total, sum }.into());
            }
        }
        Ok(Self::from_raw(data, ranges_from_lengths(&lengths), features))
    }

    /// Build a buffer from a flat `[items, features]` array and a length
    /// vector as handed over by a host array library.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error for negative lengths, for lengths
    /// whose total overflows, or when the lengths do not sum to the number
    /// of rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::RaggedBuffer;
    /// use scirs2_core::ndarray_ext::array;
    ///
    /// let flat = array![[0i64], [0], [1], [2], [0], [5]];
    /// let buffer = RaggedBuffer::from_flattened(flat.view(), &[1, 3, 2]).unwrap();
    /// assert_eq!(buffer.size1(1).unwrap(), 3);
    /// ```
    pub fn from_flattened(flattened: ArrayView2<'_, T>, lengths: &[i64]) -> RaggedResult<Self> {
        let (total, features) = flattened.dim();
        let mut checked = Vec::with_capacity(lengths.len());
        for (position, &length) in lengths.iter().enumerate() {
            if length < 0 {
                return Err(ArgumentError::NegativeLength { position, length }.into());
            }
            checked.push(length as usize);
        }
        let sum = total_length(&checked)?;
        if sum != total {
            return Err(ArgumentError::LengthSum { total, sum }.into());
        }
        let data: Vec<T> = flattened.iter().copied().collect();
        Ok(Self::from_raw(data, ranges_from_lengths(&checked), features))
    }

    /// Build a buffer from a dense `[batch, items, features]` array; every
    /// sequence gets the same length.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch error if the array is not three-dimensional.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::RaggedBuffer;
    /// use scirs2_core::ndarray_ext::Array3;
    ///
    /// let dense = Array3::<i64>::zeros((4, 2, 3));
    /// let buffer = RaggedBuffer::from_array(dense.view().into_dyn()).unwrap();
    /// assert_eq!(buffer.lengths(), vec![2, 2, 2, 2]);
    /// assert_eq!(buffer.size2(), 3);
    /// ```
    pub fn from_array(array: ArrayView<'_, T, IxDyn>) -> RaggedResult<Self> {
        if array.ndim() != 3 {
            return Err(ShapeMismatchError::Dimensionality {
                expected: 3,
                got: array.ndim(),
            }
            .into());
        }
        let shape = array.shape();
        let (batch, length, features) = (shape[0], shape[1], shape[2]);
        let data: Vec<T> = array.iter().copied().collect();
        Ok(Self::from_raw(
            data,
            ranges_from_lengths(&vec![length; batch]),
            features,
        ))
    }

    /// Append one sequence given as an `[items, features]` array.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch error if the column count differs from the
    /// buffer's feature width, and an invalid argument error if the item
    /// count would overflow. The buffer is left unchanged on error.
    pub fn push(&mut self, rows: ArrayView2<'_, T>) -> RaggedResult<()> {
        let (length, columns) = rows.dim();
        if columns != self.features {
            return Err(RaggedError::features(self.features, columns));
        }
        let start = self.items();
        let end = start
            .checked_add(length)
            .ok_or(ArgumentError::LengthOverflow {
                position: self.size0(),
            })?;
        self.data.extend(rows.iter().copied());
        self.sequences.push(start..end);
        Ok(())
    }

    /// Append a sequence of length 0.
    pub fn push_empty(&mut self) {
        let start = self.items();
        self.sequences.push(start..start);
    }

    /// Append every sequence of `other`.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch error if the feature widths differ, and an
    /// invalid argument error if the combined item count would overflow.
    pub fn extend(&mut self, other: &RaggedBuffer<T>) -> RaggedResult<()> {
        if other.features != self.features {
            return Err(RaggedError::features(self.features, other.features));
        }
        let offset = self.items();
        if offset.checked_add(other.items()).is_none() {
            return Err(ArgumentError::LengthOverflow {
                position: self.size0(),
            }
            .into());
        }
        self.data.extend_from_slice(&other.data);
        self.sequences.extend(
            other
                .sequences
                .iter()
                .map(|r| r.start + offset..r.end + offset),
        );
        Ok(())
    }

    /// Remove all sequences, keeping the feature width.
    pub fn clear(&mut self) {
        self.data.clear();
        self.sequences.clear();
    }

    /// Number of sequences.
    pub fn size0(&self) -> usize {
        self.sequences.len()
    }

    /// Length of sequence `i`.
    ///
    /// # Errors
    ///
    /// Returns an index error if `i >= size0()`.
    pub fn size1(&self, i: usize) -> RaggedResult<usize> {
        self.sequences
            .get(i)
            .map(|r| r.len())
            .ok_or_else(|| RaggedError::out_of_bounds(0, i, self.size0()))
    }

    /// Length of every sequence.
    pub fn lengths(&self) -> Vec<usize> {
        self.sequences.iter().map(|r| r.len()).collect()
    }

    /// Feature width.
    pub fn size2(&self) -> usize {
        self.features
    }

    /// Total number of items.
    pub fn items(&self) -> usize {
        self.sequences.last().map_or(0, |r| r.end)
    }

    /// Total number of scalars.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no scalars.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat `[items, features]` view of all items.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::RaggedBuffer;
    /// use scirs2_core::ndarray_ext::Array2;
    ///
    /// let mut buffer = RaggedBuffer::<f32>::new(0);
    /// buffer.push(Array2::zeros((1, 0)).view()).unwrap();
    /// buffer.push(Array2::zeros((0, 0)).view()).unwrap();
    /// assert_eq!(buffer.as_array().dim(), (1, 0));
    /// ```
    pub fn as_array(&self) -> ArrayView2<'_, T> {
        // `data.len() == items * features` holds for every constructed buffer.
        ArrayView2::from_shape((self.items(), self.features), &self.data)
            .expect("flat data always matches items * features")
    }

    /// Flat scalar storage in item order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// `[length, features]` view of sequence `i`.
    ///
    /// # Errors
    ///
    /// Returns an index error if `i >= size0()`.
    pub fn sequence(&self, i: usize) -> RaggedResult<ArrayView2<'_, T>> {
        let range = self.range(i)?;
        let items = &self.data[range.start * self.features..range.end * self.features];
        Ok(ArrayView2::from_shape((range.len(), self.features), items)
            .expect("sequence slice always matches length * features"))
    }

    /// Copy sequence `i` into a new single-sequence buffer.
    ///
    /// # Errors
    ///
    /// Returns an index error if `i >= size0()`.
    pub fn get_sequence(&self, i: usize) -> RaggedResult<Self> {
        self.gather(&[i])
    }

    /// Copy the sequences at `indices`, in that order, into a new buffer.
    ///
    /// Indices may repeat, in which case the sequence is replicated.
    ///
    /// # Errors
    ///
    /// Returns an index error if any index is `>= size0()`. Nothing is
    /// copied in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::RaggedBuffer;
    ///
    /// let buffer = RaggedBuffer::from_parts(vec![1i64, 2, 3, 4], 1, vec![1, 0, 3]).unwrap();
    /// let gathered = buffer.gather(&[2, 0, 0]).unwrap();
    /// assert_eq!(gathered.lengths(), vec![3, 1, 1]);
    /// assert_eq!(gathered.as_slice(), &[2, 3, 4, 1, 1]);
    /// ```
    pub fn gather(&self, indices: &[usize]) -> RaggedResult<Self> {
        let mut total = 0;
        for &i in indices {
            total += self.range(i)?.len();
        }
        let mut data = Vec::with_capacity(total * self.features);
        let mut sequences = Vec::with_capacity(indices.len());
        let mut start = 0;
        for &i in indices {
            let range = &self.sequences[i];
            data.extend_from_slice(
                &self.data[range.start * self.features..range.end * self.features],
            );
            sequences.push(start..start + range.len());
            start += range.len();
        }
        tracing::debug!(sequences = indices.len(), items = total, "gathered sequences");
        Ok(Self::from_raw(data, sequences, self.features))
    }

    /// Item range of sequence `i`.
    pub(crate) fn range(&self, i: usize) -> RaggedResult<Range<usize>> {
        self.sequences
            .get(i)
            .cloned()
            .ok_or_else(|| RaggedError::out_of_bounds(0, i, self.size0()))
    }

    /// Item ranges of all sequences.
    pub(crate) fn ranges(&self) -> &[Range<usize>] {
        &self.sequences
    }

    /// Scalars of item `item` (a flat item position).
    #[inline]
    pub(crate) fn item(&self, item: usize) -> &[T] {
        &self.data[item * self.features..(item + 1) * self.features]
    }
}

impl<T: Element> RaggedShape for RaggedBuffer<T> {
    fn size0(&self) -> usize {
        RaggedBuffer::size0(self)
    }

    fn lengths(&self) -> Vec<usize> {
        RaggedBuffer::lengths(self)
    }

    fn size2(&self) -> usize {
        RaggedBuffer::size2(self)
    }

    fn size1(&self, i: usize) -> RaggedResult<usize> {
        RaggedBuffer::size1(self, i)
    }

    fn items(&self) -> usize {
        RaggedBuffer::items(self)
    }

    fn len(&self) -> usize {
        RaggedBuffer::len(self)
    }
}

/// Wire form of a [`RaggedBuffer`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawRaggedBuffer<T> {
    data: Vec<T>,
    features: usize,
    lengths: Vec<usize>,
}

#[cfg(feature = "serde")]
impl<T: Element> TryFrom<RawRaggedBuffer<T>> for RaggedBuffer<T> {
    type Error = RaggedError;

    fn try_from(raw: RawRaggedBuffer<T>) -> RaggedResult<Self> {
        RaggedBuffer::from_parts(raw.data, raw.features, raw.lengths)
    }
}

#[cfg(feature = "serde")]
impl<T: Element> From<RaggedBuffer<T>> for RawRaggedBuffer<T> {
    fn from(buffer: RaggedBuffer<T>) -> Self {
        let lengths = buffer.lengths();
        RawRaggedBuffer {
            data: buffer.data,
            features: buffer.features,
            lengths,
        }
    }
}

/// Total of `lengths`, failing instead of wrapping on overflow.
pub(crate) fn total_length(lengths: &[usize]) -> RaggedResult<usize> {
    lengths
        .iter()
        .enumerate()
        .try_fold(0usize, |total, (position, &length)| {
            total.checked_add(length).ok_or(ArgumentError::LengthOverflow { position })
        })
        .map_err(RaggedError::from)
}

/// Contiguous item ranges for the given sequence lengths.
///
/// Callers validate the total with [`total_length`] first.
pub(crate) fn ranges_from_lengths(lengths: &[usize]) -> Vec<Range<usize>> {
    let mut start = 0;
    lengths
        .iter()
        .map(|&length| {
            let range = start..start + length;
            start += length;
            range
        })
        .collect()
}

//! Dense packing of bucketed items.
//!
//! [`RaggedBuffer::padpack`] reads a single-column `i64` buffer whose values
//! are per-item bucket identifiers and lays every item out in a dense
//! `[rows, capacity]` grid, where `capacity` is the size of the largest
//! bucket. Buckets are visited in ascending identifier order and placed
//! first-fit into rows, so buckets smaller than the capacity share rows.
//!
//! Pad cells carry index `0` and batch `NaN`. Index `0` is also a real
//! item, so occupancy must be read from [`PadPack::occupancy`] or
//! [`PadPack::mask`], never from the index values.
//!
//! # Examples
//!
//! ```
//! use ragged_core::RaggedBuffer;
//!
//! let ids = RaggedBuffer::from_parts(vec![0i64, 1, 0, 1, 1], 1, vec![3, 2]).unwrap();
//! let packed = ids.padpack().unwrap().expect("packable");
//!
//! assert_eq!(packed.shape, (2, 3));
//! assert_eq!(packed.index, vec![0, 2, 0, 1, 3, 4]);
//! assert_eq!(packed.occupancy(), vec![2, 3]);
//! assert_eq!(packed.inverse_index, vec![0, 3, 1, 4, 5]);
//! ```

use std::collections::BTreeMap;

use scirs2_core::ndarray_ext::{Array1, Array2};

use crate::buffer::RaggedBuffer;
use crate::error::{ArgumentError, RaggedResult};

/// Packed layout produced by [`RaggedBuffer::padpack`].
///
/// Deserialized layouts are checked with [`PadPack::validate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawPadPack", into = "RawPadPack")
)]
pub struct PadPack {
    /// Row-major flat item index per cell; `0` in pad cells.
    pub index: Vec<i64>,
    /// Row-major bucket identifier per cell as `f32`; `NaN` in pad cells.
    pub batch: Vec<f32>,
    /// Packed cell position of every item, in flat item order.
    pub inverse_index: Vec<i64>,
    /// `(rows, capacity)` of the packed grid.
    pub shape: (usize, usize),
}

impl PadPack {
    /// Check that the grid, the index and the inverse index agree.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if `index` or `batch` does not
    /// cover the grid, or if some item's cell is outside the grid or does
    /// not point back at that item.
    pub fn validate(&self) -> RaggedResult<()> {
        let (rows, capacity) = self.shape;
        let cells = rows
            .checked_mul(capacity)
            .ok_or(ArgumentError::PackLayout {
                reason: "grid size overflows",
            })?;
        if self.index.len() != cells || self.batch.len() != cells {
            return Err(ArgumentError::PackLayout {
                reason: "index and batch must cover rows * capacity cells",
            }
            .into());
        }
        for (item, &cell) in self.inverse_index.iter().enumerate() {
            let valid = usize::try_from(cell)
                .ok()
                .filter(|&cell| cell < cells)
                .is_some_and(|cell| self.index[cell] == item as i64);
            if !valid {
                return Err(ArgumentError::PackLayout {
                    reason: "inverse index must point at cells holding the same item",
                }
                .into());
            }
        }
        Ok(())
    }

    /// Number of occupied cells in each row.
    ///
    /// Rows are filled from slot 0 without gaps.
    pub fn occupancy(&self) -> Vec<usize> {
        let (rows, capacity) = self.shape;
        let mut occupancy = vec![0; rows];
        for &cell in &self.inverse_index {
            occupancy[cell as usize / capacity] += 1;
        }
        occupancy
    }

    /// Validity of every cell.
    pub fn mask(&self) -> Array2<bool> {
        let (rows, capacity) = self.shape;
        let mut mask = Array2::from_elem((rows, capacity), false);
        for &cell in &self.inverse_index {
            let cell = cell as usize;
            mask[[cell / capacity, cell % capacity]] = true;
        }
        mask
    }

    /// Flat item indices as a `[rows, capacity]` array.
    pub fn index_array(&self) -> Array2<i64> {
        Array2::from_shape_fn(self.shape, |(r, c)| self.index[r * self.shape.1 + c])
    }

    /// Bucket identifiers as a `[rows, capacity]` array.
    pub fn batch_array(&self) -> Array2<f32> {
        Array2::from_shape_fn(self.shape, |(r, c)| self.batch[r * self.shape.1 + c])
    }

    /// Packed cell positions in flat item order.
    pub fn inverse_index_array(&self) -> Array1<i64> {
        Array1::from(self.inverse_index.clone())
    }
}

/// Wire form of a [`PadPack`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawPadPack {
    index: Vec<i64>,
    batch: Vec<f32>,
    inverse_index: Vec<i64>,
    shape: (usize, usize),
}

#[cfg(feature = "serde")]
impl TryFrom<RawPadPack> for PadPack {
    type Error = crate::error::RaggedError;

    fn try_from(raw: RawPadPack) -> RaggedResult<Self> {
        let packed = PadPack {
            index: raw.index,
            batch: raw.batch,
            inverse_index: raw.inverse_index,
            shape: raw.shape,
        };
        packed.validate()?;
        Ok(packed)
    }
}

#[cfg(feature = "serde")]
impl From<PadPack> for RawPadPack {
    fn from(packed: PadPack) -> Self {
        RawPadPack {
            index: packed.index,
            batch: packed.batch,
            inverse_index: packed.inverse_index,
            shape: packed.shape,
        }
    }
}

impl RaggedBuffer<i64> {
    /// Pack items into a dense grid grouped by bucket identifier.
    ///
    /// Returns `Ok(None)` when the buffer is not packable: the feature width
    /// is not 1 or there are no items.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if an identifier is negative.
    pub fn padpack(&self) -> RaggedResult<Option<PadPack>> {
        if self.features != 1 || self.items() == 0 {
            return Ok(None);
        }

        let mut buckets: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (position, &value) in self.data.iter().enumerate() {
            if value < 0 {
                return Err(ArgumentError::NegativeBucket { position, value }.into());
            }
            buckets.entry(value).or_default().push(position);
        }
        let capacity = buckets.values().map(Vec::len).max().unwrap_or(0);

        // First-fit: each row holds (bucket, members) in placement order.
        let mut rows: Vec<(usize, Vec<(i64, &[usize])>)> = Vec::new();
        for (&bucket, members) in &buckets {
            match rows
                .iter_mut()
                .find(|(used, _)| *used + members.len() <= capacity)
            {
                Some((used, groups)) => {
                    *used += members.len();
                    groups.push((bucket, members.as_slice()));
                }
                None => rows.push((members.len(), vec![(bucket, members.as_slice())])),
            }
        }

        let cells = rows.len() * capacity;
        let mut index = vec![0; cells];
        let mut batch = vec![f32::NAN; cells];
        let mut inverse_index = vec![0; self.items()];
        for (row, (_, groups)) in rows.iter().enumerate() {
            let mut cell = row * capacity;
            for &(bucket, members) in groups {
                for &item in members {
                    index[cell] = item as i64;
                    batch[cell] = bucket as f32;
                    inverse_index[item] = cell as i64;
                    cell += 1;
                }
            }
        }

        tracing::debug!(
            items = self.items(),
            buckets = buckets.len(),
            rows = rows.len(),
            capacity,
            "packed buckets"
        );
        Ok(Some(PadPack {
            index,
            batch,
            inverse_index,
            shape: (rows.len(), capacity),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use scirs2_core::ndarray_ext::array;

    fn bucket_ids() -> RaggedBuffer<i64> {
        let mut ids = RaggedBuffer::new(1);
        ids.push(array![[0i64], [0], [0], [0], [0], [0]].view()).unwrap();
        ids.push(array![[1i64], [1], [1]].view()).unwrap();
        ids.push(array![[2i64], [2], [2], [2]].view()).unwrap();
        ids.push_empty();
        ids.push(array![[4i64]].view()).unwrap();
        ids
    }

    #[test]
    fn test_padpack_reference_layout() {
        let packed = bucket_ids().padpack().unwrap().unwrap();
        assert_eq!(packed.shape, (3, 6));
        assert_eq!(
            packed.index_array(),
            array![
                [0, 1, 2, 3, 4, 5],
                [6, 7, 8, 13, 0, 0],
                [9, 10, 11, 12, 0, 0]
            ]
        );
        assert_eq!(
            packed.inverse_index,
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 13, 14, 15, 9]
        );

        let batch = packed.batch_array();
        assert_eq!(batch.row(0).to_vec(), vec![0.0; 6]);
        assert_eq!(
            [batch[[1, 0]], batch[[1, 1]], batch[[1, 2]], batch[[1, 3]]],
            [1.0, 1.0, 1.0, 4.0]
        );
        assert_eq!(
            [batch[[2, 0]], batch[[2, 1]], batch[[2, 2]], batch[[2, 3]]],
            [2.0; 4]
        );
        assert!(batch[[1, 4]].is_nan() && batch[[1, 5]].is_nan());
        assert!(batch[[2, 4]].is_nan() && batch[[2, 5]].is_nan());
    }

    #[test]
    fn test_padpack_occupancy() {
        let packed = bucket_ids().padpack().unwrap().unwrap();
        assert_eq!(packed.occupancy(), vec![6, 4, 4]);
        let mask = packed.mask();
        assert!(mask[[1, 3]]);
        assert!(!mask[[1, 4]]);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 14);
    }

    #[test]
    fn test_padpack_scatter_restores_values() {
        let ids = bucket_ids();
        let packed = ids.padpack().unwrap().unwrap();
        for (item, &cell) in packed.inverse_index.iter().enumerate() {
            assert_eq!(packed.batch[cell as usize], ids.as_slice()[item] as f32);
            assert_eq!(packed.index[cell as usize], item as i64);
        }
    }

    #[test]
    fn test_padpack_unavailable() {
        assert_eq!(RaggedBuffer::<i64>::new(1).padpack(), Ok(None));
        let wide = RaggedBuffer::from_parts(vec![0i64, 1], 2, vec![1]).unwrap();
        assert_eq!(wide.padpack(), Ok(None));
        let mut empty_sequences = RaggedBuffer::<i64>::new(1);
        empty_sequences.push_empty();
        assert_eq!(empty_sequences.padpack(), Ok(None));
    }

    #[test]
    fn test_validate_rejects_inconsistent_layouts() {
        let packed = bucket_ids().padpack().unwrap().unwrap();
        assert_eq!(packed.validate(), Ok(()));

        let zero_capacity = PadPack {
            index: vec![],
            batch: vec![],
            inverse_index: vec![0],
            shape: (1, 0),
        };
        assert_eq!(zero_capacity.validate().unwrap_err().kind(), ErrorKind::InvalidArgument);

        let mut crossed = packed.clone();
        crossed.inverse_index.swap(0, 1);
        assert!(crossed.validate().is_err());

        let mut short = packed;
        short.batch.pop();
        assert!(short.validate().is_err());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde_roundtrip_and_rejection() {
        let ids = RaggedBuffer::from_parts(vec![0i64, 1, 0, 1], 1, vec![1, 3]).unwrap();
        let packed = ids.padpack().unwrap().unwrap();
        let json = serde_json::to_string(&packed).unwrap();
        let restored: PadPack = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, packed);

        let zero_capacity = r#"{"index":[],"batch":[],"inverse_index":[0],"shape":[1,0]}"#;
        assert!(serde_json::from_str::<PadPack>(zero_capacity).is_err());
    }

    #[test]
    fn test_padpack_negative_bucket() {
        let ids = RaggedBuffer::from_parts(vec![0i64, -1], 1, vec![2]).unwrap();
        assert_eq!(ids.padpack().unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}

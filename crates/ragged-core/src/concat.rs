//! Concatenation along any of the three axes.
//!
//! - **Axis 0** appends whole sequences in list order.
//! - **Axis 1** joins, for every batch position, the sequences at that
//!   position across all inputs.
//! - **Axis 2** joins feature vectors item by item. Inputs with a single
//!   item at some position broadcast that item across the other inputs'
//!   items there.
//!
//! # Examples
//!
//! ```
//! use ragged_core::RaggedBuffer;
//!
//! let entities = RaggedBuffer::from_parts(vec![1.0f32, 2.0, 3.0], 1, vec![2, 1]).unwrap();
//! let global = RaggedBuffer::from_parts(vec![10.0f32, 20.0], 1, vec![1, 1]).unwrap();
//!
//! let joined = RaggedBuffer::cat(&[&entities, &global], 2).unwrap();
//! assert_eq!(joined.size2(), 2);
//! assert_eq!(joined.as_slice(), &[1.0, 10.0, 2.0, 10.0, 3.0, 20.0]);
//! ```

use crate::buffer::{total_length, RaggedBuffer};
use crate::error::{ArgumentError, RaggedError, RaggedResult};
use crate::scalar::Element;

impl<T: Element> RaggedBuffer<T> {
    /// Concatenate `buffers` along `axis`.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error for an empty list or an axis
    /// above 2, and a shape mismatch error when the inputs disagree on a
    /// dimension the axis requires to be equal.
    pub fn cat(buffers: &[&RaggedBuffer<T>], axis: usize) -> RaggedResult<Self> {
        let Some((first, rest)) = buffers.split_first() else {
            return Err(ArgumentError::EmptyInput { operation: "cat" }.into());
        };
        let result = match axis {
            0 => cat_batch(first, rest),
            1 => cat_items(first, rest),
            2 => cat_features(first, rest),
            _ => {
                return Err(ArgumentError::InvalidAxis {
                    operation: "cat",
                    axis,
                }
                .into())
            }
        }?;
        tracing::debug!(
            inputs = buffers.len(),
            axis,
            sequences = result.size0(),
            items = result.items(),
            features = result.size2(),
            "concatenated buffers"
        );
        Ok(result)
    }
}

fn check_features<T: Element>(first: &RaggedBuffer<T>, rest: &[&RaggedBuffer<T>]) -> RaggedResult<()> {
    match rest.iter().find(|b| b.features != first.features) {
        Some(b) => Err(RaggedError::features(first.features, b.features)),
        None => Ok(()),
    }
}

fn check_batch<T: Element>(first: &RaggedBuffer<T>, rest: &[&RaggedBuffer<T>]) -> RaggedResult<()> {
    match rest.iter().find(|b| b.size0() != first.size0()) {
        Some(b) => Err(RaggedError::batch_size(first.size0(), b.size0())),
        None => Ok(()),
    }
}

fn cat_batch<T: Element>(
    first: &RaggedBuffer<T>,
    rest: &[&RaggedBuffer<T>],
) -> RaggedResult<RaggedBuffer<T>> {
    check_features(first, rest)?;
    let mut result = first.clone();
    for buffer in rest {
        result.extend(buffer)?;
    }
    Ok(result)
}

fn cat_items<T: Element>(
    first: &RaggedBuffer<T>,
    rest: &[&RaggedBuffer<T>],
) -> RaggedResult<RaggedBuffer<T>> {
    check_features(first, rest)?;
    check_batch(first, rest)?;

    let features = first.features;
    let inputs: Vec<&RaggedBuffer<T>> = std::iter::once(first).chain(rest.iter().copied()).collect();
    let counts: Vec<usize> = inputs.iter().map(|b| b.items()).collect();
    let total = total_length(&counts)?;
    let mut data = Vec::with_capacity(total * features);
    let mut sequences = Vec::with_capacity(first.size0());
    let mut start = 0;
    for i in 0..first.size0() {
        let mut length = 0;
        for buffer in &inputs {
            let range = &buffer.sequences[i];
            data.extend_from_slice(&buffer.data[range.start * features..range.end * features]);
            length += range.len();
        }
        sequences.push(start..start + length);
        start += length;
    }
    Ok(RaggedBuffer::from_raw(data, sequences, features))
}

/// Target length at every position for a feature-axis join.
fn feature_cat_lengths<T: Element>(inputs: &[&RaggedBuffer<T>]) -> RaggedResult<Vec<usize>> {
    let size0 = inputs.first().map_or(0, |b| b.size0());
    (0..size0)
        .map(|i| {
            let mut target = 1;
            for buffer in inputs {
                let length = buffer.sequences[i].len();
                if length == 1 {
                    continue;
                }
                if target != 1 && target != length {
                    return Err(RaggedError::sequence_lengths(i, target, length));
                }
                target = length;
            }
            Ok(target)
        })
        .collect()
}

fn cat_features<T: Element>(
    first: &RaggedBuffer<T>,
    rest: &[&RaggedBuffer<T>],
) -> RaggedResult<RaggedBuffer<T>> {
    check_batch(first, rest)?;

    let inputs: Vec<&RaggedBuffer<T>> = std::iter::once(first).chain(rest.iter().copied()).collect();
    let lengths = feature_cat_lengths(&inputs)?;
    let features: usize = inputs.iter().map(|b| b.features).sum();
    let total = total_length(&lengths)?;

    let mut data = Vec::with_capacity(total * features);
    let mut sequences = Vec::with_capacity(lengths.len());
    let mut start = 0;
    for (i, &length) in lengths.iter().enumerate() {
        for k in 0..length {
            for buffer in &inputs {
                let range = &buffer.sequences[i];
                let item = if range.len() == 1 { range.start } else { range.start + k };
                data.extend_from_slice(buffer.item(item));
            }
        }
        sequences.push(start..start + length);
        start += length;
    }
    Ok(RaggedBuffer::from_raw(data, sequences, features))
}

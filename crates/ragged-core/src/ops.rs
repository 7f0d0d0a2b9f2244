//! Elementwise arithmetic with ragged broadcasting.
//!
//! Binary operations pair sequences position by position along the batch
//! axis. Both operands must have the same number of sequences and the same
//! feature width. At each position the two lengths must either match or
//! one of them must be exactly 1, in which case its single item is applied
//! against every item of the other operand.
//!
//! | lhs lengths | rhs lengths | result lengths |
//! |-------------|-------------|----------------|
//! | `[1, 1, 1]` | `[1, 3, 2]` | `[1, 3, 2]`    |
//! | `[2, 0]`    | `[1, 1]`    | `[2, 0]`       |
//! | `[2]`       | `[3]`       | error          |
//!
//! In-place forms cannot change the receiver's shape, so they accept an
//! equal-length or single-item right operand only. On a
//! [`RaggedViewMut`] they write through to the viewed columns of the source
//! buffer.
//!
//! # Examples
//!
//! ```
//! use ragged_core::RaggedBuffer;
//!
//! let a = RaggedBuffer::from_parts(vec![0i64, 0, 1, 2, 0, 5], 1, vec![1, 3, 2]).unwrap();
//! let b = RaggedBuffer::from_parts(vec![0i64, 3, 10], 1, vec![1, 1, 1]).unwrap();
//!
//! let sum = a.try_add(&b).unwrap();
//! assert_eq!(sum.as_slice(), &[0, 3, 4, 5, 10, 15]);
//! assert_eq!(sum, b.try_add(&a).unwrap());
//!
//! let scaled = &sum * 10;
//! assert_eq!(scaled.as_slice(), &[0, 30, 40, 50, 100, 150]);
//! ```

use std::marker::PhantomData;

use crate::buffer::{total_length, RaggedBuffer};
use crate::error::{ArgumentError, RaggedError, RaggedResult};
use crate::scalar::{Element, Numeric};
use crate::view::{AsView, RaggedView, RaggedViewMut};

/// Elementwise binary operation strategy.
pub trait BinOp<T> {
    fn apply(lhs: T, rhs: T) -> T;
}

/// Elementwise addition.
pub struct OpAdd<T>(PhantomData<T>);

/// Elementwise subtraction.
pub struct OpSub<T>(PhantomData<T>);

/// Elementwise multiplication.
pub struct OpMul<T>(PhantomData<T>);

impl<T: Numeric> BinOp<T> for OpAdd<T> {
    #[inline]
    fn apply(lhs: T, rhs: T) -> T {
        Numeric::add(lhs, rhs)
    }
}

impl<T: Numeric> BinOp<T> for OpSub<T> {
    #[inline]
    fn apply(lhs: T, rhs: T) -> T {
        Numeric::sub(lhs, rhs)
    }
}

impl<T: Numeric> BinOp<T> for OpMul<T> {
    #[inline]
    fn apply(lhs: T, rhs: T) -> T {
        Numeric::mul(lhs, rhs)
    }
}

/// Result lengths of broadcasting two length vectors.
///
/// # Errors
///
/// Returns a shape mismatch error if the batch sizes differ or a pair of
/// lengths is neither equal nor contains a 1.
pub fn broadcast_lengths(lhs: &[usize], rhs: &[usize]) -> RaggedResult<Vec<usize>> {
    if lhs.len() != rhs.len() {
        return Err(RaggedError::batch_size(lhs.len(), rhs.len()));
    }
    lhs.iter()
        .zip(rhs)
        .enumerate()
        .map(|(position, (&l, &r))| match (l, r) {
            _ if l == r => Ok(l),
            (1, _) => Ok(r),
            (_, 1) => Ok(l),
            _ => Err(RaggedError::sequence_lengths(position, l, r)),
        })
        .collect()
}

/// Source item for output item `k` of a sequence, replicating singletons.
#[inline]
fn broadcast_item(start: usize, length: usize, k: usize) -> usize {
    if length == 1 {
        start
    } else {
        start + k
    }
}

fn binop_views<T: Numeric, Op: BinOp<T>>(
    lhs: &RaggedView<'_, T>,
    rhs: &RaggedView<'_, T>,
) -> RaggedResult<RaggedBuffer<T>> {
    let features = lhs.size2();
    if rhs.size2() != features {
        return Err(RaggedError::features(features, rhs.size2()));
    }
    let lengths = broadcast_lengths(&lhs.lengths(), &rhs.lengths())?;
    tracing::trace!(
        sequences = lengths.len(),
        features,
        "elementwise binop with ragged broadcast"
    );

    let total = total_length(&lengths)?;
    let mut data = Vec::with_capacity(total * features);
    let mut sequences = Vec::with_capacity(lengths.len());
    let mut start = 0;
    for (i, &length) in lengths.iter().enumerate() {
        let lr = lhs.item_range(i).expect("view batch positions are in range");
        let rr = rhs.item_range(i).expect("view batch positions are in range");
        for k in 0..length {
            let li = broadcast_item(lr.start, lr.len(), k);
            let ri = broadcast_item(rr.start, rr.len(), k);
            data.extend((0..features).map(|c| Op::apply(lhs.value(li, c), rhs.value(ri, c))));
        }
        sequences.push(start..start + length);
        start += length;
    }
    Ok(RaggedBuffer::from_raw(data, sequences, features))
}

impl<T: Numeric> RaggedBuffer<T> {
    /// Elementwise `self op rhs` with ragged broadcasting.
    pub fn binop<Op: BinOp<T>>(&self, rhs: &impl AsView<T>) -> RaggedResult<Self> {
        binop_views::<T, Op>(&self.as_view(), &rhs.as_view())
    }

    /// Elementwise sum with ragged broadcasting.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch error for differing feature widths, batch
    /// sizes, or incompatible sequence lengths.
    pub fn try_add(&self, rhs: &impl AsView<T>) -> RaggedResult<Self> {
        self.binop::<OpAdd<T>>(rhs)
    }

    /// Elementwise difference with ragged broadcasting.
    ///
    /// # Errors
    ///
    /// See [`try_add`](Self::try_add).
    pub fn try_sub(&self, rhs: &impl AsView<T>) -> RaggedResult<Self> {
        self.binop::<OpSub<T>>(rhs)
    }

    /// Elementwise product with ragged broadcasting.
    ///
    /// # Errors
    ///
    /// See [`try_add`](Self::try_add).
    pub fn try_mul(&self, rhs: &impl AsView<T>) -> RaggedResult<Self> {
        self.binop::<OpMul<T>>(rhs)
    }

    /// Apply `op` with a scalar right operand to every element.
    pub fn op_scalar<Op: BinOp<T>>(&self, scalar: T) -> Self {
        Self::from_raw(
            self.data.iter().map(|&x| Op::apply(x, scalar)).collect(),
            self.sequences.clone(),
            self.features,
        )
    }

    pub fn add_scalar(&self, scalar: T) -> Self {
        self.op_scalar::<OpAdd<T>>(scalar)
    }

    pub fn sub_scalar(&self, scalar: T) -> Self {
        self.op_scalar::<OpSub<T>>(scalar)
    }

    pub fn mul_scalar(&self, scalar: T) -> Self {
        self.op_scalar::<OpMul<T>>(scalar)
    }

    /// In-place `self += rhs`.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch error unless every pair of lengths is equal
    /// or the right length is 1. The buffer is unchanged on error.
    pub fn try_add_assign(&mut self, rhs: &impl AsView<T>) -> RaggedResult<()> {
        self.full_view_mut().binop_assign::<OpAdd<T>>(rhs)
    }

    /// In-place `self -= rhs`.
    ///
    /// # Errors
    ///
    /// See [`try_add_assign`](Self::try_add_assign).
    pub fn try_sub_assign(&mut self, rhs: &impl AsView<T>) -> RaggedResult<()> {
        self.full_view_mut().binop_assign::<OpSub<T>>(rhs)
    }

    /// In-place `self *= rhs`.
    ///
    /// # Errors
    ///
    /// See [`try_add_assign`](Self::try_add_assign).
    pub fn try_mul_assign(&mut self, rhs: &impl AsView<T>) -> RaggedResult<()> {
        self.full_view_mut().binop_assign::<OpMul<T>>(rhs)
    }
}

impl<T: Numeric> RaggedViewMut<'_, T> {
    /// In-place `self op rhs`, written through to the source buffer.
    ///
    /// All shapes are validated before anything is written.
    pub fn binop_assign<Op: BinOp<T>>(&mut self, rhs: &impl AsView<T>) -> RaggedResult<()> {
        let rhs = rhs.as_view();
        let features = self.size2();
        if rhs.size2() != features {
            return Err(RaggedError::features(features, rhs.size2()));
        }
        let lhs_lengths = self.lengths();
        let rhs_lengths = rhs.lengths();
        if lhs_lengths.len() != rhs_lengths.len() {
            return Err(RaggedError::batch_size(
                lhs_lengths.len(),
                rhs_lengths.len(),
            ));
        }
        for (position, (&l, &r)) in lhs_lengths.iter().zip(&rhs_lengths).enumerate() {
            if l != r && r != 1 {
                return Err(RaggedError::sequence_lengths(position, l, r));
            }
        }

        for i in 0..lhs_lengths.len() {
            let lr = self.item_range(i).expect("view batch positions are in range");
            let rr = rhs.item_range(i).expect("view batch positions are in range");
            for (k, li) in lr.enumerate() {
                let ri = broadcast_item(rr.start, rr.len(), k);
                for c in 0..features {
                    let value = Op::apply(self.value(li, c), rhs.value(ri, c));
                    self.write(li, c, value);
                }
            }
        }
        Ok(())
    }

    /// In-place `self += rhs`, written through to the source buffer.
    pub fn try_add_assign(&mut self, rhs: &impl AsView<T>) -> RaggedResult<()> {
        self.binop_assign::<OpAdd<T>>(rhs)
    }

    /// In-place `self -= rhs`, written through to the source buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::{Index, RaggedBuffer};
    ///
    /// let mut entities = RaggedBuffer::from_parts(vec![10.0f32, 3.0, 11.0, 4.0], 2, vec![2]).unwrap();
    /// let origin = RaggedBuffer::from_parts(vec![1.0f32, 0.0, 5.0], 3, vec![1]).unwrap();
    ///
    /// entities
    ///     .view_mut(Index::All, vec![1])
    ///     .unwrap()
    ///     .try_sub_assign(&origin.view(Index::All, vec![2]).unwrap())
    ///     .unwrap();
    /// assert_eq!(entities.as_slice(), &[10.0, -2.0, 11.0, -1.0]);
    /// ```
    pub fn try_sub_assign(&mut self, rhs: &impl AsView<T>) -> RaggedResult<()> {
        self.binop_assign::<OpSub<T>>(rhs)
    }

    /// In-place `self *= rhs`, written through to the source buffer.
    pub fn try_mul_assign(&mut self, rhs: &impl AsView<T>) -> RaggedResult<()> {
        self.binop_assign::<OpMul<T>>(rhs)
    }

    /// Apply `op` with a scalar to every viewed element in place.
    pub fn op_scalar_assign<Op: BinOp<T>>(&mut self, scalar: T) {
        for i in 0..self.size0() {
            let range = self.item_range(i).expect("view batch positions are in range");
            for item in range {
                for c in 0..self.size2() {
                    let value = Op::apply(self.value(item, c), scalar);
                    self.write(item, c, value);
                }
            }
        }
    }

    pub fn add_scalar(&mut self, scalar: T) {
        self.op_scalar_assign::<OpAdd<T>>(scalar)
    }

    pub fn sub_scalar(&mut self, scalar: T) {
        self.op_scalar_assign::<OpSub<T>>(scalar)
    }

    pub fn mul_scalar(&mut self, scalar: T) {
        self.op_scalar_assign::<OpMul<T>>(scalar)
    }
}

impl<T: Numeric> std::ops::Add<T> for &RaggedBuffer<T> {
    type Output = RaggedBuffer<T>;

    fn add(self, scalar: T) -> Self::Output {
        self.add_scalar(scalar)
    }
}

impl<T: Numeric> std::ops::Sub<T> for &RaggedBuffer<T> {
    type Output = RaggedBuffer<T>;

    fn sub(self, scalar: T) -> Self::Output {
        self.sub_scalar(scalar)
    }
}

impl<T: Numeric> std::ops::Mul<T> for &RaggedBuffer<T> {
    type Output = RaggedBuffer<T>;

    fn mul(self, scalar: T) -> Self::Output {
        self.mul_scalar(scalar)
    }
}

impl<T: Element> RaggedBuffer<T> {
    /// Per-item position along `axis`, as a single-feature buffer of the
    /// same ragged shape.
    ///
    /// Axis 0 yields the sequence index of each item; axis 1 yields the
    /// item's position within its sequence.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error for any other axis.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragged_core::RaggedBuffer;
    ///
    /// let buffer = RaggedBuffer::from_parts(vec![0.0f32; 6], 1, vec![3, 1, 2]).unwrap();
    /// assert_eq!(buffer.indices(0).unwrap().as_slice(), &[0, 0, 0, 1, 2, 2]);
    /// assert_eq!(buffer.indices(1).unwrap().as_slice(), &[0, 1, 2, 0, 0, 1]);
    /// ```
    pub fn indices(&self, axis: usize) -> RaggedResult<RaggedBuffer<i64>> {
        let data: Vec<i64> = match axis {
            0 => self
                .sequences
                .iter()
                .enumerate()
                .flat_map(|(i, r)| std::iter::repeat(i as i64).take(r.len()))
                .collect(),
            1 => self
                .sequences
                .iter()
                .flat_map(|r| 0..r.len() as i64)
                .collect(),
            _ => {
                return Err(ArgumentError::InvalidAxis {
                    operation: "indices",
                    axis,
                }
                .into())
            }
        };
        Ok(RaggedBuffer::from_raw(data, self.sequences.clone(), 1))
    }

    /// Per-item position in flattened item order, as a single-feature
    /// buffer of the same ragged shape.
    pub fn flat_indices(&self) -> RaggedBuffer<i64> {
        RaggedBuffer::from_raw(
            (0..self.items() as i64).collect(),
            self.sequences.clone(),
            1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::index::Index;

    fn rb3() -> RaggedBuffer<i64> {
        RaggedBuffer::from_parts(vec![0, 0, 1, 2, 0, 5], 1, vec![1, 3, 2]).unwrap()
    }

    fn rb4() -> RaggedBuffer<i64> {
        RaggedBuffer::from_parts(vec![0, 3, 10], 1, vec![1, 1, 1]).unwrap()
    }

    #[test]
    fn test_broadcast_lengths() {
        assert_eq!(broadcast_lengths(&[1, 1, 1], &[1, 3, 2]).unwrap(), vec![1, 3, 2]);
        assert_eq!(broadcast_lengths(&[2, 0], &[1, 1]).unwrap(), vec![2, 0]);
        assert_eq!(
            broadcast_lengths(&[2], &[3]),
            Err(RaggedError::sequence_lengths(0, 2, 3))
        );
        assert_eq!(
            broadcast_lengths(&[1; 4], &[1; 12]),
            Err(RaggedError::batch_size(4, 12))
        );
    }

    #[test]
    fn test_add_broadcast_commutes() {
        let sum = rb3().try_add(&rb4()).unwrap();
        assert_eq!(sum.lengths(), vec![1, 3, 2]);
        assert_eq!(sum.as_slice(), &[0, 3, 4, 5, 10, 15]);
        assert_eq!(sum, rb4().try_add(&rb3()).unwrap());
    }

    #[test]
    fn test_sub_and_mul() {
        let diff = rb3().try_sub(&rb4()).unwrap();
        assert_eq!(diff.as_slice(), &[0, -3, -2, -1, -10, -5]);
        let prod = rb3().try_mul(&rb3()).unwrap();
        assert_eq!(prod.as_slice(), &[0, 0, 1, 4, 0, 25]);
    }

    #[test]
    fn test_batch_mismatch() {
        let mask = RaggedBuffer::from_parts(vec![0i64; 4], 1, vec![1; 4]).unwrap();
        let offset = RaggedBuffer::from_parts(
            vec![0, 1, 2, 3, 13, 22, 32, 41, 42, 43, 44, 45],
            1,
            vec![1; 12],
        )
        .unwrap();
        let err = mask.try_add(&offset).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_feature_mismatch() {
        let a = RaggedBuffer::from_parts(vec![1.0f32, 2.0], 2, vec![1]).unwrap();
        let b = RaggedBuffer::from_parts(vec![1.0f32], 1, vec![1]).unwrap();
        assert_eq!(a.try_add(&b), Err(RaggedError::features(2, 1)));
    }

    #[test]
    fn test_scalar_ops() {
        let sum = rb3().try_add(&rb4()).unwrap();
        assert_eq!(
            &sum * 10,
            RaggedBuffer::from_parts(vec![0, 30, 40, 50, 100, 150], 1, vec![1, 3, 2]).unwrap()
        );
        assert_eq!((&rb4() + 1).as_slice(), &[1, 4, 11]);
        assert_eq!((&rb4() - 1).as_slice(), &[-1, 2, 9]);
    }

    #[test]
    fn test_in_place_broadcast() {
        let mut a = rb3();
        a.try_add_assign(&rb4()).unwrap();
        assert_eq!(a.as_slice(), &[0, 3, 4, 5, 10, 15]);

        // The receiver cannot grow to match a longer right operand.
        let mut b = rb4();
        let before = b.clone();
        assert!(b.try_add_assign(&rb3()).is_err());
        assert_eq!(b, before);
    }

    #[test]
    fn test_view_sub_assign_writes_through() {
        let mut entities = RaggedBuffer::from_parts(
            vec![
                10.0f32, 3.0, 10.0, 1.0, 11.0, 4.0, 11.0, 2.0, 12.0, 5.0, 12.0, 3.0, 13.0, 6.0,
                13.0, 4.0, 14.0, 7.0, 14.0, 5.0, 15.0, 8.0, 15.0, 6.0,
            ],
            4,
            vec![3, 0, 2, 1],
        )
        .unwrap();
        let clone = entities.clone();
        let origin = RaggedBuffer::from_parts(
            vec![
                0.0f32, 0.0, 100.0, -23.0, 1.0, -1.0, 200.0, -23.0, 2.0, -2.0, 300.0, -23.0,
                -10.0, -10.0, 400.0, -23.0,
            ],
            4,
            vec![1, 1, 1, 1],
        )
        .unwrap();

        entities
            .view_mut(Index::All, vec![1, 3])
            .unwrap()
            .try_sub_assign(&origin.view(Index::All, vec![0, 1]).unwrap())
            .unwrap();

        let expected = RaggedBuffer::from_parts(
            vec![
                10.0f32, 3.0, 10.0, 1.0, 11.0, 4.0, 11.0, 2.0, 12.0, 5.0, 12.0, 3.0, 13.0, 4.0,
                13.0, 6.0, 14.0, 5.0, 14.0, 7.0, 15.0, 18.0, 15.0, 16.0,
            ],
            4,
            vec![3, 0, 2, 1],
        )
        .unwrap();
        assert_eq!(entities, expected);
        assert_eq!(entities.len(), 24);
        assert_eq!(entities.items(), 6);
        assert_ne!(clone, entities);
    }

    #[test]
    fn test_reordered_views_keep_every_sequence() {
        let offsets = rb4();
        let sum = rb3()
            .try_add(&offsets.view(vec![2, 0, 1], Index::All).unwrap())
            .unwrap();
        assert_eq!(sum.lengths(), vec![1, 3, 2]);
        assert_eq!(sum.as_slice(), &[10, 0, 1, 2, 3, 8]);

        let mut target = rb3();
        target
            .view_mut(vec![2, 0], Index::All)
            .unwrap()
            .try_add_assign(&offsets.view(vec![0, 1], Index::All).unwrap())
            .unwrap();
        assert_eq!(target.as_slice(), &[3, 0, 1, 2, 0, 5]);
    }

    #[test]
    fn test_view_scalar_assign() {
        let mut buffer = RaggedBuffer::from_parts(vec![1i64, 2, 3, 4], 2, vec![1, 1]).unwrap();
        buffer.view_mut(1usize, vec![0]).unwrap().mul_scalar(5);
        assert_eq!(buffer.as_slice(), &[1, 2, 15, 4]);
    }

    #[test]
    fn test_indices() {
        let entities1 = RaggedBuffer::from_parts(vec![0.0f32; 6 * 64], 64, vec![3, 1, 2]).unwrap();
        let entities2 = RaggedBuffer::from_parts(vec![0.0f32; 3 * 64], 64, vec![1, 2, 0]).unwrap();
        assert_eq!(entities1.indices(0).unwrap().as_slice(), &[0, 0, 0, 1, 2, 2]);
        assert_eq!(entities2.indices(0).unwrap().as_slice(), &[0, 1, 1]);
        assert_eq!(rb3().indices(1).unwrap().as_slice(), &[0, 0, 1, 2, 0, 1]);
        assert!(rb3().indices(2).is_err());
        assert_eq!(
            entities2.flat_indices(),
            RaggedBuffer::from_parts(vec![0, 1, 2], 1, vec![1, 2, 0]).unwrap()
        );
    }
}

//! In-place 2D translate-then-rotate of ragged positions.

use crate::error::{RaggedError, RaggedResult, ShapeMismatchError};
use crate::shape::RaggedShape;
use crate::view::{RaggedView, RaggedViewMut};

fn require_columns(operand: &'static str, got: usize) -> RaggedResult<()> {
    if got != 2 {
        return Err(ShapeMismatchError::Columns {
            operand,
            expected: 2,
            got,
        }
        .into());
    }
    Ok(())
}

fn require_single_items(operand: &'static str, lengths: &[usize]) -> RaggedResult<()> {
    match lengths.iter().position(|&length| length != 1) {
        Some(position) => Err(ShapeMismatchError::SingleItem {
            operand,
            position,
            got: lengths[position],
        }
        .into()),
        None => Ok(()),
    }
}

/// Translate every `(x, y)` item by its sequence's origin, then rotate it by
/// the sequence's `(cos θ, sin θ)`:
///
/// ```text
/// x' = cos θ · (x - ox) - sin θ · (y - oy)
/// y' = sin θ · (x - ox) + cos θ · (y - oy)
/// ```
///
/// Results are written through to the source of `positions`.
///
/// # Errors
///
/// Returns a shape mismatch error if any operand does not have exactly two
/// columns, if `origin` or `rotation` does not have exactly one item per
/// sequence, or if the batch sizes differ. Nothing is written on error.
///
/// # Examples
///
/// ```
/// use ragged_core::{translate_rotate, Index, RaggedBuffer};
///
/// let mut entities = RaggedBuffer::from_parts(vec![1.0f32, 2.0, 9.0, 3.0, 4.0, 9.0], 3, vec![2]).unwrap();
/// let origin = RaggedBuffer::from_parts(vec![1.0f32, 1.0], 2, vec![1]).unwrap();
/// let rotation = RaggedBuffer::from_parts(vec![0.0f32, 1.0], 2, vec![1]).unwrap();
///
/// translate_rotate(
///     &mut entities.view_mut(Index::All, 0..2).unwrap(),
///     &origin.view(Index::All, Index::All).unwrap(),
///     &rotation.view(Index::All, Index::All).unwrap(),
/// )
/// .unwrap();
///
/// // A quarter turn maps (dx, dy) to (-dy, dx).
/// assert_eq!(entities.as_slice(), &[-1.0, 0.0, 9.0, -3.0, 2.0, 9.0]);
/// ```
pub fn translate_rotate(
    positions: &mut RaggedViewMut<'_, f32>,
    origin: &RaggedView<'_, f32>,
    rotation: &RaggedView<'_, f32>,
) -> RaggedResult<()> {
    require_columns("positions", positions.size2())?;
    require_columns("origin", origin.size2())?;
    require_columns("rotation", rotation.size2())?;
    let size0 = positions.size0();
    for other in [origin.size0(), rotation.size0()] {
        if other != size0 {
            return Err(RaggedError::batch_size(size0, other));
        }
    }
    require_single_items("origin", &origin.lengths())?;
    require_single_items("rotation", &rotation.lengths())?;

    for i in 0..size0 {
        let items = positions
            .item_range(i)
            .expect("view batch positions are in range");
        let o = origin.item_range(i).expect("view batch positions are in range");
        let r = rotation.item_range(i).expect("view batch positions are in range");
        let (ox, oy) = (origin.value(o.start, 0), origin.value(o.start, 1));
        let (cos, sin) = (rotation.value(r.start, 0), rotation.value(r.start, 1));
        for item in items {
            let dx = positions.value(item, 0) - ox;
            let dy = positions.value(item, 1) - oy;
            positions.write(item, 0, cos * dx - sin * dy);
            positions.write(item, 1, sin * dx + cos * dy);
        }
    }
    tracing::debug!(
        sequences = size0,
        items = positions.items(),
        "translated and rotated positions"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RaggedBuffer;
    use crate::error::ErrorKind;
    use crate::index::Index;

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

    fn origin() -> RaggedBuffer<f32> {
        RaggedBuffer::from_parts(
            vec![
                0.0, 0.0, 100.0, -23.0, //
                1.0, -1.0, 200.0, -23.0, //
                2.0, -2.0, 300.0, -23.0, //
                -10.0, -10.0, 400.0, -23.0,
            ],
            4,
            vec![1, 1, 1, 1],
        )
        .unwrap()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_zero_rotation_is_subtraction() {
        let mut rotated = entities();
        let mut subtracted = entities();
        let origin = origin();
        let rotation =
            RaggedBuffer::from_parts(vec![1.0f32, 0.0].repeat(4), 2, vec![1; 4]).unwrap();

        translate_rotate(
            &mut rotated.view_mut(Index::All, vec![1, 3]).unwrap(),
            &origin.view(Index::All, vec![0, 1]).unwrap(),
            &rotation.view(Index::All, Index::All).unwrap(),
        )
        .unwrap();
        subtracted
            .view_mut(Index::All, vec![1, 3])
            .unwrap()
            .try_sub_assign(&origin.view(Index::All, vec![0, 1]).unwrap())
            .unwrap();

        assert_close(rotated.as_slice(), subtracted.as_slice());
    }

    #[test]
    fn test_rotation_per_sequence() {
        let mut entities = entities();
        let origin = origin();
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let rotation = RaggedBuffer::from_parts(
            vec![0.0, 1.0, 1.0, 0.0, half, half, -1.0, 0.0],
            2,
            vec![1; 4],
        )
        .unwrap();

        translate_rotate(
            &mut entities.view_mut(Index::All, vec![1, 3]).unwrap(),
            &origin.view(Index::All, vec![0, 1]).unwrap(),
            &rotation.view(Index::All, Index::All).unwrap(),
        )
        .unwrap();

        // Sequence 0: origin (0, 0), quarter turn maps (x, y) to (-y, x).
        assert_close(&entities.as_slice()[..4], &[10.0, -1.0, 10.0, 3.0]);
        // Sequence 2: origin (2, -2), eighth turn.
        let (dx, dy) = (6.0 - 2.0, 4.0 + 2.0);
        assert_close(
            &entities.as_slice()[12..16],
            &[13.0, half * dx - half * dy, 13.0, half * dx + half * dy],
        );
        // Sequence 3: origin (-10, -10), half turn negates.
        assert_close(&entities.as_slice()[20..], &[15.0, -18.0, 15.0, -16.0]);
    }

    #[test]
    fn test_shape_errors_leave_source_untouched() {
        let mut entities = entities();
        let before = entities.clone();
        let origin = origin();
        let rotation = RaggedBuffer::from_parts(vec![1.0f32, 0.0].repeat(4), 2, vec![1; 4]).unwrap();

        let err = translate_rotate(
            &mut entities.view_mut(Index::All, vec![1, 2, 3]).unwrap(),
            &origin.view(Index::All, vec![0, 1]).unwrap(),
            &rotation.view(Index::All, Index::All).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

        let two_items = RaggedBuffer::from_parts(vec![0.0f32; 10], 2, vec![1, 1, 2, 1]).unwrap();
        let err = translate_rotate(
            &mut entities.view_mut(Index::All, vec![1, 3]).unwrap(),
            &two_items.view(Index::All, Index::All).unwrap(),
            &rotation.view(Index::All, Index::All).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RaggedError::ShapeMismatch(ShapeMismatchError::SingleItem { position: 2, got: 2, .. })
        ));

        let short = RaggedBuffer::from_parts(vec![1.0f32, 0.0], 2, vec![1]).unwrap();
        let err = translate_rotate(
            &mut entities.view_mut(Index::All, vec![1, 3]).unwrap(),
            &origin.view(Index::All, vec![0, 1]).unwrap(),
            &short.view(Index::All, Index::All).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, RaggedError::batch_size(4, 1));

        assert_eq!(entities, before);
    }
}

//! Property-based tests for ragged buffer operations
//!
//! Buffers are generated from random length vectors and feature widths;
//! values are derived from the item position so failures are easy to read.

#[cfg(test)]
mod tests {
    use crate::{Index, RaggedBuffer, RaggedError};
    use proptest::prelude::*;

    fn lengths_strategy() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0usize..6, 0..8)
    }

    fn buffer_from(lengths: &[usize], features: usize) -> RaggedBuffer<i64> {
        let items: usize = lengths.iter().sum();
        let data = (0..(items * features) as i64).collect();
        RaggedBuffer::from_parts(data, features, lengths.to_vec()).unwrap()
    }

    fn buffer_strategy() -> impl Strategy<Value = RaggedBuffer<i64>> {
        (lengths_strategy(), 1usize..5).prop_map(|(lengths, features)| buffer_from(&lengths, features))
    }

    proptest! {
        #[test]
        fn prop_flattened_roundtrip(buffer in buffer_strategy()) {
            let lengths: Vec<i64> = buffer.lengths().iter().map(|&l| l as i64).collect();
            let restored = RaggedBuffer::from_flattened(buffer.as_array(), &lengths).unwrap();
            prop_assert_eq!(&restored, &buffer);

            let sum: usize = buffer.lengths().iter().sum();
            prop_assert_eq!(sum * buffer.size2(), buffer.items() * buffer.size2());
            prop_assert_eq!(buffer.len(), buffer.items() * buffer.size2());
        }

        #[test]
        fn prop_clear_equals_new(mut buffer in buffer_strategy()) {
            let features = buffer.size2();
            buffer.clear();
            prop_assert_eq!(&buffer, &RaggedBuffer::<i64>::new(features));
            prop_assert_eq!(buffer.size0(), 0);
            prop_assert_eq!(buffer.as_array().dim(), (0, features));
        }

        #[test]
        fn prop_extend_matches_cat(
            (a, b) in (lengths_strategy(), lengths_strategy(), 1usize..4)
                .prop_map(|(la, lb, f)| (buffer_from(&la, f), buffer_from(&lb, f)))
        ) {
            let mut extended = a.clone();
            extended.extend(&b).unwrap();
            prop_assert_eq!(extended, RaggedBuffer::cat(&[&a, &b], 0).unwrap());
        }

        #[test]
        fn prop_singleton_broadcast_replicates(buffer in buffer_strategy(), scalar in -50i64..50) {
            let features = buffer.size2();
            let singles = RaggedBuffer::from_parts(
                vec![scalar; buffer.size0() * features],
                features,
                vec![1; buffer.size0()],
            )
            .unwrap();

            let sum = buffer.try_add(&singles).unwrap();
            prop_assert_eq!(sum.lengths(), buffer.lengths());
            prop_assert_eq!(sum, &buffer + scalar);
        }

        #[test]
        fn prop_broadcast_rejects_incompatible(n in 1usize..6, l in 2usize..5) {
            let a = buffer_from(&vec![l; n], 1);
            let b = buffer_from(&vec![l + 1; n], 1);
            prop_assert_eq!(
                a.try_add(&b).unwrap_err(),
                RaggedError::sequence_lengths(0, l, l + 1)
            );
        }

        #[test]
        fn prop_padpack_scatter_restores_ids(
            ids in prop::collection::vec(0i64..6, 1..40),
            split in 0usize..40,
        ) {
            let split = split.min(ids.len());
            let lengths = vec![split, ids.len() - split];
            let buffer = RaggedBuffer::from_parts(ids.clone(), 1, lengths).unwrap();
            let packed = buffer.padpack().unwrap().unwrap();

            let mut restored = vec![0.0f32; ids.len()];
            for (item, &cell) in packed.inverse_index.iter().enumerate() {
                restored[item] = packed.batch[cell as usize];
                prop_assert_eq!(packed.index[cell as usize], item as i64);
            }
            let expected: Vec<f32> = ids.iter().map(|&id| id as f32).collect();
            prop_assert_eq!(restored, expected);
            prop_assert_eq!(packed.occupancy().iter().sum::<usize>(), ids.len());
        }

        #[test]
        fn prop_item_overrun_never_errors(buffer in buffer_strategy(), start in 0usize..10) {
            let selection = buffer.select(Index::All, start..start + 10, Index::All).unwrap();
            let owned = selection.materialize();
            let expected: Vec<usize> = buffer
                .lengths()
                .iter()
                .map(|&l| l.saturating_sub(start).min(10))
                .collect();
            prop_assert_eq!(owned.lengths(), expected.clone());
            prop_assert_eq!(selection.lengths(), expected);
        }

        #[test]
        fn prop_gather_reorders(buffer in buffer_strategy(), picks in prop::collection::vec(0usize..8, 0..6)) {
            prop_assume!(buffer.size0() > 0);
            let picks: Vec<usize> = picks.into_iter().map(|p| p % buffer.size0()).collect();
            let gathered = buffer.gather(&picks).unwrap();
            prop_assert_eq!(gathered.size0(), picks.len());
            for (k, &p) in picks.iter().enumerate() {
                prop_assert_eq!(gathered.sequence(k).unwrap(), buffer.sequence(p).unwrap());
            }
        }
    }
}
